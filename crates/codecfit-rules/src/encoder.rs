//! Video encoder classification and the codec catalog.

use serde::Serialize;
use std::fmt;

/// NVIDIA NVENC hardware encoders.
pub const NVENC_ENCODERS: [&str; 3] = ["h264_nvenc", "hevc_nvenc", "av1_nvenc"];

/// Apple VideoToolbox hardware encoders.
pub const VIDEOTOOLBOX_ENCODERS: [&str; 2] = ["h264_videotoolbox", "hevc_videotoolbox"];

/// Encoder family, which decides preset policy and hardware flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderFamily {
    /// Platform media engine (Apple VideoToolbox). Presets do not apply.
    VideoToolbox,
    /// Dedicated GPU encoder (NVIDIA NVENC). Accepts a reduced preset set
    /// and supports adaptive quantization.
    Nvenc,
    /// CPU encoders.
    Software,
}

impl EncoderFamily {
    /// Classify a video encoder id.
    pub fn of(codec: &str) -> Self {
        if VIDEOTOOLBOX_ENCODERS.contains(&codec) {
            Self::VideoToolbox
        } else if NVENC_ENCODERS.contains(&codec) {
            Self::Nvenc
        } else {
            Self::Software
        }
    }

    pub fn is_hardware(&self) -> bool {
        !matches!(self, Self::Software)
    }
}

impl fmt::Display for EncoderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VideoToolbox => write!(f, "videotoolbox"),
            Self::Nvenc => write!(f, "nvenc"),
            Self::Software => write!(f, "software"),
        }
    }
}

/// A selectable video codec with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VideoCodecOption {
    pub id: &'static str,
    pub label: &'static str,
}

/// Every video codec the UI offers, in display order.
pub const VIDEO_CODEC_OPTIONS: [VideoCodecOption; 11] = [
    VideoCodecOption { id: "libx264", label: "H.264 / AVC" },
    VideoCodecOption { id: "libx265", label: "H.265 / HEVC" },
    VideoCodecOption { id: "vp9", label: "VP9 / Web" },
    VideoCodecOption { id: "prores", label: "Apple ProRes" },
    VideoCodecOption { id: "libsvtav1", label: "AV1 / SVT" },
    VideoCodecOption { id: "gif", label: "GIF / Palette" },
    VideoCodecOption { id: "h264_videotoolbox", label: "H.264 (Apple Silicon)" },
    VideoCodecOption { id: "h264_nvenc", label: "H.264 (NVIDIA)" },
    VideoCodecOption { id: "hevc_videotoolbox", label: "H.265 (Apple Silicon)" },
    VideoCodecOption { id: "hevc_nvenc", label: "H.265 (NVIDIA)" },
    VideoCodecOption { id: "av1_nvenc", label: "AV1 (NVIDIA)" },
];

/// Display label for a video codec id, if it is in the catalog.
pub fn video_codec_label(id: &str) -> Option<&'static str> {
    VIDEO_CODEC_OPTIONS
        .iter()
        .find(|option| option.id == id)
        .map(|option| option.label)
}
