//! Media-domain enums for encoder presets, GIF dithering and rate control.
//!
//! These are the closed vocabularies a conversion configuration draws
//! from. Configurations carry them as plain strings (the UI can hand us
//! anything), so every enum here parses with `FromStr` and renders with
//! `Display` using the exact identifiers ffmpeg understands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolution value meaning "keep the source dimensions".
pub const RESOLUTION_ORIGINAL: &str = "original";

/// Upscale value meaning "no ML upscaling".
pub const ML_UPSCALE_NONE: &str = "none";

/// Inclusive bounds for the GIF palette size.
pub const GIF_COLORS_RANGE: (u16, u16) = (2, 256);

/// Inclusive bounds for the GIF loop count (0 loops forever).
pub const GIF_LOOP_RANGE: (u16, u16) = (0, 65535);

// ---------------------------------------------------------------------------
// VideoPreset
// ---------------------------------------------------------------------------

/// x264-style speed/quality preset.
///
/// Variants are declared fastest-first; [`VideoPreset::ALL`] is the
/// canonical order used whenever a "first allowed" preset is chosen.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VideoPreset {
    Ultrafast,
    Superfast,
    Veryfast,
    Faster,
    Fast,
    #[default]
    Medium,
    Slow,
    Slower,
    Veryslow,
}

impl VideoPreset {
    /// Every preset, fastest to most thorough.
    pub const ALL: [VideoPreset; 9] = [
        Self::Ultrafast,
        Self::Superfast,
        Self::Veryfast,
        Self::Faster,
        Self::Fast,
        Self::Medium,
        Self::Slow,
        Self::Slower,
        Self::Veryslow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ultrafast => "ultrafast",
            Self::Superfast => "superfast",
            Self::Veryfast => "veryfast",
            Self::Faster => "faster",
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
            Self::Slower => "slower",
            Self::Veryslow => "veryslow",
        }
    }
}

impl fmt::Display for VideoPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VideoPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == s)
            .ok_or_else(|| format!("Invalid video preset: {}", s))
    }
}

// ---------------------------------------------------------------------------
// GifDither
// ---------------------------------------------------------------------------

/// Dithering algorithm for GIF palette mapping (ffmpeg `paletteuse`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GifDither {
    None,
    Bayer,
    FloydSteinberg,
    #[default]
    #[serde(rename = "sierra2_4a")]
    Sierra2_4a,
}

impl GifDither {
    pub const ALL: [GifDither; 4] = [
        Self::None,
        Self::Bayer,
        Self::FloydSteinberg,
        Self::Sierra2_4a,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bayer => "bayer",
            Self::FloydSteinberg => "floyd_steinberg",
            Self::Sierra2_4a => "sierra2_4a",
        }
    }
}

impl fmt::Display for GifDither {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GifDither {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dither| dither.as_str() == s)
            .ok_or_else(|| format!("Invalid GIF dither: {}", s))
    }
}

// ---------------------------------------------------------------------------
// BitrateMode
// ---------------------------------------------------------------------------

/// Video rate-control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BitrateMode {
    /// Constant quality (CRF / CQ).
    Crf,
    /// Target bitrate.
    Bitrate,
}

impl BitrateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crf => "crf",
            Self::Bitrate => "bitrate",
        }
    }
}

impl fmt::Display for BitrateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BitrateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crf" => Ok(Self::Crf),
            "bitrate" => Ok(Self::Bitrate),
            _ => Err(format!("Invalid bitrate mode: {}", s)),
        }
    }
}
