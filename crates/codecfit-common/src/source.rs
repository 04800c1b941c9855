//! Probe results for the source file.
//!
//! The prober itself lives outside this workspace; these types only
//! describe the JSON shape it returns.

use serde::{Deserialize, Serialize};

/// Media information about the file being converted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceMetadata {
    /// Primary video codec; `None` when the file has no video stream.
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    /// Duration in seconds.
    pub duration: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frame_rate: Option<f64>,
    /// Overall bitrate in kbit/s.
    pub bitrate: Option<u64>,
    pub audio_tracks: Vec<SourceAudioTrack>,
    pub subtitle_tracks: Vec<SourceSubtitleTrack>,
}

impl SourceMetadata {
    /// Whether the source carries a video stream.
    pub fn has_video(&self) -> bool {
        self.video_codec
            .as_deref()
            .is_some_and(|codec| !codec.trim().is_empty())
    }
}

/// An audio stream in the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAudioTrack {
    pub index: u32,
    pub codec: String,
    #[serde(default)]
    pub channels: Option<u32>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// A subtitle stream in the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSubtitleTrack {
    pub index: u32,
    pub codec: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}
