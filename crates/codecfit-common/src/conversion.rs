//! The user-editable conversion configuration.
//!
//! A [`ConversionConfig`] is created by the UI, re-normalized after every
//! edit, and finally handed to the transcoding layer. Fields that the
//! normalizer has to repair from arbitrary input (codecs, presets, GIF
//! parameters) are kept as loose strings and options here; the typed
//! vocabularies live in [`crate::media`].

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::media::{BitrateMode, ML_UPSCALE_NONE, RESOLUTION_ORIGINAL};

/// A crop rectangle in source pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Source dimensions the rectangle was drawn against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_height: Option<u32>,
}

/// Complete conversion settings for one output file.
///
/// Every field has a default, so a partial JSON document (even `{}`)
/// deserializes into a usable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionConfig {
    /// Output container id (`mp4`, `mkv`, `gif`, `mp3`, ...).
    pub container: String,
    /// Video encoder id (`libx264`, `h264_nvenc`, `gif`, ...).
    pub video_codec: String,
    /// `crf` or `bitrate`.
    pub video_bitrate_mode: String,
    /// Target video bitrate in kbit/s, used in `bitrate` mode.
    pub video_bitrate: String,
    pub crf: u8,
    pub audio_codec: String,
    pub audio_bitrate: String,
    pub audio_channels: String,
    /// Volume in percent.
    pub audio_volume: u16,
    pub audio_normalize: bool,
    pub selected_audio_tracks: Vec<u32>,
    pub selected_subtitle_tracks: Vec<u32>,
    /// External subtitle file to burn into the picture.
    pub subtitle_burn_path: Option<String>,
    /// `original`, a named target such as `1080p`, or `custom`.
    pub resolution: String,
    pub custom_width: Option<u32>,
    pub custom_height: Option<u32>,
    pub scaling_algorithm: String,
    pub fps: String,
    pub preset: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    /// Clockwise rotation in degrees.
    pub rotation: u16,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub crop: Option<CropRect>,
    /// Free-form container metadata tags (title, artist, ...).
    pub metadata: BTreeMap<String, String>,
    pub nvenc_spatial_aq: bool,
    pub nvenc_temporal_aq: bool,
    pub videotoolbox_allow_sw: bool,
    pub hw_decode: bool,
    /// Palette size. Values of any other JSON type load as `None`.
    #[serde(deserialize_with = "de_loose_number")]
    pub gif_colors: Option<f64>,
    #[serde(deserialize_with = "de_loose_string")]
    pub gif_dither: Option<String>,
    #[serde(deserialize_with = "de_loose_number")]
    pub gif_loop: Option<f64>,
    /// ML upscaling mode, `none` when disabled.
    pub ml_upscale: String,
}

/// Accept any JSON value; only finite numbers survive.
fn de_loose_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Number(f64),
        Other(IgnoredAny),
    }

    Ok(match Loose::deserialize(deserializer)? {
        Loose::Number(value) if value.is_finite() => Some(value),
        _ => None,
    })
}

/// Accept any JSON value; only strings survive.
fn de_loose_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(value) => Some(value),
        Loose::Other(_) => None,
    })
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            container: "mp4".into(),
            video_codec: "libx264".into(),
            video_bitrate_mode: BitrateMode::Crf.as_str().into(),
            video_bitrate: "5000".into(),
            crf: 23,
            audio_codec: "aac".into(),
            audio_bitrate: "128".into(),
            audio_channels: "original".into(),
            audio_volume: 100,
            audio_normalize: false,
            selected_audio_tracks: Vec::new(),
            selected_subtitle_tracks: Vec::new(),
            subtitle_burn_path: None,
            resolution: RESOLUTION_ORIGINAL.into(),
            custom_width: None,
            custom_height: None,
            scaling_algorithm: "bicubic".into(),
            fps: "original".into(),
            preset: "medium".into(),
            start_time: None,
            end_time: None,
            rotation: 0,
            flip_horizontal: false,
            flip_vertical: false,
            crop: None,
            metadata: BTreeMap::new(),
            nvenc_spatial_aq: false,
            nvenc_temporal_aq: false,
            videotoolbox_allow_sw: false,
            hw_decode: false,
            gif_colors: Some(256.0),
            gif_dither: Some("sierra2_4a".into()),
            gif_loop: Some(0.0),
            ml_upscale: ML_UPSCALE_NONE.into(),
        }
    }
}

impl ConversionConfig {
    /// Whether an ML upscaler is selected.
    ///
    /// An empty string counts as disabled, same as `none`.
    pub fn ml_upscale_enabled(&self) -> bool {
        !self.ml_upscale.is_empty() && self.ml_upscale != ML_UPSCALE_NONE
    }

    /// Whether the output keeps the source dimensions.
    pub fn keeps_original_resolution(&self) -> bool {
        self.resolution == RESOLUTION_ORIGINAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: ConversionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ConversionConfig::default());
        assert_eq!(config.container, "mp4");
        assert_eq!(config.video_bitrate_mode, "crf");
    }

    #[test]
    fn test_camel_case_fields() {
        let json = r#"{
            "container": "mkv",
            "videoCodec": "h264_nvenc",
            "nvencSpatialAq": true,
            "selectedSubtitleTracks": [2, 3],
            "subtitleBurnPath": "/tmp/subs.ass",
            "gifColors": 300.7,
            "mlUpscale": "esrgan-2x",
            "metadata": { "title": "Holiday" }
        }"#;
        let config: ConversionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.container, "mkv");
        assert_eq!(config.video_codec, "h264_nvenc");
        assert!(config.nvenc_spatial_aq);
        assert_eq!(config.selected_subtitle_tracks, vec![2, 3]);
        assert_eq!(config.gif_colors, Some(300.7));
        assert!(config.ml_upscale_enabled());
        assert_eq!(config.metadata.get("title").map(String::as_str), Some("Holiday"));
    }

    #[test]
    fn test_null_gif_fields_deserialize_as_none() {
        let json = r#"{ "gifColors": null, "gifLoop": null, "gifDither": null }"#;
        let config: ConversionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.gif_colors, None);
        assert_eq!(config.gif_loop, None);
        assert_eq!(config.gif_dither, None);
    }

    #[test]
    fn test_mistyped_gif_fields_load_as_none() {
        let json = r#"{ "gifColors": "128", "gifLoop": true, "gifDither": 5, "container": "gif" }"#;
        let config: ConversionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.gif_colors, None);
        assert_eq!(config.gif_loop, None);
        assert_eq!(config.gif_dither, None);
        assert_eq!(config.container, "gif");

        let json = r#"{ "gifColors": [1, 2], "gifLoop": { "n": 3 }, "gifDither": ["bayer"] }"#;
        let config: ConversionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.gif_colors, None);
        assert_eq!(config.gif_loop, None);
        assert_eq!(config.gif_dither, None);
    }

    #[test]
    fn test_integer_gif_fields_are_accepted() {
        let json = r#"{ "gifColors": 128, "gifLoop": 3, "gifDither": "bayer" }"#;
        let config: ConversionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.gif_colors, Some(128.0));
        assert_eq!(config.gif_loop, Some(3.0));
        assert_eq!(config.gif_dither.as_deref(), Some("bayer"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(ConversionConfig::default()).unwrap();
        assert_eq!(value["videoCodec"], "libx264");
        assert_eq!(value["videoBitrateMode"], "crf");
        assert_eq!(value["hwDecode"], false);
        assert!(value.get("video_codec").is_none());
    }

    #[test]
    fn test_upscale_sentinels() {
        let mut config = ConversionConfig::default();
        assert!(!config.ml_upscale_enabled());
        config.ml_upscale = String::new();
        assert!(!config.ml_upscale_enabled());
        config.ml_upscale = "esrgan-4x".into();
        assert!(config.ml_upscale_enabled());
    }

    #[test]
    fn test_crop_roundtrip_skips_missing_source_size() {
        let crop = CropRect {
            x: 10,
            y: 20,
            width: 640,
            height: 360,
            source_width: None,
            source_height: None,
        };
        let json = serde_json::to_string(&crop).unwrap();
        assert_eq!(json, r#"{"x":10,"y":20,"width":640,"height":360}"#);
    }
}
