//! Preset admissibility per encoder family.
//!
//! VideoToolbox ignores presets, so any value passes. NVENC only maps
//! `fast`, `medium` and `slow` onto its own preset scale. Software
//! encoders take anything from the canonical catalog.

use codecfit_common::VideoPreset;

use crate::encoder::EncoderFamily;

/// Presets NVENC accepts.
pub const NVENC_ALLOWED_PRESETS: [VideoPreset; 3] =
    [VideoPreset::Fast, VideoPreset::Medium, VideoPreset::Slow];

/// Whether `preset` is admissible for the video encoder `codec`.
pub fn is_video_preset_allowed(codec: &str, preset: &str) -> bool {
    match EncoderFamily::of(codec) {
        EncoderFamily::VideoToolbox => true,
        EncoderFamily::Nvenc => preset
            .parse::<VideoPreset>()
            .is_ok_and(|preset| NVENC_ALLOWED_PRESETS.contains(&preset)),
        EncoderFamily::Software => preset.parse::<VideoPreset>().is_ok(),
    }
}

/// First admissible preset in canonical (fastest-first) order.
///
/// Falls back to `medium` if no catalog preset is admissible.
pub fn first_allowed_preset(codec: &str) -> VideoPreset {
    allowed_presets(codec)
        .into_iter()
        .next()
        .unwrap_or(VideoPreset::Medium)
}

/// Every catalog preset admissible for `codec`, in canonical order.
pub fn allowed_presets(codec: &str) -> Vec<VideoPreset> {
    VideoPreset::ALL
        .into_iter()
        .filter(|preset| is_video_preset_allowed(codec, preset.as_str()))
        .collect()
}
