//! The individual repair steps, in pipeline order.

use std::fmt;

use codecfit_common::{
    BitrateMode, GifDither, GIF_COLORS_RANGE, GIF_LOOP_RANGE, ML_UPSCALE_NONE,
    RESOLUTION_ORIGINAL,
};
use serde::Serialize;

use super::Pass;
use crate::encoder::EncoderFamily;
use crate::preset::{first_allowed_preset, is_video_preset_allowed};
use crate::query::GIF_CONTAINER;

const DEFAULT_GIF_COLORS: f64 = 256.0;
const DEFAULT_GIF_LOOP: f64 = 0.0;

/// One repair rule of the normalization pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStep {
    /// Audio-only sources are forced into an audio-only container.
    SourceContainer,
    /// GIF palette size, loop count and dithering are clamped.
    GifParameters,
    /// Inadmissible audio codecs are replaced by the container default.
    AudioCodec,
    /// Features the container cannot carry are switched off.
    ContainerFeatures,
    /// GIF output gets the `gif` encoder and no hardware features.
    GifOutput,
    /// Inadmissible video codecs are replaced from the fallback order.
    VideoCodec,
    /// ML upscaling keeps the source resolution.
    UpscaleResolution,
    /// Inadmissible presets are replaced by the first allowed one.
    Preset,
    /// Hardware flags are cleared unless the encoder supports them.
    HardwareFlags,
}

impl RepairStep {
    /// Pipeline order. Later steps may override earlier ones.
    pub const ORDER: [RepairStep; 9] = [
        Self::SourceContainer,
        Self::GifParameters,
        Self::AudioCodec,
        Self::ContainerFeatures,
        Self::GifOutput,
        Self::VideoCodec,
        Self::UpscaleResolution,
        Self::Preset,
        Self::HardwareFlags,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SourceContainer => "source_container",
            Self::GifParameters => "gif_parameters",
            Self::AudioCodec => "audio_codec",
            Self::ContainerFeatures => "container_features",
            Self::GifOutput => "gif_output",
            Self::VideoCodec => "video_codec",
            Self::UpscaleResolution => "upscale_resolution",
            Self::Preset => "preset",
            Self::HardwareFlags => "hardware_flags",
        }
    }

    pub(crate) fn apply(self, pass: &mut Pass<'_>) {
        match self {
            Self::SourceContainer => source_container(pass),
            Self::GifParameters => gif_parameters(pass),
            Self::AudioCodec => audio_codec(pass),
            Self::ContainerFeatures => container_features(pass),
            Self::GifOutput => gif_output(pass),
            Self::VideoCodec => video_codec(pass),
            Self::UpscaleResolution => upscale_resolution(pass),
            Self::Preset => preset(pass),
            Self::HardwareFlags => hardware_flags(pass),
        }
    }
}

impl fmt::Display for RepairStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn source_container(pass: &mut Pass<'_>) {
    let audio_only_source = pass.metadata.is_some_and(|meta| !meta.has_video());
    if audio_only_source && !pass.rules.is_audio_only_container(&pass.config.container) {
        let target = pass.rules.audio_only_source_container().to_string();
        pass.set("container", |c| &mut c.container, target);
    }
}

/// Round to the nearest integer and clamp into `[min, max]`.
///
/// Absent and non-finite values become `default`.
fn clamp_rounded(value: Option<f64>, default: f64, (min, max): (u16, u16)) -> f64 {
    let rounded = value.filter(|v| v.is_finite()).unwrap_or(default).round();
    let (min, max) = (f64::from(min), f64::from(max));
    // `<=` also maps -0.0 onto 0.0.
    if rounded <= min {
        min
    } else if rounded >= max {
        max
    } else {
        rounded
    }
}

fn gif_parameters(pass: &mut Pass<'_>) {
    let colors = clamp_rounded(pass.config.gif_colors, DEFAULT_GIF_COLORS, GIF_COLORS_RANGE);
    pass.set("gifColors", |c| &mut c.gif_colors, Some(colors));

    let loops = clamp_rounded(pass.config.gif_loop, DEFAULT_GIF_LOOP, GIF_LOOP_RANGE);
    pass.set("gifLoop", |c| &mut c.gif_loop, Some(loops));

    let dither = pass
        .config
        .gif_dither
        .as_deref()
        .and_then(|name| name.parse::<GifDither>().ok())
        .unwrap_or_default();
    pass.set("gifDither", |c| &mut c.gif_dither, Some(dither.as_str().to_string()));
}

fn audio_codec(pass: &mut Pass<'_>) {
    let rules = pass.rules;
    let container = &pass.config.container;
    if rules.container_supports_audio(container)
        && !rules.is_audio_codec_allowed(container, &pass.config.audio_codec)
    {
        let codec = rules.default_audio_codec(container).to_string();
        pass.set("audioCodec", |c| &mut c.audio_codec, codec);
    }
}

fn container_features(pass: &mut Pass<'_>) {
    let rules = pass.rules;
    let container = pass.config.container.clone();

    if rules.is_audio_only_container(&container) {
        pass.set("mlUpscale", |c| &mut c.ml_upscale, ML_UPSCALE_NONE.to_string());
        pass.set("selectedSubtitleTracks", |c| &mut c.selected_subtitle_tracks, Vec::new());
        pass.set("subtitleBurnPath", |c| &mut c.subtitle_burn_path, None);
    }

    if !rules.container_supports_audio(&container) {
        pass.set("selectedAudioTracks", |c| &mut c.selected_audio_tracks, Vec::new());
        pass.set("audioNormalize", |c| &mut c.audio_normalize, false);
    }

    if !rules.container_supports_subtitles(&container) {
        pass.set("selectedSubtitleTracks", |c| &mut c.selected_subtitle_tracks, Vec::new());
        pass.set("subtitleBurnPath", |c| &mut c.subtitle_burn_path, None);
    }
}

fn gif_output(pass: &mut Pass<'_>) {
    if !pass.rules.is_gif_container(&pass.config.container) {
        return;
    }

    pass.set("videoCodec", |c| &mut c.video_codec, GIF_CONTAINER.to_string());
    pass.set(
        "videoBitrateMode",
        |c| &mut c.video_bitrate_mode,
        BitrateMode::Crf.as_str().to_string(),
    );
    pass.set("mlUpscale", |c| &mut c.ml_upscale, ML_UPSCALE_NONE.to_string());
    pass.set("hwDecode", |c| &mut c.hw_decode, false);
    pass.set("nvencSpatialAq", |c| &mut c.nvenc_spatial_aq, false);
    pass.set("nvencTemporalAq", |c| &mut c.nvenc_temporal_aq, false);
    pass.set("videotoolboxAllowSw", |c| &mut c.videotoolbox_allow_sw, false);
}

fn video_codec(pass: &mut Pass<'_>) {
    let rules = pass.rules;
    let container = &pass.config.container;
    if !rules.is_audio_only_container(container)
        && !rules.is_video_codec_allowed(container, &pass.config.video_codec)
    {
        let codec = rules.first_allowed_video_codec(container);
        pass.set("videoCodec", |c| &mut c.video_codec, codec);
    }
}

fn upscale_resolution(pass: &mut Pass<'_>) {
    if pass.config.ml_upscale_enabled() && !pass.config.keeps_original_resolution() {
        pass.set("resolution", |c| &mut c.resolution, RESOLUTION_ORIGINAL.to_string());
    }
}

fn preset(pass: &mut Pass<'_>) {
    let codec = &pass.config.video_codec;
    if !is_video_preset_allowed(codec, &pass.config.preset) {
        let preset = first_allowed_preset(codec).as_str().to_string();
        pass.set("preset", |c| &mut c.preset, preset);
    }
}

fn hardware_flags(pass: &mut Pass<'_>) {
    let family = EncoderFamily::of(&pass.config.video_codec);

    if family != EncoderFamily::Nvenc {
        pass.set("nvencSpatialAq", |c| &mut c.nvenc_spatial_aq, false);
        pass.set("nvencTemporalAq", |c| &mut c.nvenc_temporal_aq, false);
    }

    if family != EncoderFamily::VideoToolbox {
        pass.set("videotoolboxAllowSw", |c| &mut c.videotoolbox_allow_sw, false);
    }

    if !family.is_hardware() {
        pass.set("hwDecode", |c| &mut c.hw_decode, false);
    }
}
