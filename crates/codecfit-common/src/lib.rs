//! codecfit-common: shared types and errors for the codecfit workspace.
//!
//! This crate provides the values that cross the boundary of the rule
//! engine:
//!
//! - **Conversion configuration**: the user-editable [`ConversionConfig`]
//!   that gets normalized before a transcode is submitted
//! - **Source metadata**: the [`SourceMetadata`] shape produced by an
//!   external media prober
//! - **Media enums**: presets, GIF dithering, bitrate modes
//! - **Error handling**: the common [`Error`] type and [`Result`] alias
//!
//! # Examples
//!
//! ```
//! use codecfit_common::{ConversionConfig, SourceMetadata, VideoPreset};
//!
//! let config = ConversionConfig::default();
//! assert_eq!(config.container, "mp4");
//!
//! let audio_only = SourceMetadata::default();
//! assert!(!audio_only.has_video());
//!
//! assert_eq!("medium".parse::<VideoPreset>(), Ok(VideoPreset::Medium));
//! ```

pub mod conversion;
pub mod error;
pub mod media;
pub mod source;

pub use conversion::{ConversionConfig, CropRect};
pub use error::{Error, Result};
pub use media::*;
pub use source::{SourceAudioTrack, SourceMetadata, SourceSubtitleTrack};
