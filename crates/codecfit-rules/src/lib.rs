//! # codecfit-rules
//!
//! Container/codec compatibility rules and conversion config normalization.
//!
//! This crate loads a declarative rule table describing which containers
//! accept which codecs, answers compatibility questions against it, and
//! repairs arbitrary conversion configurations until they satisfy every
//! declared constraint.
//!
//! ## Overview
//!
//! - [`RuleTable`] -- immutable rule data, loaded once at startup.
//! - [`EncoderFamily`] -- hardware/software classification of video encoders.
//! - [`preset`] -- preset admissibility per encoder family.
//! - [`Normalizer`] -- the ordered repair pipeline ([`RepairStep`]).
//!
//! ```
//! use std::sync::Arc;
//! use codecfit_common::{ConversionConfig, SourceMetadata};
//! use codecfit_rules::{Normalizer, RuleTable};
//!
//! # fn main() -> codecfit_common::Result<()> {
//! let normalizer = Normalizer::new(Arc::new(RuleTable::bundled()?));
//!
//! let config = ConversionConfig {
//!     container: "gif".into(),
//!     video_codec: "libx265".into(),
//!     hw_decode: true,
//!     ..Default::default()
//! };
//! let normalized = normalizer.normalize(&config, Some(&SourceMetadata {
//!     video_codec: Some("h264".into()),
//!     ..Default::default()
//! }));
//!
//! assert_eq!(normalized.video_codec, "gif");
//! assert!(!normalized.hw_decode);
//! # Ok(())
//! # }
//! ```

pub mod encoder;
pub mod normalize;
pub mod preset;
pub mod query;
pub mod table;

pub use encoder::{video_codec_label, EncoderFamily, VideoCodecOption, VIDEO_CODEC_OPTIONS};
pub use normalize::{Adjustment, NormalizeReport, Normalizer, RepairStep};
pub use preset::{allowed_presets, first_allowed_preset, is_video_preset_allowed};
pub use query::GIF_CONTAINER;
pub use table::{AudioCodecRule, RuleTable, BUNDLED_RULES_JSON};
