//! Rule table loading.
//!
//! The rule table is plain data: which containers exist, which of them
//! are audio-only, and which codecs each container admits. It is parsed
//! from JSON once at startup, container keys are lowercased, and the
//! result is never mutated. Lookups live in [`crate::query`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use codecfit_common::{Error, Result};
use serde::Deserialize;

/// Rule data shipped with the crate.
pub const BUNDLED_RULES_JSON: &str = include_str!("../data/media-rules.json");

/// Audio codec used when neither the container nor the table names one.
pub const BUILTIN_AUDIO_CODEC: &str = "aac";

/// Video codec used when the table has no fallback order at all.
pub const BUILTIN_VIDEO_CODEC: &str = "libx264";

/// Container forced for sources without a video stream, unless the table
/// overrides it.
pub const DEFAULT_AUDIO_ONLY_SOURCE_CONTAINER: &str = "mp3";

/// Spellings of the "every codec is admissible" marker.
const ANY_CODEC_TOKENS: [&str; 2] = ["*", "any"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleTableRaw {
    all_containers: Vec<String>,
    audio_only_containers: Vec<String>,
    container_video_codec_compatibility: BTreeMap<String, Vec<String>>,
    container_audio_codec_compatibility: BTreeMap<String, Vec<String>>,
    default_audio_codec: BTreeMap<String, String>,
    #[serde(default)]
    default_audio_codec_fallback: Option<String>,
    video_codec_fallback_order: Vec<String>,
    #[serde(default)]
    silent_containers: Vec<String>,
    #[serde(default)]
    subtitle_containers: Option<Vec<String>>,
    #[serde(default)]
    audio_only_source_container: Option<String>,
}

/// Admissible audio codecs for one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCodecRule {
    /// The container accepts every audio codec.
    Any,
    /// The container accepts exactly these codecs.
    Only(BTreeSet<String>),
}

impl AudioCodecRule {
    fn from_codecs(codecs: Vec<String>) -> Self {
        if codecs
            .iter()
            .any(|codec| ANY_CODEC_TOKENS.contains(&codec.as_str()))
        {
            Self::Any
        } else {
            Self::Only(codecs.into_iter().collect())
        }
    }

    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Only(mut a), Self::Only(b)) => {
                a.extend(b);
                Self::Only(a)
            }
            _ => Self::Any,
        }
    }

    /// Whether `codec` is admissible under this rule.
    pub fn admits(&self, codec: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Only(codecs) => codecs.contains(codec),
        }
    }
}

/// Immutable compatibility rules.
///
/// Build one at startup with [`RuleTable::bundled`] or
/// [`RuleTable::from_path`] and share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RuleTable {
    pub(crate) all_containers: Vec<String>,
    pub(crate) audio_only_containers: BTreeSet<String>,
    pub(crate) silent_containers: BTreeSet<String>,
    pub(crate) subtitle_containers: Option<BTreeSet<String>>,
    pub(crate) video_codecs: BTreeMap<String, BTreeSet<String>>,
    pub(crate) audio_codecs: BTreeMap<String, AudioCodecRule>,
    pub(crate) default_audio_codecs: BTreeMap<String, String>,
    pub(crate) default_audio_codec_fallback: String,
    pub(crate) video_codec_fallback_order: Vec<String>,
    pub(crate) audio_only_source_container: String,
}

impl RuleTable {
    /// Parse a rule table from a JSON string.
    ///
    /// Missing required keys are reported as [`Error::RuleData`].
    pub fn from_json(json: &str) -> Result<Self> {
        Self::parse(json).map_err(|e| Error::rule_data(e.to_string()))
    }

    /// Load a rule table from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::RuleDataMissing(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let table = Self::parse(&contents)
            .map_err(|e| Error::rule_data(format!("{}: {}", path.display(), e)))?;

        tracing::info!(
            "Loaded rule table from {} ({} containers)",
            path.display(),
            table.all_containers.len()
        );
        Ok(table)
    }

    fn parse(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str::<RuleTableRaw>(json).map(Self::from_raw)
    }

    /// The rule table bundled with this crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_RULES_JSON)
    }

    /// Return a list of consistency warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let known: BTreeSet<&str> = self.all_containers.iter().map(String::as_str).collect();

        if self.all_containers.is_empty() {
            warnings.push("allContainers is empty".to_string());
        }

        for container in &self.audio_only_containers {
            if !known.contains(container.as_str()) {
                warnings.push(format!(
                    "audio-only container '{}' is not listed in allContainers",
                    container
                ));
            }
        }

        for container in &self.silent_containers {
            if self.audio_only_containers.contains(container) {
                warnings.push(format!(
                    "container '{}' is both audio-only and silent",
                    container
                ));
            }
        }

        for container in self.video_codecs.keys() {
            if !known.contains(container.as_str()) {
                warnings.push(format!(
                    "video compatibility entry '{}' is not listed in allContainers",
                    container
                ));
            }
        }

        for (container, codec) in &self.default_audio_codecs {
            if let Some(rule) = self.audio_codecs.get(container) {
                if !rule.admits(codec) {
                    warnings.push(format!(
                        "default audio codec '{}' is not admissible for container '{}'",
                        codec, container
                    ));
                }
            }
        }

        if self.video_codec_fallback_order.is_empty() {
            warnings.push(format!(
                "videoCodecFallbackOrder is empty; '{}' will be used",
                BUILTIN_VIDEO_CODEC
            ));
        }

        if !self
            .audio_only_containers
            .contains(&self.audio_only_source_container)
        {
            warnings.push(format!(
                "audioOnlySourceContainer '{}' is not an audio-only container",
                self.audio_only_source_container
            ));
        }

        warnings
    }
}

fn lowercase_set(containers: Vec<String>) -> BTreeSet<String> {
    containers
        .into_iter()
        .map(|container| container.to_ascii_lowercase())
        .collect()
}

impl RuleTable {
    fn from_raw(raw: RuleTableRaw) -> Self {
        let mut all_containers: Vec<String> = Vec::with_capacity(raw.all_containers.len());
        for container in raw.all_containers {
            let container = container.to_ascii_lowercase();
            if !all_containers.contains(&container) {
                all_containers.push(container);
            }
        }

        let mut video_codecs: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (container, codecs) in raw.container_video_codec_compatibility {
            video_codecs
                .entry(container.to_ascii_lowercase())
                .or_default()
                .extend(codecs);
        }

        let mut audio_codecs: BTreeMap<String, AudioCodecRule> = BTreeMap::new();
        for (container, codecs) in raw.container_audio_codec_compatibility {
            let rule = AudioCodecRule::from_codecs(codecs);
            let key = container.to_ascii_lowercase();
            let merged = match audio_codecs.remove(&key) {
                Some(existing) => existing.merge(rule),
                None => rule,
            };
            audio_codecs.insert(key, merged);
        }

        // BTreeMap iteration is sorted, so "MP4" is seen before "mp4" and the
        // lowercase spelling wins on collision.
        let default_audio_codecs = raw
            .default_audio_codec
            .into_iter()
            .map(|(container, codec)| (container.to_ascii_lowercase(), codec))
            .collect();

        let default_audio_codec_fallback = raw
            .default_audio_codec_fallback
            .filter(|codec| !codec.trim().is_empty())
            .unwrap_or_else(|| BUILTIN_AUDIO_CODEC.to_string());

        let audio_only_source_container = raw
            .audio_only_source_container
            .filter(|container| !container.trim().is_empty())
            .map(|container| container.to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_AUDIO_ONLY_SOURCE_CONTAINER.to_string());

        Self {
            all_containers,
            audio_only_containers: lowercase_set(raw.audio_only_containers),
            silent_containers: lowercase_set(raw.silent_containers),
            subtitle_containers: raw.subtitle_containers.map(lowercase_set),
            video_codecs,
            audio_codecs,
            default_audio_codecs,
            default_audio_codec_fallback,
            video_codec_fallback_order: raw.video_codec_fallback_order,
            audio_only_source_container,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    /// Small rule table with mixed-case keys and every optional key set.
    pub const SMALL_RULES: &str = r#"{
        "allContainers": ["MP4", "mkv", "webm", "gif", "mp3", "wav"],
        "audioOnlyContainers": ["MP3", "wav"],
        "silentContainers": ["gif"],
        "subtitleContainers": ["mp4", "MKV"],
        "containerVideoCodecCompatibility": {
            "Mp4": ["libx264", "libx265", "h264_nvenc", "h264_videotoolbox"],
            "webm": ["vp9", "libsvtav1"],
            "gif": ["gif"]
        },
        "containerAudioCodecCompatibility": {
            "mp4": ["aac", "ac3"],
            "mkv": ["*"],
            "webm": ["libopus"],
            "MP3": ["mp3"],
            "wav": ["pcm_s16le"]
        },
        "defaultAudioCodec": {
            "mp4": "aac",
            "WEBM": "libopus",
            "mp3": "mp3"
        },
        "defaultAudioCodecFallback": "flac",
        "videoCodecFallbackOrder": ["libx264", "libx265", "vp9"]
    }"#;
}

#[cfg(test)]
mod tests {
    use super::test_fixtures::SMALL_RULES;
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn bundled_rules_parse_cleanly() {
        let table = RuleTable::bundled().unwrap();
        assert!(table.all_containers.contains(&"mp4".to_string()));
        assert!(table.validate().is_empty(), "{:?}", table.validate());
    }

    #[test]
    fn container_keys_are_lowercased() {
        let table = RuleTable::from_json(SMALL_RULES).unwrap();
        assert_eq!(table.all_containers[0], "mp4");
        assert!(table.audio_only_containers.contains("mp3"));
        assert!(table.video_codecs.contains_key("mp4"));
        assert!(table.audio_codecs.contains_key("mp3"));
        assert!(table.default_audio_codecs.contains_key("webm"));
        assert!(table
            .subtitle_containers
            .as_ref()
            .is_some_and(|set| set.contains("mkv")));
    }

    #[test]
    fn wildcard_becomes_any_rule() {
        let table = RuleTable::from_json(SMALL_RULES).unwrap();
        assert_eq!(table.audio_codecs.get("mkv"), Some(&AudioCodecRule::Any));
        assert_matches!(table.audio_codecs.get("mp4"), Some(AudioCodecRule::Only(_)));
    }

    #[test]
    fn any_spelling_is_accepted_as_wildcard() {
        let rule = AudioCodecRule::from_codecs(vec!["aac".into(), "any".into()]);
        assert_eq!(rule, AudioCodecRule::Any);
        assert!(rule.admits("truehd"));
    }

    #[test]
    fn case_colliding_entries_are_merged() {
        let json = r#"{
            "allContainers": ["mp4"],
            "audioOnlyContainers": [],
            "containerVideoCodecCompatibility": { "MP4": ["libx265"], "mp4": ["libx264"] },
            "containerAudioCodecCompatibility": { "MP4": ["ac3"], "mp4": ["aac"] },
            "defaultAudioCodec": { "MP4": "ac3", "mp4": "aac" },
            "videoCodecFallbackOrder": ["libx264"]
        }"#;
        let table = RuleTable::from_json(json).unwrap();
        let video = &table.video_codecs["mp4"];
        assert!(video.contains("libx264") && video.contains("libx265"));
        assert!(table.audio_codecs["mp4"].admits("ac3"));
        assert!(table.audio_codecs["mp4"].admits("aac"));
        assert_eq!(table.default_audio_codecs["mp4"], "aac");
    }

    #[test]
    fn missing_required_key_is_rule_data_error() {
        let json = r#"{ "allContainers": ["mp4"], "audioOnlyContainers": [] }"#;
        let err = RuleTable::from_json(json).unwrap_err();
        assert_matches!(err, Error::RuleData(_));
        assert!(err.to_string().contains("containerVideoCodecCompatibility"));
    }

    #[test]
    fn optional_keys_fall_back_to_builtins() {
        let json = r#"{
            "allContainers": ["mp4"],
            "audioOnlyContainers": [],
            "containerVideoCodecCompatibility": {},
            "containerAudioCodecCompatibility": {},
            "defaultAudioCodec": {},
            "defaultAudioCodecFallback": "  ",
            "videoCodecFallbackOrder": []
        }"#;
        let table = RuleTable::from_json(json).unwrap();
        assert_eq!(table.default_audio_codec_fallback, BUILTIN_AUDIO_CODEC);
        assert_eq!(
            table.audio_only_source_container,
            DEFAULT_AUDIO_ONLY_SOURCE_CONTAINER
        );
        assert!(table.silent_containers.is_empty());
        assert!(table.subtitle_containers.is_none());
    }

    #[test]
    fn validate_reports_inconsistencies() {
        let json = r#"{
            "allContainers": ["mp4"],
            "audioOnlyContainers": ["ogg"],
            "containerVideoCodecCompatibility": { "avi": ["libx264"] },
            "containerAudioCodecCompatibility": { "mp4": ["aac"] },
            "defaultAudioCodec": { "mp4": "opus" },
            "videoCodecFallbackOrder": []
        }"#;
        let warnings = RuleTable::from_json(json).unwrap().validate();
        assert!(warnings.iter().any(|w| w.contains("'ogg'")));
        assert!(warnings.iter().any(|w| w.contains("'avi'")));
        assert!(warnings.iter().any(|w| w.contains("'opus'")));
        assert!(warnings.iter().any(|w| w.contains("videoCodecFallbackOrder")));
        assert!(warnings.iter().any(|w| w.contains("audioOnlySourceContainer")));
    }

    #[test]
    fn from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert_matches!(
            RuleTable::from_path(&path),
            Err(Error::RuleDataMissing(p)) if p == path
        );
    }

    #[test]
    fn from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SMALL_RULES.as_bytes()).unwrap();
        let table = RuleTable::from_path(file.path()).unwrap();
        assert_eq!(table.default_audio_codec_fallback, "flac");
    }

    #[test]
    fn from_path_reports_path_on_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let err = RuleTable::from_path(file.path()).unwrap_err();
        assert_matches!(err, Error::RuleData(_));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }
}
