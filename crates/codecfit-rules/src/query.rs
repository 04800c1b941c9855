//! Compatibility queries over a [`RuleTable`].
//!
//! Container ids are matched case-insensitively; codec ids are matched
//! exactly. None of these lookups can fail: gaps in the rule data fall
//! back to built-in values.

use std::collections::BTreeSet;

use crate::table::{AudioCodecRule, RuleTable, BUILTIN_VIDEO_CODEC};

/// Container id of the animated GIF output format.
pub const GIF_CONTAINER: &str = "gif";

fn container_key(container: &str) -> String {
    container.to_ascii_lowercase()
}

impl RuleTable {
    /// All supported containers, in table order.
    pub fn containers(&self) -> &[String] {
        &self.all_containers
    }

    /// Containers that can carry a video stream.
    pub fn video_containers(&self) -> impl Iterator<Item = &str> + '_ {
        self.all_containers
            .iter()
            .filter(|container| !self.audio_only_containers.contains(*container))
            .map(String::as_str)
    }

    /// Global video codec preference order.
    pub fn video_codec_fallback_order(&self) -> &[String] {
        &self.video_codec_fallback_order
    }

    /// Container forced when the source has no video stream.
    pub fn audio_only_source_container(&self) -> &str {
        &self.audio_only_source_container
    }

    pub fn is_audio_only_container(&self, container: &str) -> bool {
        self.audio_only_containers
            .contains(&container_key(container))
    }

    pub fn is_gif_container(&self, container: &str) -> bool {
        container.eq_ignore_ascii_case(GIF_CONTAINER)
    }

    /// Whether the container can carry an audio stream at all.
    pub fn container_supports_audio(&self, container: &str) -> bool {
        !self.silent_containers.contains(&container_key(container))
    }

    /// Whether the container can carry subtitle streams.
    ///
    /// Without a `subtitleContainers` list, every container that carries
    /// both video and audio is assumed to accept subtitles.
    pub fn container_supports_subtitles(&self, container: &str) -> bool {
        let key = container_key(container);
        match &self.subtitle_containers {
            Some(containers) => containers.contains(&key),
            None => {
                !self.audio_only_containers.contains(&key) && !self.silent_containers.contains(&key)
            }
        }
    }

    /// Admissible video codecs, or `None` if the container is unconstrained.
    pub fn allowed_video_codecs(&self, container: &str) -> Option<&BTreeSet<String>> {
        self.video_codecs.get(&container_key(container))
    }

    /// Admissible audio codecs, or `None` if the container is unconstrained.
    pub fn allowed_audio_codecs(&self, container: &str) -> Option<&AudioCodecRule> {
        self.audio_codecs.get(&container_key(container))
    }

    pub fn is_video_codec_allowed(&self, container: &str, codec: &str) -> bool {
        match self.allowed_video_codecs(container) {
            Some(allowed) => allowed.contains(codec),
            None => true,
        }
    }

    pub fn is_audio_codec_allowed(&self, container: &str, codec: &str) -> bool {
        match self.allowed_audio_codecs(container) {
            Some(rule) => rule.admits(codec),
            None => true,
        }
    }

    /// Audio codec to substitute when the configured one is inadmissible.
    pub fn default_audio_codec(&self, container: &str) -> &str {
        self.default_audio_codecs
            .get(&container_key(container))
            .map(String::as_str)
            .unwrap_or(&self.default_audio_codec_fallback)
    }

    /// First codec of the global fallback order admissible for `container`.
    ///
    /// See [`RuleTable::first_allowed_video_codec_from`].
    pub fn first_allowed_video_codec(&self, container: &str) -> String {
        self.first_allowed_video_codec_from(container, &self.video_codec_fallback_order)
    }

    /// First of `candidates` admissible for `container`.
    ///
    /// - container unconstrained, or its codec set empty: the first
    ///   candidate (then the fallback order's head, then `libx264`)
    /// - no candidate admissible: the lexicographically smallest member of
    ///   the container's codec set
    pub fn first_allowed_video_codec_from<S: AsRef<str>>(
        &self,
        container: &str,
        candidates: &[S],
    ) -> String {
        let head = candidates
            .first()
            .map(|codec| codec.as_ref())
            .or_else(|| self.video_codec_fallback_order.first().map(String::as_str))
            .unwrap_or(BUILTIN_VIDEO_CODEC);

        let allowed = match self.allowed_video_codecs(container) {
            Some(allowed) if !allowed.is_empty() => allowed,
            _ => return head.to_string(),
        };

        candidates
            .iter()
            .map(|codec| codec.as_ref())
            .find(|codec| allowed.contains(*codec))
            .or_else(|| allowed.first().map(String::as_str))
            .unwrap_or(head)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::test_fixtures::SMALL_RULES;

    fn table() -> RuleTable {
        RuleTable::from_json(SMALL_RULES).unwrap()
    }

    #[test]
    fn audio_only_is_case_insensitive() {
        let table = table();
        assert!(table.is_audio_only_container("mp3"));
        assert!(table.is_audio_only_container("MP3"));
        assert!(table.is_audio_only_container("Wav"));
        assert!(!table.is_audio_only_container("mp4"));
        assert!(!table.is_audio_only_container("flac"));
    }

    #[test]
    fn video_containers_exclude_audio_only() {
        let table = table();
        let video: Vec<&str> = table.video_containers().collect();
        assert_eq!(video, vec!["mp4", "mkv", "webm", "gif"]);
    }

    #[test]
    fn video_codec_admissibility() {
        let table = table();
        assert!(table.is_video_codec_allowed("MP4", "libx265"));
        assert!(!table.is_video_codec_allowed("mp4", "vp9"));
        // Codec ids are exact.
        assert!(!table.is_video_codec_allowed("mp4", "LIBX264"));
        // No entry means unconstrained.
        assert!(table.is_video_codec_allowed("mkv", "anything"));
    }

    #[test]
    fn audio_codec_admissibility() {
        let table = table();
        assert!(table.is_audio_codec_allowed("mp4", "aac"));
        assert!(!table.is_audio_codec_allowed("mp4", "libopus"));
        assert!(table.is_audio_codec_allowed("mkv", "truehd"));
        assert!(table.is_audio_codec_allowed("gif", "aac"));
        assert!(table.is_audio_codec_allowed("Mp3", "mp3"));
    }

    #[test]
    fn default_audio_codec_uses_fallback() {
        let table = table();
        assert_eq!(table.default_audio_codec("webm"), "libopus");
        assert_eq!(table.default_audio_codec("MP4"), "aac");
        assert_eq!(table.default_audio_codec("mkv"), "flac");
        assert_eq!(table.default_audio_codec("unknown"), "flac");
    }

    #[test]
    fn container_capabilities() {
        let table = table();
        assert!(!table.container_supports_audio("GIF"));
        assert!(table.container_supports_audio("mp4"));
        assert!(table.container_supports_subtitles("mkv"));
        assert!(!table.container_supports_subtitles("webm"));
        assert!(!table.container_supports_subtitles("mp3"));
        assert!(table.is_gif_container("GIF"));
        assert!(!table.is_gif_container("gifv"));
    }

    #[test]
    fn subtitle_support_without_explicit_list() {
        let json = r#"{
            "allContainers": ["mp4", "gif", "mp3"],
            "audioOnlyContainers": ["mp3"],
            "silentContainers": ["gif"],
            "containerVideoCodecCompatibility": {},
            "containerAudioCodecCompatibility": {},
            "defaultAudioCodec": {},
            "videoCodecFallbackOrder": ["libx264"]
        }"#;
        let table = RuleTable::from_json(json).unwrap();
        assert!(table.container_supports_subtitles("mp4"));
        assert!(!table.container_supports_subtitles("gif"));
        assert!(!table.container_supports_subtitles("mp3"));
    }

    #[test]
    fn first_allowed_prefers_fallback_order() {
        let table = table();
        assert_eq!(table.first_allowed_video_codec("mp4"), "libx264");
        assert_eq!(table.first_allowed_video_codec("webm"), "vp9");
    }

    #[test]
    fn first_allowed_unconstrained_returns_head() {
        let table = table();
        assert_eq!(table.first_allowed_video_codec("mkv"), "libx264");
        assert_eq!(
            table.first_allowed_video_codec_from("mkv", &["prores", "vp9"]),
            "prores"
        );
        let empty: [&str; 0] = [];
        assert_eq!(table.first_allowed_video_codec_from("mkv", &empty), "libx264");
    }

    #[test]
    fn first_allowed_without_overlap_picks_smallest_member() {
        let table = table();
        // gif admits only "gif", which is not in the fallback order.
        assert_eq!(table.first_allowed_video_codec("gif"), "gif");
        // webm admits {libsvtav1, vp9}; neither candidate matches.
        assert_eq!(
            table.first_allowed_video_codec_from("webm", &["libx264", "prores"]),
            "libsvtav1"
        );
    }

    #[test]
    fn first_allowed_with_empty_set_and_no_fallback() {
        let json = r#"{
            "allContainers": ["raw"],
            "audioOnlyContainers": [],
            "containerVideoCodecCompatibility": { "raw": [] },
            "containerAudioCodecCompatibility": {},
            "defaultAudioCodec": {},
            "videoCodecFallbackOrder": []
        }"#;
        let table = RuleTable::from_json(json).unwrap();
        assert_eq!(table.first_allowed_video_codec("raw"), BUILTIN_VIDEO_CODEC);
        assert!(!table.is_video_codec_allowed("raw", "libx264"));
    }
}
