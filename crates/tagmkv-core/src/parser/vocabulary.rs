//! # Release-name vocabulary
//!
//! Static tables of the tokens that scene and p2p release tools append to
//! video filenames. Every table is lower-case. The derived sets are built once
//! per process and never mutated afterwards.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Subtitle and language markers.
pub const SUBTITLE_MARKERS: &[&str] = &[
    "sub", "subs", "subbed", "hardsub", "hardsubs", "softsub", "multisub", "multisubs",
    "engsub", "engsubs", "nlsub", "nlsubs", "vostfr", "vost", "subfrench", "eng", "ita",
    "ger", "fre", "spa", "dubbed", "dub",
];

/// Miscellaneous release markers.
pub const MISC_MARKERS: &[&str] = &[
    "proper", "repack", "rerip", "internal", "limited", "unrated", "uncut", "remastered",
    "readnfo", "nfofix", "dc", "extended", "ws", "fs", "hc",
];

/// Video/audio format and codec markers.
pub const FORMAT_MARKERS: &[&str] = &[
    "x264", "x265", "h264", "h265", "hevc", "avc", "xvid", "divx", "av1", "vp9", "10bit",
    "8bit", "hdr", "hdr10", "dv", "aac", "aac2", "ac3", "eac3", "dts", "dtshd", "truehd",
    "atmos", "flac", "mp3", "opus", "dd", "ddp", "dd5", "ddp5", "480p", "576p", "720p",
    "1080p", "2160p", "480i", "576i", "720i", "1080i", "4k", "uhd", "sdr",
];

/// Release source markers.
pub const SOURCE_MARKERS: &[&str] = &[
    "bluray", "blu", "ray", "bdrip", "brrip", "bdremux", "remux", "webrip", "webdl", "web",
    "dl", "hdtv", "pdtv", "sdtv", "dvdrip", "dvdscr", "dvd", "dvd5", "dvd9", "hdrip", "hdcam",
    "cam", "telesync", "telecine", "amzn", "nf", "dsnp", "hmax", "atvp", "hulu",
];

/// Container and video-file markers.
pub const CONTAINER_MARKERS: &[&str] = &[
    "mkv", "mka", "mk3d", "mp4", "m4v", "avi", "mov", "wmv", "mpg", "mpeg", "ts", "m2ts",
    "webm", "ogm",
];

/// Well-known release group and tracker tags.
pub const RELEASE_GROUP_MARKERS: &[&str] = &[
    "yts", "yify", "rarbg", "ettv", "eztv", "tgx", "ion10", "fgt", "sparks", "geckos", "ntb",
    "psa", "qxr", "tigole", "evo", "galaxyrg", "mkvcage",
];

/// Every token the cleaner treats as release cruft.
pub static GARBAGE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    SUBTITLE_MARKERS
        .iter()
        .chain(MISC_MARKERS)
        .chain(FORMAT_MARKERS)
        .chain(SOURCE_MARKERS)
        .chain(CONTAINER_MARKERS)
        .chain(RELEASE_GROUP_MARKERS)
        .copied()
        .collect()
});

/// Format and source markers longer than three characters, reversed.
///
/// Some release tools store names back-to-front; finding several of these in
/// a name is a strong hint that the whole string should be flipped.
pub static REVERSED_MARKERS: Lazy<HashSet<String>> = Lazy::new(|| {
    FORMAT_MARKERS
        .iter()
        .chain(SOURCE_MARKERS)
        .filter(|token| token.chars().count() > 3)
        .map(|token| token.chars().rev().collect())
        .collect()
});

/// Returns `true` if the token (any case) is release cruft.
#[must_use]
pub fn is_garbage(token: &str) -> bool {
    GARBAGE.contains(token.to_lowercase().as_str())
}

/// Returns `true` if the token (any case) is a reversed format/source marker.
#[must_use]
pub fn is_reversed_marker(token: &str) -> bool {
    REVERSED_MARKERS.contains(&token.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_union_of_tables() {
        for table in [
            SUBTITLE_MARKERS,
            MISC_MARKERS,
            FORMAT_MARKERS,
            SOURCE_MARKERS,
            CONTAINER_MARKERS,
            RELEASE_GROUP_MARKERS,
        ] {
            for token in table {
                assert!(GARBAGE.contains(token), "missing {token}");
            }
        }
    }

    #[test]
    fn tables_are_lower_case() {
        for token in GARBAGE.iter() {
            assert_eq!(*token, token.to_lowercase());
        }
    }

    #[test]
    fn lookups_ignore_case() {
        assert!(is_garbage("BluRay"));
        assert!(is_garbage("X264"));
        assert!(!is_garbage("Matrix"));
    }

    #[test]
    fn release_groups_are_cruft() {
        for group in ["YTS", "rarbg", "EZTV", "ettv", "YIFY"] {
            assert!(is_garbage(group), "{group} not treated as cruft");
        }
    }

    #[test]
    fn reversed_markers_skip_short_tokens() {
        assert!(is_reversed_marker("yarulb"));
        assert!(is_reversed_marker("462X"));
        assert!(is_reversed_marker("p0801"));
        // "web" is too short to be a reliable reversal signal.
        assert!(!is_reversed_marker("bew"));
        assert!(!is_reversed_marker("bluray"));
    }
}
