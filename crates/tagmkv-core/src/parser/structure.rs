//! # Episode structure matcher
//!
//! Recognises `<series> S<season>E<episode> <title>.<ext>` style names.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Raw capture groups of a TV-episode filename.
///
/// Season and episode are the digit strings as they appeared; `series` and
/// `episode_title` may still contain `.`, `_` or `-` separators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeMatch {
    pub series: String,
    pub season: String,
    pub episode: String,
    pub episode_title: Option<String>,
}

/// Matches TV-episode naming patterns.
#[derive(Debug)]
pub struct StructureMatcher {
    re_with_title: Regex,
    re_bare: Regex,
}

impl StructureMatcher {
    /// Constructs a matcher with pre-compiled patterns.
    ///
    /// # Errors
    ///
    /// Returns `TagMkvError::RegexError` if any pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_with_title: Regex::new(
                r"(?i)^(?P<series>\w.*?)[\s._-]+s(?P<season>\d{1,3})[ex](?P<episode>\d{1,4})[\s._-]+(?P<title>.+?)\.(?P<ext>[a-z0-9]{2,4})$",
            )?,
            re_bare: Regex::new(
                r"(?i)^(?P<series>\w.*?)[\s._-]+s(?P<season>\d{1,3})[ex](?P<episode>\d{1,4})(?:[\s._-].*)?$",
            )?,
        })
    }

    /// Matches `file_name` (extension included) against the titled pattern,
    /// then the bare one. Returns `None` when neither applies.
    ///
    /// # Examples
    /// ```
    /// use tagmkv_core::parser::StructureMatcher;
    ///
    /// let m = StructureMatcher::new().unwrap();
    /// let hit = m.match_tv_show("Show Name S02E05 Episode Title.mkv").unwrap();
    /// assert_eq!(hit.series, "Show Name");
    /// assert_eq!(hit.episode_title.as_deref(), Some("Episode Title"));
    /// assert!(m.match_tv_show("random_movie_name.mkv").is_none());
    /// ```
    pub fn match_tv_show(&self, file_name: &str) -> Option<EpisodeMatch> {
        let file_name = file_name.trim();
        self.re_with_title
            .captures(file_name)
            .map(|c| Self::from_captures(&c, true))
            .or_else(|| {
                self.re_bare
                    .captures(file_name)
                    .map(|c| Self::from_captures(&c, false))
            })
    }

    fn from_captures(caps: &Captures<'_>, titled: bool) -> EpisodeMatch {
        let group = |name: &str| caps.name(name).map_or("", |m| m.as_str()).to_string();
        EpisodeMatch {
            series: group("series"),
            season: group("season"),
            episode: group("episode"),
            episode_title: titled.then(|| group("title")),
        }
    }
}

/// Replaces `.`, `_` and `-` with spaces and collapses whitespace runs.
#[must_use]
pub fn strip_separators(value: &str) -> String {
    value
        .replace(['.', '_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
