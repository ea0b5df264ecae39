//! # Tag vocabulary
//!
//! The Matroska tag names this crate understands and how each one behaves
//! when written into a [`PropertySet`](super::PropertySet).

use serde::{Deserialize, Serialize};

pub const TITLE: &str = "TITLE";
pub const SHOW: &str = "SHOW";
pub const SUMMARY: &str = "SUMMARY";
pub const SEASON: &str = "SEASON";
pub const EPISODE: &str = "EPISODE";
pub const DATE_RELEASED: &str = "DATE_RELEASED";
pub const SUBTITLE: &str = "SUBTITLE";
pub const MEDIA_TYPE: &str = "MEDIA_TYPE";
pub const DESCRIPTION: &str = "DESCRIPTION";
pub const GENRE: &str = "GENRE";
/// External database reference, `namespace/id`.
pub const TMDB: &str = "TMDB";
pub const ACTOR: &str = "ACTOR";
pub const CHARACTER: &str = "CHARACTER";

/// How a tag name behaves on insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagKind {
    /// At most one per file; a new value replaces the old one in place.
    Unique,
    /// Repeatable cast entry, optionally carrying a `CHARACTER` child.
    Actor,
    /// Repeatable crew role, one entry per person.
    Crew,
}

/// Scope level written as `TargetTypeValue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetLevel {
    /// Episode, movie or track scope (50).
    Episode,
    /// Season or collection scope (60).
    Season,
}

impl TargetLevel {
    #[must_use]
    pub fn value(self) -> u32 {
        match self {
            Self::Episode => 50,
            Self::Season => 60,
        }
    }
}

/// Declarative classification of every known tag.
pub const TAG_TABLE: &[(&str, TagKind, TargetLevel)] = &[
    (TITLE, TagKind::Unique, TargetLevel::Episode),
    (SHOW, TagKind::Unique, TargetLevel::Season),
    (SUMMARY, TagKind::Unique, TargetLevel::Season),
    (SEASON, TagKind::Unique, TargetLevel::Season),
    (EPISODE, TagKind::Unique, TargetLevel::Episode),
    (DATE_RELEASED, TagKind::Unique, TargetLevel::Episode),
    (SUBTITLE, TagKind::Unique, TargetLevel::Episode),
    (MEDIA_TYPE, TagKind::Unique, TargetLevel::Episode),
    (DESCRIPTION, TagKind::Unique, TargetLevel::Episode),
    (GENRE, TagKind::Unique, TargetLevel::Episode),
    (TMDB, TagKind::Unique, TargetLevel::Episode),
    (ACTOR, TagKind::Actor, TargetLevel::Episode),
    ("DIRECTOR", TagKind::Crew, TargetLevel::Episode),
    ("ASSISTANT_DIRECTOR", TagKind::Crew, TargetLevel::Episode),
    ("DIRECTOR_OF_PHOTOGRAPHY", TagKind::Crew, TargetLevel::Episode),
    ("WRITER", TagKind::Crew, TargetLevel::Episode),
    ("CASTING", TagKind::Crew, TargetLevel::Episode),
    ("EXECUTIVE_PRODUCER", TagKind::Crew, TargetLevel::Episode),
    ("SCREENPLAY", TagKind::Crew, TargetLevel::Episode),
    ("ORIGINAL_MUSIC_COMPOSER", TagKind::Crew, TargetLevel::Episode),
    ("ART_DIRECTION", TagKind::Crew, TargetLevel::Episode),
];

fn lookup(name: &str) -> Option<&'static (&'static str, TagKind, TargetLevel)> {
    let name = name.trim();
    TAG_TABLE.iter().find(|(n, _, _)| n.eq_ignore_ascii_case(name))
}

/// Classifies a tag name (case-insensitive). `None` for unknown names.
#[must_use]
pub fn classify(name: &str) -> Option<TagKind> {
    lookup(name).map(|(_, kind, _)| *kind)
}

/// Canonical upper-case spelling of a known tag name.
#[must_use]
pub fn canonical(name: &str) -> Option<&'static str> {
    lookup(name).map(|(n, _, _)| *n)
}

/// Target level for a tag name; unknown names land at episode scope.
#[must_use]
pub fn target_level(name: &str) -> TargetLevel {
    lookup(name).map_or(TargetLevel::Episode, |(_, _, level)| *level)
}

#[must_use]
pub fn is_unique(name: &str) -> bool {
    classify(name) == Some(TagKind::Unique)
}

/// Known crew role tag names, in table order.
pub fn crew_roles() -> impl Iterator<Item = &'static str> {
    TAG_TABLE
        .iter()
        .filter(|(_, kind, _)| *kind == TagKind::Crew)
        .map(|(name, _, _)| *name)
}

/// Converts a free-form job title (`Director of Photography`) to a tag
/// name (`DIRECTOR_OF_PHOTOGRAPHY`).
#[must_use]
pub fn job_to_tag_name(job: &str) -> String {
    job.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("title"), Some(TagKind::Unique));
        assert_eq!(classify("Actor"), Some(TagKind::Actor));
        assert_eq!(classify(" writer "), Some(TagKind::Crew));
        assert_eq!(classify("COMPOSER"), None);
        assert_eq!(canonical("tmdb"), Some(TMDB));
    }

    #[test]
    fn season_scope_tags() {
        let season: Vec<_> = TAG_TABLE
            .iter()
            .filter(|(_, _, level)| *level == TargetLevel::Season)
            .map(|(name, _, _)| *name)
            .collect();
        assert_eq!(season, [SHOW, SUMMARY, SEASON]);
        assert_eq!(target_level("UNKNOWN_TAG"), TargetLevel::Episode);
        assert_eq!(TargetLevel::Season.value(), 60);
        assert_eq!(TargetLevel::Episode.value(), 50);
    }

    #[test]
    fn nine_crew_roles() {
        assert_eq!(crew_roles().count(), 9);
        assert!(crew_roles().any(|r| r == "ORIGINAL_MUSIC_COMPOSER"));
    }

    #[test]
    fn job_titles_map_to_tag_names() {
        assert_eq!(job_to_tag_name("Director of Photography"), "DIRECTOR_OF_PHOTOGRAPHY");
        assert_eq!(job_to_tag_name("Writer"), "WRITER");
        assert_eq!(classify(&job_to_tag_name("Original Music Composer")), Some(TagKind::Crew));
    }
}
