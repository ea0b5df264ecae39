use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TagMkvError;

/// Media kind stored in the `MEDIA_TYPE` tag.
///
/// The numeric codes follow the iTunes "stik" atom, which is what most
/// players expect to find in this tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum MediaType {
    Unknown = 0,
    Music = 1,
    Audiobook = 2,
    MusicVideo = 6,
    #[default]
    Movie = 9,
    TvShow = 10,
    Booklet = 11,
    Ringtone = 14,
}

impl MediaType {
    /// Every known media type, ordered by code.
    pub fn all() -> &'static [MediaType] {
        &[
            MediaType::Unknown,
            MediaType::Music,
            MediaType::Audiobook,
            MediaType::MusicVideo,
            MediaType::Movie,
            MediaType::TvShow,
            MediaType::Booklet,
            MediaType::Ringtone,
        ]
    }

    /// The numeric tag value.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Returns `true` for episodic content.
    #[must_use]
    pub fn is_episodic(self) -> bool {
        self == MediaType::TvShow
    }
}

impl TryFrom<u8> for MediaType {
    type Error = TagMkvError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        MediaType::all()
            .iter()
            .copied()
            .find(|t| t.code() == code)
            .ok_or(TagMkvError::UnknownMediaType(code))
    }
}

impl From<MediaType> for u8 {
    fn from(media_type: MediaType) -> Self {
        media_type.code()
    }
}

impl std::str::FromStr for MediaType {
    type Err = TagMkvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code: u8 = s.trim().parse().map_err(|_| TagMkvError::UnknownMediaType(u8::MAX))?;
        MediaType::try_from(code)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Music => write!(f, "Music"),
            Self::Audiobook => write!(f, "Audiobook"),
            Self::MusicVideo => write!(f, "Music Video"),
            Self::Movie => write!(f, "Movie"),
            Self::TvShow => write!(f, "TV Show"),
            Self::Booklet => write!(f, "Booklet"),
            Self::Ringtone => write!(f, "Ringtone"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_stik_values() {
        let codes: Vec<u8> = MediaType::all().iter().map(|t| t.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 6, 9, 10, 11, 14]);
    }

    #[test]
    fn default_is_movie() {
        assert_eq!(MediaType::default(), MediaType::Movie);
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!(matches!(
            MediaType::try_from(3),
            Err(TagMkvError::UnknownMediaType(3))
        ));
        assert_eq!(MediaType::try_from(10).unwrap(), MediaType::TvShow);
    }

    #[test]
    fn parses_tag_value() {
        assert_eq!(" 10 ".parse::<MediaType>().unwrap(), MediaType::TvShow);
        assert!("movie".parse::<MediaType>().is_err());
    }

    #[test]
    fn display_names() {
        assert_eq!(MediaType::MusicVideo.to_string(), "Music Video");
        assert_eq!(MediaType::TvShow.to_string(), "TV Show");
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_string(&MediaType::TvShow).unwrap(), "10");
        let back: MediaType = serde_json::from_str("9").unwrap();
        assert_eq!(back, MediaType::Movie);
        assert!(serde_json::from_str::<MediaType>("4").is_err());
    }
}
