//! # Filename parser
//!
//! Combines the structure matcher and the cleaner into the defaults a media
//! record is seeded with when a file is opened.

use std::path::Path;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::parser::cleaner::FilenameCleaner;
use crate::parser::structure::{StructureMatcher, strip_separators};
use crate::types::MediaType;

/// Configuration for the filename parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Year used as "now" for release-year validation and as the default
    /// year. `None` reads the system clock.
    pub reference_year: Option<i32>,
    /// Whether to try the TV-episode patterns at all.
    pub detect_tv: bool,
    /// Media type assumed when no episode pattern matches.
    pub default_media_type: MediaType,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            reference_year: None,
            detect_tv: true,
            default_media_type: MediaType::Movie,
        }
    }
}

impl ParserConfig {
    /// Create a new parser configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the reference year.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Enable or disable TV-episode detection.
    pub fn with_tv_detection(mut self, enabled: bool) -> Self {
        self.detect_tv = enabled;
        self
    }

    /// Set the media type used for names that are not episodes.
    pub fn with_default_media_type(mut self, media_type: MediaType) -> Self {
        self.default_media_type = media_type;
        self
    }

    /// The configured reference year, or the current local year.
    #[must_use]
    pub fn resolved_year(&self) -> i32 {
        self.reference_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }
}

/// Defaults recovered from a filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilenameInfo {
    /// The file name as given (no directory).
    pub file_name: String,
    /// Extension without the dot, if any.
    pub container: Option<String>,
    /// Movie title, or the episode title for TV names.
    pub title: String,
    pub show: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    /// Release year found in the name, else the reference year.
    pub year: i32,
    /// Whether `year` came from the name.
    pub year_from_name: bool,
    pub resolution: Option<String>,
    pub media_type: MediaType,
}

/// Parses bare filenames into record defaults.
#[derive(Debug)]
pub struct FilenameParser {
    config: ParserConfig,
    cleaner: FilenameCleaner,
    matcher: StructureMatcher,
}

impl FilenameParser {
    /// Create a new parser with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `TagMkvError::RegexError` if a pattern fails to compile.
    pub fn new(config: ParserConfig) -> Result<Self> {
        Ok(Self {
            cleaner: FilenameCleaner::new(config.resolved_year())?,
            matcher: StructureMatcher::new()?,
            config,
        })
    }

    /// Get the parser configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn cleaner(&self) -> &FilenameCleaner {
        &self.cleaner
    }

    /// Parse a file name (a bare name or a path; only the last component is
    /// used).
    ///
    /// # Examples
    /// ```
    /// use tagmkv_core::parser::{FilenameParser, ParserConfig};
    /// use tagmkv_core::MediaType;
    ///
    /// let parser = FilenameParser::new(ParserConfig::new().with_reference_year(2026)).unwrap();
    /// let info = parser.parse("The.Movie.2015.1080p.BluRay.x264-GROUP.mkv");
    /// assert_eq!(info.title, "The Movie");
    /// assert_eq!(info.year, 2015);
    /// assert_eq!(info.media_type, MediaType::Movie);
    /// ```
    pub fn parse(&self, file_name: &str) -> FilenameInfo {
        let path = Path::new(file_name);
        let base = path
            .file_name()
            .map_or_else(|| file_name.to_string(), |n| n.to_string_lossy().into_owned());
        let container = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .filter(|e| !e.contains(' ') && e.chars().any(|c| c.is_ascii_alphabetic()));
        let stem = match &container {
            Some(ext) => base[..base.len() - ext.len() - 1].to_string(),
            None => base.clone(),
        };

        let cleaned = self.cleaner.clean_detailed(&stem);
        let mut info = FilenameInfo {
            file_name: base.clone(),
            container,
            title: cleaned.title,
            show: None,
            season: None,
            episode: None,
            year: cleaned.year.unwrap_or_else(|| self.config.resolved_year()),
            year_from_name: cleaned.year.is_some(),
            resolution: cleaned.resolution,
            media_type: self.config.default_media_type,
        };

        if !self.config.detect_tv {
            return info;
        }

        let Some(hit) = self.matcher.match_tv_show(&base) else {
            return info;
        };
        let (Ok(season), Ok(episode)) = (hit.season.parse::<u32>(), hit.episode.parse::<u32>())
        else {
            return info;
        };

        debug!(file = %base, series = %hit.series, season, episode, "matched episode pattern");
        info.show = Some(strip_separators(&hit.series));
        info.season = Some(season);
        info.episode = Some(episode);
        info.title = hit
            .episode_title
            .map(|t| strip_separators(&t))
            .unwrap_or_default();
        info.media_type = MediaType::TvShow;
        info
    }
}
