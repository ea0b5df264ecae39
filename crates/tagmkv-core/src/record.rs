//! # Media record
//!
//! The per-file aggregate. A record is seeded from the file name, enriched
//! with whatever tags the file already carries, and then mutated by user
//! edits and lookup results.
//!
//! Every mutation updates both the semantic [`MediaTags`] view and the
//! [`PropertySet`] that gets encoded, so the two never diverge.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, TagMkvError};
use crate::lookup::{Credits, EpisodeDetails, MovieDetails, ShowDetails, pack_genres};
use crate::parser::{FilenameInfo, FilenameParser, ParserConfig};
use crate::tags::schema::{self, TagKind};
use crate::tags::property::into_xml_safe;
use crate::tags::{DecodedTags, PropertySet, TaggedProperty, decode_or_empty, encode};
use crate::types::{CastMember, CrewMember, ExternalRef, MediaType};

/// Date format used by `DATE_RELEASED`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Semantic view of a record's metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTags {
    pub title: String,
    pub show: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub year: i32,
    pub resolution: Option<String>,
    pub media_type: MediaType,
    pub date_released: Option<NaiveDate>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub subtitle: Option<String>,
    pub genres: Vec<String>,
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
    pub external_ref: Option<ExternalRef>,
}

/// Metadata for one container file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    source_path: PathBuf,
    file_name: String,
    container: Option<String>,
    tags: MediaTags,
    properties: PropertySet,
    #[serde(skip)]
    dirty: bool,
}

impl MediaRecord {
    /// Opens a record: filename defaults first, then any existing tag
    /// document on top. Existing tags win over filename guesses.
    ///
    /// A missing or unreadable tag document is not an error.
    ///
    /// # Errors
    ///
    /// Returns `TagMkvError::RegexError` if the filename parser cannot be
    /// built.
    ///
    /// # Examples
    /// ```
    /// use tagmkv_core::{MediaRecord, MediaType, ParserConfig};
    ///
    /// let config = ParserConfig::new().with_reference_year(2026);
    /// let record = MediaRecord::open("/media/Show Name S02E05 Episode Title.mkv", None, &config).unwrap();
    /// assert_eq!(record.tags().media_type, MediaType::TvShow);
    /// assert_eq!(record.tags().season, Some(2));
    /// assert!(!record.is_dirty());
    /// ```
    pub fn open(
        path: impl AsRef<Path>,
        existing_tags: Option<&str>,
        config: &ParserConfig,
    ) -> Result<Self> {
        let parser = FilenameParser::new(config.clone())?;
        Ok(Self::open_with(path, existing_tags, &parser))
    }

    /// Like [`MediaRecord::open`] but reuses an existing parser.
    pub fn open_with(
        path: impl AsRef<Path>,
        existing_tags: Option<&str>,
        parser: &FilenameParser,
    ) -> Self {
        let mut record = Self::from_filename(path, parser);
        let decoded = decode_or_empty(existing_tags);
        if !decoded.is_empty() {
            record.absorb(decoded);
        }
        record.dirty = false;
        record
    }

    /// A record seeded from the file name alone.
    pub fn from_filename(path: impl AsRef<Path>, parser: &FilenameParser) -> Self {
        let path = path.as_ref();
        let info = parser.parse(&path.to_string_lossy());
        let mut record = Self {
            source_path: path.to_path_buf(),
            file_name: info.file_name.clone(),
            container: info.container.clone(),
            tags: MediaTags {
                year: info.year,
                resolution: info.resolution.clone(),
                ..MediaTags::default()
            },
            properties: PropertySet::new(),
            dirty: false,
        };
        record.seed(&info);
        record
    }

    fn seed(&mut self, info: &FilenameInfo) {
        self.set_media_type(info.media_type);
        if let Some(show) = &info.show {
            self.set_show(show.as_str());
        }
        if let Some(season) = info.season {
            self.set_season(season);
        }
        if let Some(episode) = info.episode {
            self.set_episode(episode);
        }
        self.set_title(info.title.as_str());
        self.dirty = false;
    }

    /// Folds decoded on-file tags in. Does not mark the record dirty.
    ///
    /// Values that do not parse for their typed field are dropped from the
    /// property set as well, so the filename guess survives in both views.
    fn absorb(&mut self, mut decoded: DecodedTags) {
        let mut rejected: Vec<&'static str> = Vec::new();
        for (key, value) in &decoded.fields {
            match schema::canonical(key) {
                Some(schema::TITLE) => self.tags.title = value.clone(),
                Some(schema::SHOW) => self.tags.show = Some(value.clone()),
                Some(schema::SUMMARY) => self.tags.summary = Some(value.clone()),
                Some(schema::SUBTITLE) => self.tags.subtitle = Some(value.clone()),
                Some(schema::DESCRIPTION) => self.tags.description = Some(value.clone()),
                Some(schema::SEASON) => match value.parse() {
                    Ok(season) => self.tags.season = Some(season),
                    Err(_) => {
                        warn!(value = %value, "ignoring non-numeric SEASON");
                        rejected.push(schema::SEASON);
                    }
                },
                Some(schema::EPISODE) => match value.parse() {
                    Ok(episode) => self.tags.episode = Some(episode),
                    Err(_) => {
                        warn!(value = %value, "ignoring non-numeric EPISODE");
                        rejected.push(schema::EPISODE);
                    }
                },
                Some(schema::DATE_RELEASED) => match parse_date(value) {
                    Ok(date) => {
                        self.tags.date_released = Some(date);
                        self.tags.year = date.year();
                    }
                    Err(err) => {
                        warn!(%err, "ignoring DATE_RELEASED");
                        rejected.push(schema::DATE_RELEASED);
                    }
                },
                Some(schema::MEDIA_TYPE) => match value.parse() {
                    Ok(media_type) => self.tags.media_type = media_type,
                    Err(err) => {
                        warn!(%err, "ignoring MEDIA_TYPE");
                        rejected.push(schema::MEDIA_TYPE);
                    }
                },
                _ => {}
            }
        }
        if !decoded.genres.is_empty() {
            self.tags.genres = decoded.genres;
        }
        if decoded.external_ref.is_some() {
            self.tags.external_ref = decoded.external_ref;
        }
        for member in decoded.cast {
            if !self.tags.cast.contains(&member) {
                self.tags.cast.push(member);
            }
        }
        for member in decoded.crew {
            if !self.tags.crew.contains(&member) {
                self.tags.crew.push(member);
            }
        }
        for name in rejected {
            decoded.properties.remove(name);
        }
        self.properties.merge(decoded.properties);
        debug!(file = %self.file_name, properties = self.properties.len(), "merged existing tags");
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Container extension, without the dot.
    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    pub fn tags(&self) -> &MediaTags {
        &self.tags
    }

    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Call after the encoded document was written successfully.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Title for the container's segment info.
    #[must_use]
    pub fn segment_title(&self) -> &str {
        &self.tags.title
    }

    /// Encodes the record's properties as a tag document.
    ///
    /// # Errors
    ///
    /// Returns `TagMkvError::XmlWrite` if the document cannot be written.
    pub fn to_xml(&self) -> Result<String> {
        encode(self)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = into_xml_safe(title.into());
        self.put(schema::TITLE, Some(title.clone()));
        self.tags.title = title;
    }

    pub fn set_show(&mut self, show: impl Into<String>) {
        let show = non_blank(show.into());
        self.put(schema::SHOW, show.clone());
        self.tags.show = show;
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) {
        let summary = non_blank(summary.into());
        self.put(schema::SUMMARY, summary.clone());
        self.tags.summary = summary;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = non_blank(description.into());
        self.put(schema::DESCRIPTION, description.clone());
        self.tags.description = description;
    }

    pub fn set_subtitle(&mut self, subtitle: impl Into<String>) {
        let subtitle = non_blank(subtitle.into());
        self.put(schema::SUBTITLE, subtitle.clone());
        self.tags.subtitle = subtitle;
    }

    pub fn set_season(&mut self, season: u32) {
        self.put(schema::SEASON, Some(season.to_string()));
        self.tags.season = Some(season);
    }

    pub fn set_episode(&mut self, episode: u32) {
        self.put(schema::EPISODE, Some(episode.to_string()));
        self.tags.episode = Some(episode);
    }

    /// Sets the release date; the record's year follows it.
    pub fn set_date_released(&mut self, date: NaiveDate) {
        self.put(
            schema::DATE_RELEASED,
            Some(date.format(DATE_FORMAT).to_string()),
        );
        self.tags.date_released = Some(date);
        self.tags.year = date.year();
    }

    /// Parses `YYYY-MM-DD` and sets the release date.
    ///
    /// # Errors
    ///
    /// Returns `TagMkvError::InvalidDate` if the text is not a valid date.
    pub fn set_date_released_str(&mut self, date: &str) -> Result<()> {
        let date = parse_date(date)?;
        self.set_date_released(date);
        Ok(())
    }

    pub fn set_media_type(&mut self, media_type: MediaType) {
        self.put(schema::MEDIA_TYPE, Some(media_type.code().to_string()));
        self.tags.media_type = media_type;
    }

    pub fn set_external_ref(&mut self, reference: ExternalRef) {
        self.put(schema::TMDB, Some(reference.to_string()));
        self.tags.external_ref = Some(reference);
    }

    /// Replaces the genre list.
    pub fn set_genres(&mut self, genres: Vec<String>) {
        let genres: Vec<String> = genres.into_iter().map(into_xml_safe).collect();
        self.put(schema::GENRE, pack_genres(&genres));
        self.tags.genres = genres;
    }

    /// Selects or deselects one genre, keeping the order of the others.
    pub fn toggle_genre(&mut self, genre: &str, selected: bool) {
        let mut genres = self.tags.genres.clone();
        let present = genres.iter().any(|g| g == genre);
        match (selected, present) {
            (true, false) => genres.push(genre.to_string()),
            (false, true) => genres.retain(|g| g != genre),
            _ => return,
        }
        self.set_genres(genres);
    }

    /// Adds a cast entry. Returns `false` if an equal entry already exists.
    pub fn add_cast(&mut self, member: CastMember) -> bool {
        let member = CastMember::new(
            into_xml_safe(member.actor),
            member.character.map(into_xml_safe),
        );
        let property = TaggedProperty::actor(member.actor.as_str(), member.character.as_deref());
        if self.properties.contains(&property) {
            return false;
        }
        self.properties.set(property);
        self.tags.cast.push(member);
        self.touch();
        true
    }

    /// Adds a crew entry under its role tag. Returns `false` for roles outside
    /// the crew vocabulary and for duplicates.
    pub fn add_crew(&mut self, member: CrewMember) -> bool {
        let Some(job) = schema::canonical(&member.job)
            .filter(|job| schema::classify(job) == Some(TagKind::Crew))
        else {
            debug!(job = %member.job, "not a known crew role");
            return false;
        };
        let property = TaggedProperty::new(job, member.person);
        if self.properties.contains(&property) {
            return false;
        }
        self.properties.set(property.clone());
        self.tags.crew.push(CrewMember::new(job, property.value.clone()));
        self.touch();
        true
    }

    /// Replaces all cast entries.
    pub fn set_cast(&mut self, cast: Vec<CastMember>) {
        self.properties.remove(schema::ACTOR);
        self.tags.cast.clear();
        self.touch();
        for member in cast {
            self.add_cast(member);
        }
    }

    /// Replaces all crew entries, across every role.
    pub fn set_crew(&mut self, crew: Vec<CrewMember>) {
        for role in schema::crew_roles() {
            self.properties.remove(role);
        }
        self.tags.crew.clear();
        self.touch();
        for member in crew {
            self.add_crew(member);
        }
    }

    /// Removes every property with the given tag name and resets the matching
    /// field. Returns `false` for unknown names or if nothing was set.
    pub fn clear(&mut self, name: &str) -> bool {
        let Some(name) = schema::canonical(name) else {
            return false;
        };
        let removed = self.properties.remove(name) > 0;
        match name {
            schema::TITLE => self.tags.title.clear(),
            schema::SHOW => self.tags.show = None,
            schema::SUMMARY => self.tags.summary = None,
            schema::SEASON => self.tags.season = None,
            schema::EPISODE => self.tags.episode = None,
            schema::DATE_RELEASED => self.tags.date_released = None,
            schema::SUBTITLE => self.tags.subtitle = None,
            schema::MEDIA_TYPE => self.tags.media_type = MediaType::default(),
            schema::DESCRIPTION => self.tags.description = None,
            schema::GENRE => self.tags.genres.clear(),
            schema::TMDB => self.tags.external_ref = None,
            schema::ACTOR => self.tags.cast.clear(),
            role => self.tags.crew.retain(|c| c.job != role),
        }
        if removed {
            self.touch();
        }
        removed
    }

    /// Folds one movie result in.
    pub fn apply_movie(&mut self, movie: &MovieDetails) {
        info!(id = movie.id, title = %movie.title, "applying movie metadata");
        self.set_media_type(MediaType::Movie);
        self.set_external_ref(ExternalRef::movie(movie.id));
        self.set_title(movie.title.as_str());
        if let Some(overview) = &movie.overview {
            self.set_description(overview.as_str());
        }
        if let Some(date) = movie.release_date {
            self.set_date_released(date);
        }
        self.set_genres(movie.genres.iter().map(|g| g.name.clone()).collect());
        self.apply_credits(&movie.credits);
    }

    /// Folds one show and one of its episodes in.
    pub fn apply_show_episode(&mut self, show: &ShowDetails, episode: &EpisodeDetails) {
        self.set_media_type(MediaType::TvShow);
        self.set_external_ref(ExternalRef::tv(show.id));
        self.set_show(show.name.as_str());
        if let Some(overview) = &show.overview {
            self.set_summary(overview.as_str());
        }
        self.set_genres(show.genres.iter().map(|g| g.name.clone()).collect());

        self.set_season(episode.season_number);
        self.set_episode(episode.episode_number);
        self.set_title(episode.name.as_str());
        if let Some(overview) = &episode.overview {
            self.set_description(overview.as_str());
        }
        if let Some(date) = episode.air_date {
            self.set_date_released(date);
        }
        self.apply_credits(&episode.credits);
    }

    /// Replaces cast and crew with the result's, when it has any.
    fn apply_credits(&mut self, credits: &Credits) {
        if !credits.cast.is_empty() {
            self.set_cast(
                credits
                    .cast
                    .iter()
                    .map(|c| CastMember::new(c.name.as_str(), c.character.clone()))
                    .collect(),
            );
        }
        let crew: Vec<CrewMember> = credits
            .crew
            .iter()
            .filter_map(|c| {
                let job = schema::job_to_tag_name(&c.job);
                (schema::classify(&job) == Some(TagKind::Crew))
                    .then(|| CrewMember::new(job, c.name.as_str()))
            })
            .collect();
        if !crew.is_empty() {
            self.set_crew(crew);
        }
    }

    /// Writes or removes a unique property and marks the record dirty.
    fn put(&mut self, name: &str, value: Option<String>) {
        match value.filter(|v| !v.trim().is_empty()) {
            Some(value) => self.properties.set(TaggedProperty::new(name, value)),
            None => {
                self.properties.remove(name);
            }
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.dirty = true;
    }
}

fn non_blank(value: String) -> Option<String> {
    let value = into_xml_safe(value);
    (!value.trim().is_empty()).then_some(value)
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| TagMkvError::InvalidDate {
        value: value.to_string(),
    })
}
