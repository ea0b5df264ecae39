//! # Metadata lookup boundary
//!
//! Typed results exchanged with an online metadata service, and the drivers
//! that fold exactly one result into a [`MediaRecord`]. The service client
//! itself lives outside this crate behind [`MetadataProvider`].

pub mod genres;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TagMkvError};
use crate::record::MediaRecord;
use crate::types::{ExternalRef, MediaType};

pub use genres::GenreCatalog;

/// A named genre as the service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

impl Genre {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastCredit {
    pub name: String,
    pub character: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewCredit {
    pub name: String,
    /// Free-form job title, e.g. `Director of Photography`.
    pub job: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    pub cast: Vec<CastCredit>,
    pub crew: Vec<CrewCredit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub credits: Credits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowDetails {
    pub id: u64,
    pub name: String,
    pub overview: Option<String>,
    pub first_air_date: Option<NaiveDate>,
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeDetails {
    pub id: u64,
    pub name: String,
    pub overview: Option<String>,
    pub air_date: Option<NaiveDate>,
    pub season_number: u32,
    pub episode_number: u32,
    #[serde(default)]
    pub credits: Credits,
}

/// Which entity a search hit refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchKind {
    Movie,
    Tv,
}

/// One entry of a search result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: u64,
    pub kind: SearchKind,
    /// Movie title or show name.
    pub title: String,
    pub overview: Option<String>,
    /// Release date (movies) or first air date (shows).
    pub date: Option<NaiveDate>,
    pub poster_path: Option<String>,
}

/// Result of a search-then-fetch lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome<T> {
    /// The search returned nothing; no mutation was performed.
    NotFound,
    /// Exactly one hit, resolved to `T`.
    Found(T),
    /// Several hits; a caller must pick one and pass it to [`apply_selection`].
    Ambiguous(Vec<SearchHit>),
}

/// The online metadata service, implemented outside this crate.
pub trait MetadataProvider {
    fn search_movies(&self, query: &str) -> Result<Vec<SearchHit>>;
    fn search_shows(&self, query: &str) -> Result<Vec<SearchHit>>;
    fn movie_details(&self, id: u64) -> Result<MovieDetails>;
    fn show_details(&self, id: u64) -> Result<ShowDetails>;
    fn episode_details(&self, show_id: u64, season: u32, episode: u32) -> Result<EpisodeDetails>;
    fn movie_genres(&self) -> Result<Vec<Genre>>;
    fn tv_genres(&self) -> Result<Vec<Genre>>;
}

/// Joins genre names with `|`. `None` when there are no genres.
pub fn pack_genres<I, S>(genres: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let names: Vec<String> = genres
        .into_iter()
        .map(|g| g.as_ref().trim().to_string())
        .filter(|g| !g.is_empty())
        .collect();
    (!names.is_empty()).then(|| names.join("|"))
}

/// Splits a packed `GENRE` value back into names.
pub fn unpack_genres(packed: &str) -> Vec<String> {
    packed
        .split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

fn resolve<T>(
    hits: Vec<SearchHit>,
    fetch: impl FnOnce(&SearchHit) -> Result<T>,
) -> Result<LookupOutcome<T>> {
    match hits.len() {
        0 => Ok(LookupOutcome::NotFound),
        1 => fetch(&hits[0]).map(LookupOutcome::Found),
        _ => Ok(LookupOutcome::Ambiguous(hits)),
    }
}

/// Searches movies and fetches details when the search is unambiguous.
pub fn lookup_movie<P>(provider: &P, query: &str) -> Result<LookupOutcome<MovieDetails>>
where
    P: MetadataProvider + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Ok(LookupOutcome::NotFound);
    }
    resolve(provider.search_movies(query)?, |hit| {
        provider.movie_details(hit.id)
    })
}

/// Searches shows and fetches details when the search is unambiguous.
pub fn lookup_show<P>(provider: &P, query: &str) -> Result<LookupOutcome<ShowDetails>>
where
    P: MetadataProvider + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Ok(LookupOutcome::NotFound);
    }
    resolve(provider.search_shows(query)?, |hit| provider.show_details(hit.id))
}

/// Looks the record up by its media type and folds a single match into it.
///
/// TV episodes are searched by show name, movies by title. On success the
/// applied external reference is returned.
///
/// # Errors
///
/// Provider failures propagate. Media types other than movie and TV show
/// yield `TagMkvError::Lookup`.
pub fn lookup_record<P>(provider: &P, record: &mut MediaRecord) -> Result<LookupOutcome<ExternalRef>>
where
    P: MetadataProvider + ?Sized,
{
    let media_type = record.tags().media_type;
    match media_type {
        MediaType::TvShow => {
            let query = record.tags().show.clone().unwrap_or_default();
            match lookup_show(provider, &query)? {
                LookupOutcome::Found(show) => apply_show(provider, record, &show).map(LookupOutcome::Found),
                LookupOutcome::NotFound => Ok(LookupOutcome::NotFound),
                LookupOutcome::Ambiguous(hits) => Ok(LookupOutcome::Ambiguous(hits)),
            }
        }
        MediaType::Movie => {
            let query = record.tags().title.clone();
            match lookup_movie(provider, &query)? {
                LookupOutcome::Found(movie) => {
                    record.apply_movie(&movie);
                    Ok(LookupOutcome::Found(ExternalRef::movie(movie.id)))
                }
                LookupOutcome::NotFound => Ok(LookupOutcome::NotFound),
                LookupOutcome::Ambiguous(hits) => Ok(LookupOutcome::Ambiguous(hits)),
            }
        }
        other => Err(TagMkvError::Lookup(format!(
            "no metadata lookup for media type {other}"
        ))),
    }
}

/// Folds the hit a user picked out of an ambiguous result list.
pub fn apply_selection<P>(
    provider: &P,
    record: &mut MediaRecord,
    hit: &SearchHit,
) -> Result<ExternalRef>
where
    P: MetadataProvider + ?Sized,
{
    match hit.kind {
        SearchKind::Movie => {
            let movie = provider.movie_details(hit.id)?;
            record.apply_movie(&movie);
            Ok(ExternalRef::movie(movie.id))
        }
        SearchKind::Tv => {
            let show = provider.show_details(hit.id)?;
            apply_show(provider, record, &show)
        }
    }
}

fn apply_show<P>(provider: &P, record: &mut MediaRecord, show: &ShowDetails) -> Result<ExternalRef>
where
    P: MetadataProvider + ?Sized,
{
    let season = record.tags().season.unwrap_or(1);
    let episode = record.tags().episode.unwrap_or(1);
    let details = provider.episode_details(show.id, season, episode)?;
    info!(show = %show.name, season, episode, "applying episode metadata");
    record.apply_show_episode(show, &details);
    Ok(ExternalRef::tv(show.id))
}
