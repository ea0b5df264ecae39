//! Process-wide genre lists, fetched once per media kind.

use once_cell::sync::OnceCell;
use tracing::debug;

use super::{Genre, MetadataProvider};
use crate::error::Result;
use crate::types::MediaType;

/// Movie and TV genre lists, each loaded at most once.
///
/// Reads after the first load are lock-free and safe to share across threads.
#[derive(Debug, Default)]
pub struct GenreCatalog {
    movie: OnceCell<Vec<Genre>>,
    tv: OnceCell<Vec<Genre>>,
}

impl GenreCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog whose lists are already known.
    pub fn preloaded(movie: Vec<Genre>, tv: Vec<Genre>) -> Self {
        Self {
            movie: OnceCell::with_value(movie),
            tv: OnceCell::with_value(tv),
        }
    }

    /// Fetches whichever lists are still missing.
    pub fn load<P>(&self, provider: &P) -> Result<()>
    where
        P: MetadataProvider + ?Sized,
    {
        self.movie.get_or_try_init(|| {
            debug!("fetching movie genres");
            provider.movie_genres()
        })?;
        self.tv.get_or_try_init(|| {
            debug!("fetching tv genres");
            provider.tv_genres()
        })?;
        Ok(())
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.movie.get().is_some() && self.tv.get().is_some()
    }

    /// The TV list for episodic media, the movie list otherwise. Empty until
    /// loaded.
    #[must_use]
    pub fn for_media_type(&self, media_type: MediaType) -> &[Genre] {
        let cell = if media_type.is_episodic() {
            &self.tv
        } else {
            &self.movie
        };
        cell.get().map(Vec::as_slice).unwrap_or(&[])
    }

    /// The genre list for `media_type`, each flagged with whether `selected`
    /// names it.
    pub fn selection<'a>(
        &'a self,
        media_type: MediaType,
        selected: &[String],
    ) -> Vec<(&'a Genre, bool)> {
        self.for_media_type(media_type)
            .iter()
            .map(|genre| (genre, selected.iter().any(|s| s == &genre.name)))
            .collect()
    }
}
