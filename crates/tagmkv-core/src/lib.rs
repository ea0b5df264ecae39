//! # tagmkv core
//!
//! Filename heuristics and a Matroska tag model for video metadata tagging.
//! Guesses title, year and episode numbering from noisy release names, reads
//! and writes `Tags` XML documents, and folds metadata lookup results into a
//! per-file record. All of it is pure and in-memory; extracting and writing
//! the tag documents is left to the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use tagmkv_core::{MediaRecord, MediaType, ParserConfig};
//!
//! let config = ParserConfig::new().with_reference_year(2026);
//! let mut record = MediaRecord::open("The.Movie.2015.1080p.BluRay.x264-GROUP.mkv", None, &config).unwrap();
//!
//! assert_eq!(record.tags().title, "The Movie");
//! assert_eq!(record.tags().year, 2015);
//! assert_eq!(record.tags().media_type, MediaType::Movie);
//!
//! record.set_description("Something happens.");
//! let xml = record.to_xml().unwrap();
//! assert!(xml.contains("<Name>DESCRIPTION</Name>"));
//! ```
pub mod error;
pub mod lookup;
pub mod parser;
pub mod record;
pub mod tags;
pub mod types;

// Re-export primary API
pub use error::{Result, TagMkvError};
pub use lookup::{GenreCatalog, LookupOutcome, MetadataProvider};
pub use parser::{FilenameCleaner, FilenameInfo, FilenameParser, ParserConfig, StructureMatcher};
pub use record::{MediaRecord, MediaTags};
pub use tags::{DecodedTags, PropertySet, TaggedProperty};
pub use types::{CastMember, CrewMember, ExternalRef, MediaType};
