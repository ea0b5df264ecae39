pub mod cleaner;
pub mod filename;
pub mod structure;
pub mod tokenizer;
pub mod vocabulary;

pub use cleaner::{CleanedName, FilenameCleaner};
pub use filename::{FilenameInfo, FilenameParser, ParserConfig};
pub use structure::{EpisodeMatch, StructureMatcher};
pub use tokenizer::{Token, Tokenizer};
