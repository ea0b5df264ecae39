//! tagmkv command-line front end
//!
//! Runs the filename heuristics over names given on the command line or
//! stdin, and builds Matroska tag documents from a file name plus an optional
//! existing tag dump (as written by `mkvextract tags`).

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tagmkv_core::{FilenameParser, MediaRecord, MediaType, ParserConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tagmkv")]
#[command(about = "Guess metadata from video filenames and build Matroska tag documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Year treated as "now" for release-year validation
    #[arg(short = 'y', long, env = "TAGMKV_REFERENCE_YEAR", global = true)]
    reference_year: Option<i32>,

    /// Disable TV episode detection
    #[arg(long, env = "TAGMKV_NO_TV", global = true)]
    no_tv: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse file names and print one JSON object per name
    Parse {
        /// Names to parse; read from stdin, one per line, when empty
        names: Vec<String>,
    },
    /// Print the record for a file as JSON
    Inspect {
        file: PathBuf,

        /// Existing tag document for the file
        #[arg(short, long)]
        tags: Option<PathBuf>,
    },
    /// Write the tag document for a file
    Encode {
        file: PathBuf,

        /// Existing tag document for the file
        #[arg(short, long)]
        tags: Option<PathBuf>,

        #[command(flatten)]
        edits: EditArgs,

        /// Output path; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the known media types
    MediaTypes,
}

/// Edits applied on top of the opened record before encoding.
#[derive(Args, Debug, Default)]
struct EditArgs {
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Release date, YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,

    /// Numeric media type (9 = movie, 10 = TV show, ...)
    #[arg(long)]
    media_type: Option<u8>,

    /// Genre to add; repeatable
    #[arg(short, long = "genre")]
    genres: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ParserConfig::new().with_tv_detection(!cli.no_tv);
    if let Some(year) = cli.reference_year {
        config = config.with_reference_year(year);
    }
    let parser = FilenameParser::new(config).context("failed to build filename parser")?;

    match cli.command {
        Commands::Parse { names } => parse_names(&parser, names),
        Commands::Inspect { file, tags } => {
            let record = open_record(&parser, &file, tags.as_deref())?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, &record)?;
            writeln!(out)?;
            Ok(())
        }
        Commands::Encode {
            file,
            tags,
            edits,
            output,
        } => {
            let mut record = open_record(&parser, &file, tags.as_deref())?;
            apply_edits(&mut record, &edits)?;

            let xml = record.to_xml()?;
            match output {
                Some(path) => {
                    fs::write(&path, &xml)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    record.mark_saved();
                    info!(path = %path.display(), title = record.segment_title(), "wrote tag document");
                }
                None => io::stdout().write_all(xml.as_bytes())?,
            }
            Ok(())
        }
        Commands::MediaTypes => {
            for media_type in MediaType::all() {
                println!("{:>2}  {media_type}", media_type.code());
            }
            Ok(())
        }
    }
}

fn parse_names(parser: &FilenameParser, names: Vec<String>) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut emit = |name: &str| -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }
        serde_json::to_writer(&mut out, &parser.parse(name))?;
        writeln!(out)?;
        Ok(())
    };

    if names.is_empty() {
        for line in io::stdin().lock().lines() {
            emit(&line.context("failed to read stdin")?)?;
        }
    } else {
        for name in &names {
            emit(name)?;
        }
    }
    Ok(())
}

fn open_record(parser: &FilenameParser, file: &Path, tags: Option<&Path>) -> Result<MediaRecord> {
    if file.file_name().is_none() {
        bail!("{} has no file name", file.display());
    }
    let existing = match tags {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read tag document {}", path.display()))?,
        ),
        None => None,
    };
    debug!(file = %file.display(), has_tags = existing.is_some(), "opening record");
    Ok(MediaRecord::open_with(file, existing.as_deref(), parser))
}

fn apply_edits(record: &mut MediaRecord, edits: &EditArgs) -> Result<()> {
    if let Some(code) = edits.media_type {
        let media_type =
            MediaType::try_from(code).with_context(|| format!("invalid media type {code}"))?;
        record.set_media_type(media_type);
    }
    if let Some(title) = &edits.title {
        record.set_title(title.as_str());
    }
    if let Some(description) = &edits.description {
        record.set_description(description.as_str());
    }
    if let Some(date) = &edits.date {
        record
            .set_date_released_str(date)
            .with_context(|| format!("invalid --date {date:?}"))?;
    }
    for genre in &edits.genres {
        record.toggle_genre(genre, true);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parser() -> FilenameParser {
        FilenameParser::new(ParserConfig::new().with_reference_year(2026)).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn encode_collects_repeated_genres() {
        let cli = Cli::try_parse_from([
            "tagmkv", "encode", "Heat.1995.mkv", "-g", "Crime", "--genre", "Drama", "--media-type",
            "9", "--title", "Heat",
        ])
        .unwrap();
        let Commands::Encode { file, edits, output, .. } = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(file, PathBuf::from("Heat.1995.mkv"));
        assert_eq!(edits.genres, ["Crime", "Drama"]);
        assert_eq!(edits.media_type, Some(9));
        assert_eq!(edits.title.as_deref(), Some("Heat"));
        assert!(output.is_none());
    }

    #[test]
    fn open_record_rejects_path_without_file_name() {
        let err = open_record(&parser(), Path::new("/"), None).unwrap_err();
        assert!(err.to_string().contains("has no file name"));
    }

    #[test]
    fn open_record_reports_unreadable_tags() {
        let missing = std::env::temp_dir().join("tagmkv-missing-dir").join("tags.xml");
        let err = open_record(&parser(), Path::new("Heat.1995.mkv"), Some(&missing)).unwrap_err();
        assert!(err.to_string().starts_with("failed to read tag document"));
    }

    #[test]
    fn open_record_without_tags_uses_filename() {
        let record = open_record(&parser(), Path::new("/m/Heat.1995.mkv"), None).unwrap();
        assert_eq!(record.tags().title, "Heat");
        assert_eq!(record.tags().year, 1995);
    }

    #[test]
    fn edits_apply_to_record() {
        let mut record = open_record(&parser(), Path::new("Heat.1995.mkv"), None).unwrap();
        let edits = EditArgs {
            title: Some("Heat (1995)".into()),
            description: Some("Cops and robbers.".into()),
            date: Some("1995-12-15".into()),
            media_type: Some(9),
            genres: vec!["Crime".into(), "Crime".into(), "Drama".into()],
        };
        apply_edits(&mut record, &edits).unwrap();
        assert_eq!(record.tags().title, "Heat (1995)");
        assert_eq!(record.tags().genres, ["Crime", "Drama"]);
        assert_eq!(record.properties().value("DATE_RELEASED"), Some("1995-12-15"));
        assert!(record.is_dirty());
    }

    #[test]
    fn unknown_media_type_is_rejected() {
        let mut record = open_record(&parser(), Path::new("Heat.1995.mkv"), None).unwrap();
        let edits = EditArgs {
            media_type: Some(3),
            ..EditArgs::default()
        };
        let err = apply_edits(&mut record, &edits).unwrap_err();
        assert_eq!(err.to_string(), "invalid media type 3");
        assert_eq!(record.tags().media_type, MediaType::Movie);
    }

    #[test]
    fn bad_date_is_rejected() {
        let mut record = open_record(&parser(), Path::new("Heat.1995.mkv"), None).unwrap();
        let edits = EditArgs {
            date: Some("15/12/1995".into()),
            ..EditArgs::default()
        };
        let err = apply_edits(&mut record, &edits).unwrap_err();
        assert!(err.to_string().starts_with("invalid --date"));
        assert_eq!(record.tags().date_released, None);
    }
}
