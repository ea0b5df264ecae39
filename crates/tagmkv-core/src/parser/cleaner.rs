//! # Filename cleaner
//!
//! Recovers a human title from a noisy release filename. The approach is a
//! toss/keep bitmap over the tokens: release cruft is assumed to form a single
//! trailing block, so only the last occurrence of each cruft token is tossed,
//! and accumulation stops once two tossed tokens have been crossed.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::parser::tokenizer::Tokenizer;
use crate::parser::vocabulary::{is_garbage, is_reversed_marker};

/// Sentinel left where a release year was cut out of the name.
pub const YEAR_BREAK: &str = "{year}";

/// Number of tossed tokens after which accumulation stops.
const MAX_TOSSED: usize = 2;

/// Token lists this short are kept verbatim.
const KEEP_ALL_LEN: usize = 2;

const AUDIO_CHANNEL_PATTERNS: &[&str] = &[
    r"(?i)\b(?:ddp?|e?ac3|aac|dts|truehd|opus|flac)[57]\.1\b",
    r"(?i)\b[57]\.1(?:ch)?\b",
    r"(?i)\b[57]1ch\b",
];

/// Everything the cleaner recovered from one name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CleanedName {
    /// Title-cased human title.
    pub title: String,
    /// Release year cut out of the name.
    pub year: Option<i32>,
    /// Resolution token such as `1080p`.
    pub resolution: Option<String>,
    /// Last token of the cleaned name; a file extension when one was present.
    pub extension: Option<String>,
    /// Whether the name was detected as stored back-to-front.
    pub reversed: bool,
}

/// Heuristic title recovery for release filenames.
#[derive(Debug)]
pub struct FilenameCleaner {
    reference_year: i32,
    tokenizer: Tokenizer,
    re_year: Regex,
    re_resolution: Regex,
    re_brackets: Regex,
    re_audio: Vec<Regex>,
}

impl FilenameCleaner {
    /// Constructs a cleaner. Years after `reference_year + 1` are not
    /// treated as release years.
    ///
    /// # Errors
    ///
    /// Returns `TagMkvError::RegexError` if any pattern fails to compile
    /// (should never happen with the static patterns defined here).
    pub fn new(reference_year: i32) -> Result<Self> {
        Ok(Self {
            reference_year,
            tokenizer: Tokenizer::new(),
            re_year: Regex::new(r"([(\[ .\-])([0-9]{4})([.\-)\]_,+ ]|$)")?,
            re_resolution: Regex::new(r"(?:^|[^0-9a-z])([0-9]{3,4}[ip])(?:$|[^0-9a-z])")?,
            re_brackets: Regex::new(r"\[[^\[\]]*\]")?,
            re_audio: AUDIO_CHANNEL_PATTERNS
                .iter()
                .map(|p| Regex::new(p))
                .collect::<std::result::Result<_, _>>()?,
        })
    }

    /// Returns only the recovered title.
    ///
    /// # Examples
    /// ```
    /// use tagmkv_core::parser::FilenameCleaner;
    ///
    /// let cleaner = FilenameCleaner::new(2026).unwrap();
    /// assert_eq!(cleaner.clean("The.Movie.2015.1080p.BluRay.x264-GROUP"), "The Movie");
    /// ```
    pub fn clean(&self, raw: &str) -> String {
        self.clean_detailed(raw).title
    }

    /// Runs the full cleanup and returns everything recovered along the way.
    pub fn clean_detailed(&self, raw: &str) -> CleanedName {
        let mut result = CleanedName::default();

        let raw = raw.trim();
        let initial = self.tokenizer.tokenize_lower(raw);

        let name = if self.looks_reversed(&initial) {
            debug!(input = raw, "name looks reversed, flipping before cleanup");
            result.reversed = true;
            raw.chars().rev().collect()
        } else {
            raw.to_string()
        };

        let (name, year) = self.excise_year(&name);
        result.year = year;

        let name: String = name.nfkc().collect();
        let lower = name.to_lowercase();
        result.resolution = self
            .re_resolution
            .captures(&lower)
            .map(|c| c[1].to_string());

        let mut name = self.strip_brackets(name);
        for re in &self.re_audio {
            name = re.replace_all(&name, " ").into_owned();
        }

        let tokens: Vec<String> = self
            .tokenizer
            .tokenize(&name)
            .into_iter()
            .map(|t| t.text)
            .collect();
        result.extension = tokens
            .last()
            .filter(|t| t.as_str() != YEAR_BREAK)
            .cloned();

        let kept = accumulate(&tokens, &toss_bitmap(&tokens));
        result.title = if kept.is_empty() {
            // Everything was cruft: fall back to the first token of the raw name.
            initial.first().map(|t| title_case(t)).unwrap_or_default()
        } else {
            kept.join(" ")
        };

        debug!(input = raw, title = %result.title, "cleaned filename");
        result
    }

    /// More than two reversed format/source markers means the name was
    /// stored back-to-front. Best effort only.
    fn looks_reversed(&self, tokens: &[String]) -> bool {
        let distinct: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        distinct
            .iter()
            .filter(|t| is_reversed_marker(t))
            .count()
            > 2
    }

    /// Cuts the first plausible release year out of the name, leaving a
    /// [`YEAR_BREAK`] token in its place.
    fn excise_year(&self, name: &str) -> (String, Option<i32>) {
        let valid = 1901..=self.reference_year + 1;
        let mut start = 0;
        // The closing delimiter of one candidate may open the next, so resume
        // the search right after the digits rather than after the match.
        while let Some(caps) = self.re_year.captures_at(name, start) {
            let (Some(whole), Some(digits)) = (caps.get(0), caps.get(2)) else {
                break;
            };
            start = digits.end();
            let Ok(year) = digits.as_str().parse::<i32>() else {
                continue;
            };
            if !valid.contains(&year) {
                continue;
            }
            let mut out = String::with_capacity(name.len() + YEAR_BREAK.len());
            out.push_str(&name[..whole.start()]);
            out.push(' ');
            out.push_str(YEAR_BREAK);
            out.push(' ');
            out.push_str(&name[whole.end()..]);
            debug!(year, "excised release year");
            return (out, Some(year));
        }
        (name.to_string(), None)
    }

    fn strip_brackets(&self, mut name: String) -> String {
        loop {
            let stripped = self.re_brackets.replace_all(&name, " ").into_owned();
            if stripped == name {
                return name;
            }
            name = stripped;
        }
    }
}

/// Marks tokens to toss, scanning right to left. Only the first occurrence
/// of each cruft token seen from the end is tossed.
fn toss_bitmap(tokens: &[String]) -> Vec<bool> {
    let mut seen = HashSet::new();
    let mut toss = vec![false; tokens.len()];
    for (idx, token) in tokens.iter().enumerate().rev() {
        if is_garbage(token) && seen.insert(token.to_lowercase()) {
            toss[idx] = true;
        }
    }
    toss
}

/// Collects title tokens left to right.
fn accumulate(tokens: &[String], toss: &[bool]) -> Vec<String> {
    let keep_all = tokens.len() <= KEEP_ALL_LEN;
    let mut tossed = 0;
    let mut kept = Vec::new();

    for (idx, token) in tokens.iter().enumerate() {
        if token == YEAR_BREAK {
            if idx == 0 {
                continue;
            }
            break;
        }
        if tossed >= MAX_TOSSED {
            break;
        }
        if keep_all || !toss[idx] {
            kept.push(title_case(token));
            continue;
        }
        if token.eq_ignore_ascii_case("dc") {
            let comics = tokens
                .get(idx + 1)
                .is_some_and(|next| matches!(next.to_lowercase().as_str(), "comic" | "comics"));
            kept.push(if comics { "DC" } else { "(Director's cut)" }.to_string());
            continue;
        }
        tossed += 1;
    }

    kept
}

/// Capitalizes the first letter of each letter run. Letters following an
/// apostrophe or a digit stay lower-case.
pub fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut prev: Option<char> = None;
    for c in word.chars() {
        let starts_run = !prev.is_some_and(|p| p.is_alphanumeric() || p == '\'' || p == '\u{2019}');
        if c.is_alphabetic() && starts_run {
            out.extend(c.to_uppercase());
        } else if c.is_alphabetic() {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> FilenameCleaner {
        FilenameCleaner::new(2026).unwrap()
    }

    #[test]
    fn scene_release_name() {
        let r = cleaner().clean_detailed("The.Movie.2015.1080p.BluRay.x264-GROUP");
        assert_eq!(r.title, "The Movie");
        assert_eq!(r.year, Some(2015));
        assert_eq!(r.resolution.as_deref(), Some("1080p"));
        assert!(!r.reversed);
    }

    #[test]
    fn reversed_name_is_flipped() {
        let r = cleaner().clean_detailed("462x.yarulb.p0801.eivoM.ehT");
        assert!(r.reversed);
        assert_eq!(r.title, "The Movie");
        assert_eq!(r.resolution.as_deref(), Some("1080p"));
    }

    #[test]
    fn two_reversed_markers_do_not_flip() {
        let r = cleaner().clean_detailed("Some.Title.p0801.yarulb");
        assert!(!r.reversed);
    }

    #[test]
    fn empty_input_yields_empty_title() {
        assert_eq!(cleaner().clean(""), "");
        assert_eq!(cleaner().clean(" .-_ "), "");
    }

    #[test]
    fn leading_year_is_skipped() {
        let r = cleaner().clean_detailed("(1999) The Matrix.mkv");
        assert_eq!(r.title, "The Matrix");
        assert_eq!(r.year, Some(1999));
    }

    #[test]
    fn year_at_end_of_stem_is_found() {
        let r = cleaner().clean_detailed("Heat.1995");
        assert_eq!(r.title, "Heat");
        assert_eq!(r.year, Some(1995));
    }

    #[test]
    fn out_of_range_years_are_kept() {
        let r = cleaner().clean_detailed("Movie.1850.x264");
        assert_eq!(r.year, None);
        assert_eq!(r.title, "Movie 1850");

        let r = cleaner().clean_detailed("Blade.Runner.2049.2017.1080p");
        assert_eq!(r.year, Some(2017));
        assert_eq!(r.title, "Blade Runner 2049");
    }

    #[test]
    fn bracketed_runs_are_stripped() {
        assert_eq!(cleaner().clean("Some.Movie.[YTS.MX].[x[1]].mkv"), "Some Movie");
    }

    #[test]
    fn audio_channel_layouts_are_stripped() {
        assert_eq!(cleaner().clean("Movie.Title.DD5.1.x264"), "Movie Title");
        assert_eq!(cleaner().clean("Movie Title 7.1 x265"), "Movie Title");
    }

    #[test]
    fn earlier_repeat_of_cruft_token_is_kept() {
        assert_eq!(cleaner().clean("Web.Of.Lies.720p.WEB.x264"), "Web Of Lies");
    }

    #[test]
    fn accumulation_stops_after_two_tossed_tokens() {
        assert_eq!(cleaner().clean("Movie.1080p.Extra.x264.More"), "Movie Extra");
    }

    #[test]
    fn dc_becomes_directors_cut() {
        assert_eq!(
            cleaner().clean("Aliens.DC.1080p.BluRay.x264"),
            "Aliens (Director's cut)"
        );
    }

    #[test]
    fn dc_comics_is_preserved() {
        assert_eq!(
            cleaner().clean("Batman.DC.Comics.Special.720p.x264"),
            "Batman DC Comics Special"
        );
    }

    #[test]
    fn short_names_are_kept_verbatim() {
        assert_eq!(cleaner().clean("Heat.1080p"), "Heat 1080p");
    }

    #[test]
    fn all_cruft_falls_back_to_first_token() {
        assert_eq!(cleaner().clean("1080p.BluRay.x264"), "1080p");
    }

    #[test]
    fn trailing_release_group_is_dropped() {
        assert_eq!(cleaner().clean("Heat.Extended.RARBG"), "Heat");
    }

    #[test]
    fn fallback_uses_token_from_before_bracket_removal() {
        assert_eq!(cleaner().clean("[Horror] 1080p.BluRay.x264"), "[Horror]");
    }

    #[test]
    fn compatibility_forms_are_normalized() {
        assert_eq!(cleaner().clean("\u{ff34}\u{ff48}\u{ff45}.Movie.x264"), "The Movie");
    }

    #[test]
    fn extension_candidate_is_last_token() {
        let r = cleaner().clean_detailed("Movie.Name.x264.mkv");
        assert_eq!(r.extension.as_deref(), Some("mkv"));
        assert_eq!(r.title, "Movie Name");
    }

    #[test]
    fn title_case_keeps_apostrophe_suffixes() {
        assert_eq!(title_case("don't"), "Don't");
        assert_eq!(title_case("GROUP"), "Group");
        assert_eq!(title_case("3rd"), "3rd");
        assert_eq!(title_case("o'brien"), "O'brien");
    }
}
