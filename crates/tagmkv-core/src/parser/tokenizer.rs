//! # Filename tokenizer
//!
//! Splits release-style filenames into word tokens on the separator runs that
//! release tools use in place of spaces.

/// A token extracted from a filename, case preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
}

impl Token {
    /// Lower-cased token text.
    #[must_use]
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }
}

/// Separator characters. Any run of these splits two tokens.
pub const SEPARATORS: &[char] = &[' ', '-', '_', '.', '(', ')', '+'];

/// Tokenizer for release-style filenames.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Create a new tokenizer instance.
    pub fn new() -> Self {
        Self
    }

    /// Tokenize a filename, preserving the case of each token.
    ///
    /// # Examples
    /// ```
    /// use tagmkv_core::parser::tokenizer::Tokenizer;
    ///
    /// let tokens = Tokenizer::new().tokenize("The.Movie (2015)-GROUP");
    /// let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    /// assert_eq!(texts, ["The", "Movie", "2015", "GROUP"]);
    /// ```
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut current_start = 0;

        for (idx, c) in input.char_indices() {
            if SEPARATORS.contains(&c) {
                if idx > current_start {
                    tokens.push(Token {
                        text: input[current_start..idx].to_string(),
                    });
                }
                current_start = idx + c.len_utf8();
            }
        }

        if current_start < input.len() {
            tokens.push(Token {
                text: input[current_start..].to_string(),
            });
        }

        tokens
    }

    /// Tokenize and lower-case, returning only the texts.
    pub fn tokenize_lower(&self, input: &str) -> Vec<String> {
        self.tokenize(input).iter().map(Token::lower).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_dot_separated() {
        let tokens = Tokenizer::new().tokenize("The.Movie.2015.1080p.BluRay.x264-GROUP");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            ["The", "Movie", "2015", "1080p", "BluRay", "x264", "GROUP"]
        );
        assert_eq!(tokens[5].lower(), "x264");
    }

    #[test]
    fn separator_runs_collapse() {
        let tokens = Tokenizer::new().tokenize("a -- b__(c)+d");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c", "d"]);
    }

    #[test]
    fn brackets_and_apostrophes_stay_in_tokens() {
        let texts = Tokenizer::new().tokenize_lower("Don't.Look.[YTS]");
        assert_eq!(texts, ["don't", "look", "[yts]"]);
    }

    #[test]
    fn tokenize_empty() {
        assert!(Tokenizer::new().tokenize("").is_empty());
    }

    #[test]
    fn tokenize_only_separators() {
        assert!(Tokenizer::new().tokenize(" ..--__()++").is_empty());
    }
}
