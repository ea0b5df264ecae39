use thiserror::Error;

/// Errors that can occur during tagmkv core operations.
#[derive(Debug, Error)]
pub enum TagMkvError {
    /// The input string is empty or contains only whitespace.
    #[error("input is empty or whitespace-only")]
    EmptyInput,

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// The tag document is not well-formed XML.
    #[error("malformed tag document: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Writing the tag document failed.
    #[error("failed to write tag document: {0}")]
    XmlWrite(#[from] xml::writer::Error),

    /// The tag document parsed but its root is not `Tags`.
    #[error("unexpected root element {found:?}, expected \"Tags\"")]
    UnexpectedRoot {
        /// The root element name that was found.
        found: String,
    },

    /// An external reference is not of the form `namespace/id`.
    #[error("invalid external reference: {value:?}")]
    InvalidExternalRef {
        /// The offending value.
        value: String,
    },

    /// A media type code outside the known enumeration.
    #[error("unknown media type code: {0}")]
    UnknownMediaType(u8),

    /// A date that is not in `YYYY-MM-DD` form.
    #[error("invalid date {value:?}, expected YYYY-MM-DD")]
    InvalidDate {
        /// The offending value.
        value: String,
    },

    /// The metadata lookup collaborator reported a failure.
    #[error("metadata lookup failed: {0}")]
    Lookup(String),
}

/// Result type alias for tagmkv operations.
pub type Result<T> = std::result::Result<T, TagMkvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = TagMkvError::EmptyInput;
        assert_eq!(err.to_string(), "input is empty or whitespace-only");

        let err = TagMkvError::InvalidExternalRef {
            value: "tv-123".into(),
        };
        assert!(err.to_string().contains("tv-123"));

        let err = TagMkvError::UnknownMediaType(3);
        assert_eq!(err.to_string(), "unknown media type code: 3");
    }

    #[test]
    fn xml_errors_convert() {
        let err: TagMkvError = roxmltree::Document::parse("<Tags>").unwrap_err().into();
        assert!(matches!(err, TagMkvError::XmlParse(_)));

        let io = std::io::Error::other("sink closed");
        let err: TagMkvError = xml::writer::Error::from(io).into();
        assert!(matches!(err, TagMkvError::XmlWrite(_)));
        assert!(err.to_string().starts_with("failed to write tag document"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TagMkvError>();
    }
}
