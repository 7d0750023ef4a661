//! Error taxonomy for the sunburst engine.
//!
//! Only [`Error::InvalidConfig`] is fatal. Every other variant is recovered
//! locally and surfaced through the engine's diagnostic channel so the rest of
//! the tree keeps rendering.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A leaf has no numeric value in the configured weight field.
    #[error("leaf `{key}` has no numeric `{field}` field; treating its weight as 0")]
    MissingWeight { key: String, field: String },

    /// `select` was given a key that no node carries.
    #[error("could not find node with key `{key}`")]
    NotFound { key: String },

    /// `build` was called without data.
    #[error("no data to lay out")]
    EmptyData,

    /// A required configuration option is missing or malformed.
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig { field: String, reason: String },

    /// Two nodes share a key; the first one in breadth-first order keeps it.
    #[error("duplicate key `{key}`; only the first node is selectable by it")]
    DuplicateKey { key: String },
}

impl Error {
    pub(crate) fn invalid_config(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error prevents `build` from producing any output.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}

/// Collector for non-fatal conditions raised while building or navigating.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a condition and log it.
    pub fn report(&mut self, error: Error) {
        tracing::warn!(%error, "sunburst diagnostic");
        self.entries.push(error);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.entries.iter()
    }

    /// Drain everything reported so far.
    pub fn take(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invalid_config_is_fatal() {
        assert!(Error::invalid_config("widthPx", "missing").is_fatal());
        assert!(!Error::EmptyData.is_fatal());
        assert!(!Error::NotFound { key: "a".into() }.is_fatal());
        assert!(
            !Error::MissingWeight {
                key: "a".into(),
                field: "size".into()
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_diagnostics_take_drains() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(Error::EmptyData);
        diagnostics.report(Error::NotFound { key: "x".into() });
        assert_eq!(diagnostics.len(), 2);

        let taken = diagnostics.take();
        assert_eq!(taken.len(), 2);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_messages_name_the_key() {
        let message = Error::NotFound { key: "nonexistent".into() }.to_string();
        assert!(message.contains("nonexistent"), "got {message}");
    }
}
