//! Error types for template processing
//!
//! All failures abort the whole call; processing is a pure in-memory
//! transformation, so there is never a partial result to salvage.

use thiserror::Error;

/// Error during template processing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A directive was opened but its ` --` closing marker is missing from
    /// the line. Failing fast here beats silently emitting corrupted SQL.
    #[error("malformed directive on line {line}: `{fragment}` is never closed with ` --`")]
    MalformedToken {
        /// 1-based line number within the template
        line: usize,
        /// The unterminated directive fragment, starting at its opener
        fragment: String,
    },

    /// A named reference was slated for array expansion but its value has no
    /// element sequence (object-valued parameters cannot be expanded).
    #[error("parameter `{key}` cannot be expanded: {found} values have no element sequence")]
    UnsupportedValueType {
        /// The mapping key whose value could not be classified
        key: String,
        /// Human-readable description of the value's type
        found: &'static str,
    },
}

impl TemplateError {
    pub(crate) fn truncate_fragment(line_text: &str, start: usize) -> String {
        const MAX_FRAGMENT: usize = 40;
        let fragment = &line_text[start..];
        match fragment.char_indices().nth(MAX_FRAGMENT) {
            Some((idx, _)) => format!("{}…", &fragment[..idx]),
            None => fragment.to_string(),
        }
    }

    /// Build a `MalformedToken` error for the directive opening at byte
    /// `start` of `line_text` on 1-based line `line`.
    pub fn malformed(line: usize, line_text: &str, start: usize) -> Self {
        Self::MalformedToken {
            line,
            fragment: Self::truncate_fragment(line_text, start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn malformed_token_reports_line_and_fragment() {
        let err = TemplateError::malformed(3, "where 1=1 -- !key4 and more", 10);
        assert_eq!(
            err.to_string(),
            "malformed directive on line 3: `-- !key4 and more` is never closed with ` --`"
        );
    }

    #[test]
    fn long_fragments_are_truncated() {
        let text = format!("-- =key {}", "x".repeat(100));
        let err = TemplateError::malformed(1, &text, 0);
        let TemplateError::MalformedToken { fragment, .. } = err else {
            panic!("expected MalformedToken");
        };
        assert!(fragment.ends_with('…'));
        assert!(fragment.chars().count() <= 41);
    }
}
