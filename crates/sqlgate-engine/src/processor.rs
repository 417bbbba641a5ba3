//! Template orchestration
//!
//! Splits the template on `\n`, runs every line through the rewrite passes,
//! rejoins, and optionally drops blank lines. All work happens against a
//! private copy of the caller's mapping; a processor holds no per-call state
//! and is safe to share across threads.

use crate::rewrite::LineRewriter;
use sqlgate_core::{ParamMap, ProcessTemplate, ProcessedTemplate, TemplateError};

/// Literal that must appear somewhere in the original template for
/// `-- =key --` injection directives to be honored.
pub const PRAGMA_ENABLE_INJECT: &str = "-- PRAGMA:ENABLE_INJECT --";

/// The conditional SQL template preprocessor.
///
/// Holds only immutable configuration; every call to [`process`] is an
/// independent, pure transformation.
///
/// [`process`]: TemplateProcessor::process
#[derive(Debug, Clone)]
pub struct TemplateProcessor {
    collapse_blank_lines: bool,
}

impl TemplateProcessor {
    /// `collapse_blank_lines` drops whitespace-only lines from the output.
    pub fn new(collapse_blank_lines: bool) -> Self {
        Self {
            collapse_blank_lines,
        }
    }

    /// Process `template` against `params`.
    ///
    /// The caller's mapping is copied on entry and never mutated; the copy,
    /// grown by any array-expansion sub-keys, is returned in the result.
    pub fn process(
        &self,
        template: &str,
        params: &ParamMap,
    ) -> Result<ProcessedTemplate, TemplateError> {
        // The pragma is looked up once, against the unprocessed text.
        let inject_enabled = template.contains(PRAGMA_ENABLE_INJECT);
        if inject_enabled {
            tracing::debug!("injection pragma found, -- =key -- directives are active");
        }

        let mut params = params.clone();
        let mut lines = Vec::new();
        for (idx, line) in template.split('\n').enumerate() {
            lines.push(self.process_line(line, idx + 1, &mut params, inject_enabled)?);
        }

        let mut sql = lines.join("\n");
        if self.collapse_blank_lines {
            sql = collapse_blank_lines(&sql);
        }
        tracing::debug!(params = params.len(), "template processed");
        Ok(ProcessedTemplate { sql, params })
    }

    fn process_line(
        &self,
        line: &str,
        line_no: usize,
        params: &mut ParamMap,
        inject_enabled: bool,
    ) -> Result<String, TemplateError> {
        let mut rewriter = LineRewriter::new(line, line_no);
        rewriter.evaluate_gates(params);
        rewriter.evaluate_negation(params)?;
        rewriter.expand_collections(params)?;
        if inject_enabled {
            rewriter.evaluate_injection(params)?;
        }
        Ok(rewriter.into_line())
    }
}

impl Default for TemplateProcessor {
    /// Collapses blank lines, matching the configuration default.
    fn default() -> Self {
        Self::new(true)
    }
}

impl ProcessTemplate for TemplateProcessor {
    fn process_template(
        &self,
        template: &str,
        params: &ParamMap,
    ) -> Result<ProcessedTemplate, TemplateError> {
        self.process(template, params)
    }
}

/// Drop whitespace-only lines, joining the survivors with single `\n`
/// separators and emitting none before the first or after the last.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut first = true;
    for line in text.split('\n') {
        if line.trim().is_empty() {
            continue;
        }
        if !first {
            out.push('\n');
        }
        out.push_str(line);
        first = false;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collapse_drops_blank_and_whitespace_lines() {
        let text = "\nselect *\n   \nfrom t\n\t\nwhere 1=1\n\n";
        assert_eq!(
            collapse_blank_lines(text),
            "select *\nfrom t\nwhere 1=1"
        );
    }

    #[test]
    fn collapse_of_all_blank_text_is_empty() {
        assert_eq!(collapse_blank_lines("\n  \n\t\n"), "");
    }

    #[test]
    fn collapse_keeps_single_line_intact() {
        assert_eq!(collapse_blank_lines("select 1"), "select 1");
    }
}
