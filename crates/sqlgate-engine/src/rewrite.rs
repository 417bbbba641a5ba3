//! Single-line directive rewriting
//!
//! Directives are located by literal substring search, not by a grammar:
//! erasure and ordering semantics depend on exact token spelling, including
//! the single space of padding inside the comment markers.

use serde_json::Value;
use sqlgate_core::{canonical_text, ParamMap, TemplateError};

const GATE_OPEN: &str = "-- ";
const NEGATIVE_OPEN: &str = "-- !";
const INJECT_OPEN: &str = "-- =";
const GATE_CLOSE: &str = " --";
const NAMED_PARAM_PREFIX: char = ':';

/// Ceiling on injection replacements per line. Keeps a malformed or hostile
/// template from driving the injection scan unboundedly.
const MAX_INJECT_REPLACEMENTS: usize = 10;

/// Rewrites one template line against a parameter mapping. Each evaluate
/// method erases or replaces directive occurrences in the captured line;
/// none of them touches the mapping except [`expand_collections`], which
/// registers minted sub-keys after its scan completes.
///
/// [`expand_collections`]: LineRewriter::expand_collections
pub(crate) struct LineRewriter {
    line: String,
    line_no: usize,
}

impl LineRewriter {
    /// `line_no` is 1-based and used only for error reporting.
    pub(crate) fn new(line: &str, line_no: usize) -> Self {
        Self {
            line: line.to_string(),
            line_no,
        }
    }

    pub(crate) fn into_line(self) -> String {
        self.line
    }

    /// Gate pass: resolve presence, value and null gates for every mapping
    /// entry independently. Erasing a token the line does not carry is a
    /// no-op, so this is safe to run against the whole mapping per line.
    pub(crate) fn evaluate_gates(&mut self, params: &ParamMap) {
        for (key, value) in params {
            if value.is_null() {
                self.erase(&format!("{GATE_OPEN}{key} is null{GATE_CLOSE}"));
            } else {
                let literal = canonical_text(value);
                self.erase(&format!("{GATE_OPEN}{key}:{literal}{GATE_CLOSE}"));
            }
            // The plain presence gate goes regardless of which branch ran.
            self.erase(&format!("{GATE_OPEN}{key}{GATE_CLOSE}"));
        }
    }

    /// Resolve the first negative gate on the line, if any. A second
    /// negative gate on the same line is left alone; one gate per line is a
    /// known limitation of the directive grammar.
    pub(crate) fn evaluate_negation(&mut self, params: &ParamMap) -> Result<(), TemplateError> {
        let Some(start) = self.line.find(NEGATIVE_OPEN) else {
            return Ok(());
        };
        let (key_start, close) = self.closing_marker(start, NEGATIVE_OPEN)?;
        let key = self.line[key_start..close].trim();
        if !params.contains_key(key) {
            self.line.replace_range(start..close + GATE_CLOSE.len(), "");
        }
        Ok(())
    }

    /// Rewrite `:key` references whose value is collection-valued into a
    /// comma-joined list of indexed sub-references, registering the minted
    /// `key_0, key_1, ...` bindings into the mapping. Registration is buffered
    /// until the scan over the mapping finishes, and reference detection
    /// runs against the line as it stood when the pass began, so expansion
    /// of one key never observes rewrite work done for another key: not on
    /// the same line, and not sub-keys minted on an earlier line.
    pub(crate) fn expand_collections(&mut self, params: &mut ParamMap) -> Result<(), TemplateError> {
        if !self.line.contains(NAMED_PARAM_PREFIX) {
            return Ok(());
        }
        let snapshot = self.line.clone();
        let mut minted = ParamMap::new();
        for (key, value) in params.iter() {
            let reference = format!("{NAMED_PARAM_PREFIX}{key}");
            if find_reference(&snapshot, &reference, 0).is_none() {
                continue;
            }
            let Some(elements) = expansion_elements(key, value)? else {
                continue;
            };
            tracing::trace!(key = %key, elements = elements.len(), "expanding collection reference");
            let mut list = String::new();
            for (i, element) in elements.iter().enumerate() {
                let indexed_key = format!("{key}_{i}");
                if i > 0 {
                    list.push_str(", ");
                }
                list.push(NAMED_PARAM_PREFIX);
                list.push_str(&indexed_key);
                minted.insert(indexed_key, (*element).clone());
            }
            self.line = replace_reference(&self.line, &reference, &list);
        }
        params.append(&mut minted);
        Ok(())
    }

    /// Replace injection directives with the canonical text of their bound
    /// value. A directive whose key is unbound stays in place; the bounded
    /// counter is what ends the scan in that case.
    pub(crate) fn evaluate_injection(&mut self, params: &ParamMap) -> Result<(), TemplateError> {
        for _ in 0..MAX_INJECT_REPLACEMENTS {
            let Some(start) = self.line.find(INJECT_OPEN) else {
                return Ok(());
            };
            let (key_start, close) = self.closing_marker(start, INJECT_OPEN)?;
            let key = self.line[key_start..close].trim();
            if let Some(value) = params.get(key) {
                let replacement = canonical_text(value);
                self.line
                    .replace_range(start..close + GATE_CLOSE.len(), &replacement);
            }
        }
        Ok(())
    }

    /// Locate the ` --` closing a directive opened with `opener` at `start`.
    /// Returns the byte range of the key between them.
    fn closing_marker(
        &self,
        start: usize,
        opener: &str,
    ) -> Result<(usize, usize), TemplateError> {
        let key_start = start + opener.len();
        self.line[key_start..]
            .find(GATE_CLOSE)
            .map(|offset| (key_start, key_start + offset))
            .ok_or_else(|| TemplateError::malformed(self.line_no, &self.line, start))
    }

    fn erase(&mut self, token: &str) {
        if self.line.contains(token) {
            self.line = self.line.replace(token, "");
        }
    }
}

/// Find the next occurrence of `reference` in `text` at or after `from`
/// that is a whole named reference: the following character must not be an
/// identifier character, so `:id` never matches inside `:ids` or `:id_0`.
fn find_reference(text: &str, reference: &str, from: usize) -> Option<usize> {
    let mut search = from;
    while let Some(offset) = text[search..].find(reference) {
        let start = search + offset;
        let end = start + reference.len();
        let whole = text[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_identifier_char(c));
        if whole {
            return Some(start);
        }
        search = end;
    }
    None
}

/// Replace every whole occurrence of `reference` in `line` with
/// `replacement`, leaving longer references that merely share the prefix
/// alone.
fn replace_reference(line: &str, reference: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = 0;
    while let Some(start) = find_reference(line, reference, rest) {
        out.push_str(&line[rest..start]);
        out.push_str(replacement);
        rest = start + reference.len();
    }
    out.push_str(&line[rest..]);
    out
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Classify a value for array expansion: arrays yield their elements in
/// order, non-null scalars a singleton, null opts out of expansion entirely,
/// and objects have no element sequence at all.
fn expansion_elements<'a>(
    key: &str,
    value: &'a Value,
) -> Result<Option<Vec<&'a Value>>, TemplateError> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => Ok(Some(items.iter().collect())),
        Value::Object(_) => Err(TemplateError::UnsupportedValueType {
            key: key.to_string(),
            found: "object",
        }),
        scalar => Ok(Some(vec![scalar])),
    }
}
