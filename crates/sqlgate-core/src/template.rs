//! Processed-template result and the processor seam
//!
//! Downstream code binds `params` to the named placeholders left in `sql`
//! and hands both to a parameterized statement executor. Neither field is
//! mutated after construction.

use crate::error::TemplateError;
use crate::value::ParamMap;
use serde::Serialize;

/// Result of processing a template: the rewritten SQL text plus the final
/// parameter mapping (the caller's entries plus any array-expansion
/// sub-keys). Sub-keys (`key_0`, `key_1`, ...) are scoped to this result and
/// must not be assumed stable across invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedTemplate {
    /// The rewritten template text
    pub sql: String,

    /// The final parameter mapping to bind against `sql`
    pub params: ParamMap,
}

/// The seam between template processing and everything that consumes its
/// output. Implementations must be pure: the same template and parameters
/// always produce the same result, and the caller's mapping is never mutated.
pub trait ProcessTemplate {
    /// Process `template` against `params`, returning the rewritten text and
    /// the augmented parameter mapping.
    fn process_template(
        &self,
        template: &str,
        params: &ParamMap,
    ) -> Result<ProcessedTemplate, TemplateError>;
}
