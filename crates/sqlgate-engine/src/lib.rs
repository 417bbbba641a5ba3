//! SQLGate Engine
//!
//! Conditional SQL template preprocessing. One template file serves many
//! parameter combinations: directive tokens ride inside SQL line comments,
//! so an unresolved directive keeps the rest of its line commented out,
//! while a resolved one is erased and exposes the rest of the line as live
//! SQL. A template looks like:
//!
//! ```sql
//! select
//!     *
//! from
//!     mytable
//! where 1=1
//!     -- key1 -- and mycol = :key1
//!     -- key3 is null -- and mycol2 is null
//!     -- !key4 -- and mycol3 = 'something'
//!     -- key5 -- and mycol4 in (:key5)
//! order by
//!     -- key2:value_asc -- mycol2 asc,
//!     -- key2:value_desc -- mycol2 desc,
//!     id desc
//! ```
//!
//! Supported directives, resolved per line in this order:
//!
//! - `-- key --` is erased when the mapping contains `key`, whatever its
//!   value.
//! - `-- key:literal --` is erased when `key` is bound to a non-null value
//!   whose canonical text equals `literal`.
//! - `-- key is null --` is erased when `key` is bound explicitly to null.
//! - `-- !key --` is erased when `key` is absent from the mapping. Only the
//!   first such gate per line is considered.
//! - `:key` is rewritten to `:key_0, :key_1, ...` when `key` is bound to a
//!   collection, and the elements are registered under the minted sub-keys
//!   in the returned mapping.
//! - `-- =key --` is replaced by the canonical text of the bound value, but
//!   only when the template contains `-- PRAGMA:ENABLE_INJECT --` somewhere.
//!   This is unescaped substitution and therefore an explicit per-template
//!   opt-in; never feed it externally-controlled values.

pub mod processor;
mod rewrite;

pub use processor::{TemplateProcessor, PRAGMA_ENABLE_INJECT};
pub use sqlgate_core::{ProcessTemplate, ProcessedTemplate, TemplateError};
