//! elig - Eligibility engine for JSON-like records
//!
//! Decides whether a structured record (a *subject*, e.g. a shopping cart)
//! satisfies a declarative *condition set*, and answers with a single boolean.
//! Evaluation is pure: no I/O, no shared state, no side effects.
//!
//! # Architecture
//!
//! - [`FieldPath`] — Dot-delimited path; resolves into nested mappings and flattens through sequences
//! - [`Resolved`] — What a path resolved to (absent / one value / sequence)
//! - [`Literal`] — Scalar literal with coerced string equality (`20` equals `"20"`)
//! - [`Condition`] — Tagged union: literal equality, operator node, or unsatisfiable
//! - [`Operator`] — `and`, `or`, `in`, `gt`, `lt`, `gte`, `lte`
//! - [`ConditionSet`] — Path → condition entries; every entry must hold
//!
//! # Key Design Insights
//!
//! 1. **Classify once**: raw condition values are turned into [`Condition`]s when the set
//!    is loaded. Evaluation never sniffs JSON shapes.
//!
//! 2. **Precedence, not validation**: an operator mapping with several operator keys honors
//!    only the first in [`OperatorKind::PRIORITY`] (`and, or, in, gt, lt, gte, lte`).
//!
//! 3. **Absent → false**: a missing field, a type mismatch or an unusable condition shape
//!    fails the condition. Evaluation itself never errors.
//!
//! 4. **Asymmetric path depth**: equality and `in` resolve the full path through mappings
//!    and sequences; `gt`/`lt`/`gte`/`lte` only read the field named by the first segment.
//!
//! # Example
//!
//! ```
//! use elig::is_eligible;
//! use serde_json::json;
//!
//! let cart = json!({
//!     "shopperId": "shopper-id",
//!     "total": 20,
//!     "products": [{ "productId": "5449000054227", "quantity": 2 }]
//! });
//!
//! let conditions = json!({
//!     "shopperId": "shopper-id",
//!     "total": { "and": { "gt": 10, "lt": 30 } },
//!     "products.productId": { "in": ["5449000054227", "3099873045369"] }
//! });
//!
//! assert!(is_eligible(&cart, &conditions));
//! ```
//!
//! Condition sets can also be read straight from text:
//!
//! ```
//! use elig::ConditionSet;
//! use serde_json::json;
//!
//! let conditions: ConditionSet =
//!     serde_json::from_str(r#"{ "total": { "gte": 20 } }"#).unwrap();
//!
//! assert!(conditions.is_satisfied_by(&json!({ "total": 20 })));
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod condition;
mod condition_set;
mod config;
mod literal;
mod path;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use condition::{Bound, Condition, Operator, OperatorKind};
pub use condition_set::{is_eligible, ConditionSet};
pub use literal::Literal;
pub use path::{FieldPath, Resolved};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use elig::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Entry point
        is_eligible,
        // Core types
        Bound,
        Condition,
        ConditionSet,
        // Errors
        ConditionSetError,
        FieldPath,
        Literal,
        Operator,
        OperatorKind,
        Resolved,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Recommended maximum nesting depth for untrusted condition sets.
///
/// `and`/`or` evaluation recurses once per nesting level. The engine does not
/// enforce this limit; check [`ConditionSet::depth`] before evaluating input
/// you do not control.
pub const MAX_DEPTH: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from classifying a condition-set value.
///
/// Evaluation itself never fails; this only covers input that is not a
/// condition set at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionSetError {
    /// The value is not a mapping from paths to conditions.
    #[error("condition set must be a mapping of field paths to conditions, found {found}")]
    NotAMapping {
        /// The JSON kind that was found instead (`"sequence"`, `"string"`, ...).
        found: &'static str,
    },
}
