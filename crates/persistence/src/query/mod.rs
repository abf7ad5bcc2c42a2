//! Advanced query compilation.
//!
//! Turns the raw, multi-valued parameters of a URL query string into a typed
//! [`Filter`](crate::types::Filter) plus sort/select/paging options:
//!
//! 1. [`parser`] splits bracketed keys (`averageCost[lte]`) into nested paths
//!    and merges repeated keys.
//! 2. [`operators`] renames recognized comparison operators to `$gt`, `$in`, ...
//! 3. [`coerce`] turns every leaf string into the narrowest scalar type.
//! 4. [`compiler`] strips the reserved keys, injects the soft-delete clause and
//!    derives paging indices.
//!
//! [`projection`] reduces typed records to a caller-chosen set of fields.

pub mod coerce;
pub mod compiler;
pub mod operators;
pub mod parser;
pub mod projection;

pub use coerce::coerce;
pub use compiler::{CompiledQuery, CountMode, QueryCompiler};
pub use operators::ComparisonOperator;
pub use parser::RawParameters;
pub use projection::{FieldAccessor, FieldRegistry, Projectable, project};
