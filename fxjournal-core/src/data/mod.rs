//! Raw tables and normalization into trade records

pub mod coerce;
pub mod headers;
pub mod normalize;
pub mod table;

pub use coerce::Coerced;
pub use headers::{ColumnMap, HeaderCleaner};
pub use normalize::{canonical_table, CellFailure, NormalizeReport, Normalized, Normalizer};
pub use table::RawTable;
