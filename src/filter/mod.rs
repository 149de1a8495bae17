pub mod types;
pub mod filter;
pub mod row_filter;
pub mod error;

pub use types::*;
pub use filter::Filter;
pub use row_filter::RowFilter;
pub use error::FilterError;
