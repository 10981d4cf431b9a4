//! Query output, first as the driver hands it over (positional [`ResultSet`]) and then
//! keyed by column name ([`RowSet`]) for serialization.

mod result_set;
mod row;

pub use result_set::ResultSet;
pub use row::{JsonRow, RowSet};
