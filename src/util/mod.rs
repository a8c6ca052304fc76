pub mod array;
pub mod date;

pub use array::{array_range, sort_alphabetically_asc, sort_alphabetically_desc};
pub use date::{format_ymd, month_of, to_iso8601, year_of};
