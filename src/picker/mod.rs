//! Wheel picker used for date-of-birth entry.

pub mod date;
pub mod reel;

pub use date::{DatePicker, DateReel, days_in_month, is_leap_year, month_label};
pub use reel::{RowWeight, WheelReel, index_from_offset, offset_for_index, row_opacity};
