mod aggregate;
mod correlation;
mod describe;
mod frequency;

pub use aggregate::{column_totals, grouped_totals};
pub use correlation::correlation_matrix;
pub use describe::profile_sheet;
pub use frequency::frequency_table;
