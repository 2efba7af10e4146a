mod clean;
mod kind;
pub mod months;

pub use clean::{clean, CleanSheet};
pub use kind::SheetKind;
