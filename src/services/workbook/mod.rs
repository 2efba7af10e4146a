mod frame;
mod reader;
pub mod utils;

pub use frame::frame_from_rows;
pub use reader::DivorceWorkbook;
