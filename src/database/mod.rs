pub mod table;
pub mod workbook;

pub use table::{Row, SheetRecord, Table};
pub use workbook::WorkbookStore;
