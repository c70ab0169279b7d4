//! Row/record marshalling
//!
//! Converts between untyped positional rows of scalar cells and typed records.
//! Composite records are matched to columns by name; scalar records use the
//! first cell only.

pub mod cell;
pub mod convert;
pub mod record;

// Re-export commonly used types
pub use cell::{decode_cell, Cell, CellValue, Grid, Row};
pub use convert::{
    decode_all, from_row, from_rows, header_row, is_end_of_data, to_row, to_rows,
    to_rows_with_header, FromRows,
};
pub use record::{FieldDescriptor, Record, RecordShape};
