//! Scalar cell values and their typed conversions

use crate::error::ScoreboardError;
use crate::marshal::record::FieldDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single scalar value in a grid row
///
/// Absence is represented by a blank [`Cell::Text`], never by a null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// An ordered, fixed-length sequence of cells
pub type Row = Vec<Cell>;

/// An ordered sequence of rows, optionally led by a header row
pub type Grid = Vec<Row>;

impl Cell {
    /// An empty text cell
    pub fn blank() -> Self {
        Cell::Text(String::new())
    }

    /// Whether the cell is an empty or whitespace-only text cell
    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Text(text) if text.trim().is_empty())
    }

    /// Name of the primitive kind, used in coercion errors
    pub fn kind(&self) -> &'static str {
        match self {
            Cell::Int(_) => "integer",
            Cell::Float(_) => "float",
            Cell::Bool(_) => "boolean",
            Cell::Text(_) => "text",
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::blank()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(value) => write!(f, "{}", value),
            Cell::Float(value) => write!(f, "{}", value),
            Cell::Bool(value) => write!(f, "{}", value),
            Cell::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// A Rust type that can be stored in a single cell
pub trait CellValue: Sized {
    /// Human readable type name for error messages
    const EXPECTED: &'static str;

    /// Convert a non-blank cell, returning `None` when the kinds are incompatible
    fn from_cell(cell: &Cell) -> Option<Self>;

    fn to_cell(&self) -> Cell;
}

/// Decode a cell into a field value.
///
/// Blank cells yield the type's default; any other incompatible cell is an
/// [`ScoreboardError::InvalidScalarCoercion`].
pub fn decode_cell<T>(field: &FieldDescriptor, cell: &Cell) -> Result<T, ScoreboardError>
where
    T: CellValue + Default,
{
    if cell.is_blank() {
        return Ok(T::default());
    }

    T::from_cell(cell).ok_or_else(|| ScoreboardError::InvalidScalarCoercion {
        field: field.column_name().to_string(),
        expected: T::EXPECTED,
        found: format!("{} '{}'", cell.kind(), cell),
    })
}

fn integral(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

impl CellValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_cell(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::Int(value) => Some(*value),
            Cell::Float(value) => integral(*value),
            Cell::Text(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().and_then(integral))
            }
            Cell::Bool(_) => None,
        }
    }

    fn to_cell(&self) -> Cell {
        Cell::Int(*self)
    }
}

macro_rules! narrow_integer_cell_value {
    ($($ty:ty),*) => {
        $(
            impl CellValue for $ty {
                const EXPECTED: &'static str = stringify!($ty);

                fn from_cell(cell: &Cell) -> Option<Self> {
                    i64::from_cell(cell).and_then(|value| <$ty>::try_from(value).ok())
                }

                fn to_cell(&self) -> Cell {
                    Cell::Int(i64::from(*self))
                }
            }
        )*
    };
}

narrow_integer_cell_value!(i32, u32);

impl CellValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_cell(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::Int(value) => Some(*value as f64),
            Cell::Float(value) => Some(*value),
            Cell::Text(text) => text.trim().parse::<f64>().ok(),
            Cell::Bool(_) => None,
        }
    }

    fn to_cell(&self) -> Cell {
        Cell::Float(*self)
    }
}

impl CellValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_cell(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::Bool(value) => Some(*value),
            Cell::Int(0) => Some(false),
            Cell::Int(1) => Some(true),
            Cell::Text(text) => {
                let text = text.trim();
                if text.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if text.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn to_cell(&self) -> Cell {
        Cell::Bool(*self)
    }
}

impl CellValue for String {
    const EXPECTED: &'static str = "text";

    fn from_cell(cell: &Cell) -> Option<Self> {
        Some(cell.to_string())
    }

    fn to_cell(&self) -> Cell {
        Cell::Text(self.clone())
    }
}

impl<T: CellValue> CellValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_cell(cell: &Cell) -> Option<Self> {
        T::from_cell(cell).map(Some)
    }

    fn to_cell(&self) -> Cell {
        match self {
            Some(value) => value.to_cell(),
            None => Cell::blank(),
        }
    }
}
