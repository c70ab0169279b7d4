//! Record shapes and field descriptors
//!
//! A record type declares how it maps onto a row: either as a single scalar
//! value, or as a composite of named fields matched against header tokens.

use crate::error::ScoreboardError;
use crate::marshal::cell::{decode_cell, Cell, CellValue};

/// Static description of one field of a composite record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Local (Rust-side) field name
    pub name: &'static str,
    /// Column header token this field matches against, if different from `name`
    pub wire_name: Option<&'static str>,
    /// Transient fields are neither decoded nor encoded
    pub persisted: bool,
    /// A blank required cell marks the end of the data in a grid
    pub required: bool,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            wire_name: None,
            persisted: true,
            required: false,
        }
    }

    pub const fn wire(self, wire_name: &'static str) -> Self {
        Self {
            wire_name: Some(wire_name),
            ..self
        }
    }

    pub const fn transient(self) -> Self {
        Self {
            persisted: false,
            ..self
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// The token used in header rows for this field
    pub fn column_name(&self) -> &'static str {
        self.wire_name.unwrap_or(self.name)
    }
}

/// How a record type maps onto a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    /// A single unnamed value, read from and written to the first cell
    Scalar,
    /// Named fields in declaration order
    Composite(&'static [FieldDescriptor]),
}

/// A typed value that can be marshalled to and from a [`Row`](crate::marshal::Row)
///
/// Field indices refer to positions in the composite descriptor list; scalar
/// records only ever see index 0.
pub trait Record: Default {
    const SHAPE: RecordShape;

    /// Assign the field at `index` from `cell`
    fn set_field(&mut self, index: usize, cell: &Cell) -> Result<(), ScoreboardError>;

    /// Current value of the field at `index`
    fn field(&self, index: usize) -> Cell;
}

/// Descriptor reported in errors for scalar records
pub const SCALAR_FIELD: FieldDescriptor = FieldDescriptor::new("value");

macro_rules! scalar_record {
    ($($ty:ty),*) => {
        $(
            impl Record for $ty {
                const SHAPE: RecordShape = RecordShape::Scalar;

                fn set_field(&mut self, _index: usize, cell: &Cell) -> Result<(), ScoreboardError> {
                    *self = decode_cell(&SCALAR_FIELD, cell)?;
                    Ok(())
                }

                fn field(&self, _index: usize) -> Cell {
                    self.to_cell()
                }
            }
        )*
    };
}

scalar_record!(i64, i32, u32, f64, bool, String);
