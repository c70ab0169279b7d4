//! Row <-> record conversion
//!
//! Composite records are decoded by matching field wire names against the
//! column names, not by position, so a grid may reorder, add or drop columns
//! without breaking decoding. Fields with no matching column keep their default.

use crate::error::ScoreboardError;
use crate::marshal::cell::{Cell, Row};
use crate::marshal::record::{Record, RecordShape};
use crate::utils::names_equal;
use std::iter;
use std::marker::PhantomData;
use std::slice;
use tracing::trace;

/// Ordered name -> cell mapping built from one row
///
/// Repeated names overwrite earlier entries (last write wins).
struct FieldMap<'a> {
    entries: Vec<(&'a str, &'a Cell)>,
}

impl<'a> FieldMap<'a> {
    fn new<S: AsRef<str>>(row: &'a [Cell], column_names: &'a [S]) -> Self {
        let mut map = Self {
            entries: Vec::with_capacity(row.len()),
        };
        for (name, cell) in column_names.iter().zip(row) {
            map.insert(name.as_ref(), cell);
        }
        map
    }

    fn insert(&mut self, name: &'a str, cell: &'a Cell) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = cell,
            None => self.entries.push((name, cell)),
        }
    }

    /// Exact match first, then the last case-insensitive match
    fn get(&self, name: &str) -> Option<&'a Cell> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .or_else(|| self.entries.iter().rev().find(|(key, _)| names_equal(key, name)))
            .map(|(_, cell)| *cell)
    }
}

fn has_column<S: AsRef<str>>(column_names: &[S], name: &str) -> bool {
    column_names
        .iter()
        .any(|column| names_equal(column.as_ref(), name))
}

/// Decode a single row into a record.
///
/// Composite records require `row.len() == column_names.len()`. Scalar records
/// ignore the column names and read the first cell.
pub fn from_row<T, S>(row: &[Cell], column_names: &[S]) -> Result<T, ScoreboardError>
where
    T: Record,
    S: AsRef<str>,
{
    let mut record = T::default();

    match T::SHAPE {
        RecordShape::Scalar => {
            let cell = row.first().ok_or(ScoreboardError::ShapeMismatch {
                row_len: 0,
                column_count: 1,
            })?;
            record.set_field(0, cell)?;
        }
        RecordShape::Composite(fields) => {
            if row.len() != column_names.len() {
                return Err(ScoreboardError::ShapeMismatch {
                    row_len: row.len(),
                    column_count: column_names.len(),
                });
            }

            let map = FieldMap::new(row, column_names);
            for (index, field) in fields.iter().enumerate() {
                if !field.persisted {
                    continue;
                }
                if let Some(cell) = map.get(field.column_name()) {
                    record.set_field(index, cell)?;
                }
            }
        }
    }

    Ok(record)
}

/// Whether `row` marks the end of the data in a sheet-backed grid.
///
/// A fully blank row always ends the data. For composite records, so does a
/// row where a required field's column is present but its cell is blank.
/// A short row ends the data only when none of the required cells it does
/// carry is filled in; otherwise decoding reports the shape mismatch.
pub fn is_end_of_data<T, S>(row: &[Cell], column_names: &[S]) -> bool
where
    T: Record,
    S: AsRef<str>,
{
    if row.iter().all(Cell::is_blank) {
        return true;
    }

    match T::SHAPE {
        RecordShape::Scalar => false,
        RecordShape::Composite(fields) => {
            let map = FieldMap::new(row, column_names);
            let mut required = fields
                .iter()
                .filter(|field| field.persisted && field.required)
                .filter(|field| has_column(column_names, field.column_name()));

            if row.len() < column_names.len() {
                required.all(|field| map.get(field.column_name()).map_or(true, Cell::is_blank))
            } else {
                required.any(|field| map.get(field.column_name()).map_or(true, Cell::is_blank))
            }
        }
    }
}

/// Lazy decoder over the rows of a grid
///
/// Yields one `Result` per data row and stops at the end-of-data sentinel.
pub struct FromRows<'a, T> {
    rows: slice::Iter<'a, Row>,
    column_names: Vec<String>,
    finished: bool,
    _record: PhantomData<fn() -> T>,
}

impl<'a, T: Record> FromRows<'a, T> {
    /// Column names in effect for this decode (supplied or read from the header)
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }
}

impl<T: Record> Iterator for FromRows<'_, T> {
    type Item = Result<T, ScoreboardError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let row = self.rows.next()?;
        if is_end_of_data::<T, _>(row, self.column_names.as_slice()) {
            self.finished = true;
            return None;
        }

        Some(from_row(row, self.column_names.as_slice()))
    }
}

/// Decode the rows of a grid lazily.
///
/// When `column_names` is `None` and the record is composite, the first row
/// is consumed as the header. Scalar records never consume a header row.
pub fn from_rows<'a, T: Record>(
    grid: &'a [Row],
    column_names: Option<&[String]>,
) -> FromRows<'a, T> {
    let mut rows = grid.iter();

    let column_names = match (column_names, T::SHAPE) {
        (Some(names), _) => names.to_vec(),
        (None, RecordShape::Scalar) => Vec::new(),
        (None, RecordShape::Composite(_)) => rows
            .next()
            .map(|header| header.iter().map(Cell::to_string).collect())
            .unwrap_or_default(),
    };

    trace!("Decoding grid with columns {:?}", column_names);

    FromRows {
        rows,
        column_names,
        finished: false,
        _record: PhantomData,
    }
}

/// Decode every data row, aborting on the first hard error
pub fn decode_all<T: Record>(
    grid: &[Row],
    column_names: Option<&[String]>,
) -> Result<Vec<T>, ScoreboardError> {
    from_rows(grid, column_names).collect()
}

/// Encode a record as a row
pub fn to_row<T: Record>(record: &T) -> Row {
    match T::SHAPE {
        RecordShape::Scalar => vec![record.field(0)],
        RecordShape::Composite(fields) => fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.persisted)
            .map(|(index, _)| record.field(index))
            .collect(),
    }
}

/// Header row for a record type, `None` for scalars
pub fn header_row<T: Record>() -> Option<Row> {
    match T::SHAPE {
        RecordShape::Scalar => None,
        RecordShape::Composite(fields) => Some(
            fields
                .iter()
                .filter(|field| field.persisted)
                .map(|field| Cell::from(field.column_name()))
                .collect(),
        ),
    }
}

/// Encode records as rows, optionally led by a header derived from the
/// first record. An empty sequence produces no rows at all.
pub fn to_rows<'a, T, I>(records: I, prepend_header: bool) -> impl Iterator<Item = Row> + 'a
where
    T: Record + 'a,
    I: IntoIterator<Item = &'a T>,
    I::IntoIter: 'a,
{
    let mut records = records.into_iter().peekable();
    let header = if prepend_header && records.peek().is_some() {
        header_row::<T>()
    } else {
        None
    };

    header.into_iter().chain(records.map(to_row))
}

/// Encode records as rows behind an explicit header row
pub fn to_rows_with_header<'a, T, I>(records: I, header: Row) -> impl Iterator<Item = Row> + 'a
where
    T: Record + 'a,
    I: IntoIterator<Item = &'a T>,
    I::IntoIter: 'a,
{
    iter::once(header).chain(records.into_iter().map(to_row))
}
