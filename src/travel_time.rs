//! Travel time matrices describe how long it takes to travel from a source (an area or a facility)
//! to each candidate facility.
use crate::facility::FacilityID;
use crate::id::IDLike;
use anyhow::{Result, ensure};
use indexmap::IndexSet;

/// A rectangular table of travel times in minutes.
///
/// Rows are keyed by `R` (e.g. [`AreaID`](crate::area::AreaID) or [`FacilityID`]) and columns by
/// facility. Both keys preserve the order in which they were declared, which matters when
/// resolving ties between facilities.
///
/// Non-finite values (`NaN` or positive infinity) mark pairs which are unreachable.
#[derive(PartialEq, Debug, Clone)]
pub struct TravelTimeMatrix<R: IDLike> {
    rows: IndexSet<R>,
    columns: IndexSet<FacilityID>,
    times: Vec<f64>,
}

impl<R: IDLike> TravelTimeMatrix<R> {
    /// Create a new [`TravelTimeMatrix`].
    ///
    /// # Arguments
    ///
    /// * `rows` - Row keys, in order
    /// * `columns` - Facility IDs for the columns, in order
    /// * `times` - Travel times in row-major order
    pub fn new<I, J>(rows: I, columns: J, times: Vec<f64>) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        J: IntoIterator<Item = FacilityID>,
    {
        let mut row_set = IndexSet::new();
        for row in rows {
            ensure!(!row_set.contains(&row), "Duplicate row ID: {row}");
            row_set.insert(row);
        }

        let mut column_set = IndexSet::new();
        for column in columns {
            ensure!(
                !column_set.contains(&column),
                "Duplicate facility column: {column}"
            );
            column_set.insert(column);
        }

        ensure!(
            times.len() == row_set.len() * column_set.len(),
            "Expected {} travel times ({} rows x {} columns), but got {}",
            row_set.len() * column_set.len(),
            row_set.len(),
            column_set.len(),
            times.len()
        );
        ensure!(
            times.iter().all(|time| time.is_nan() || *time >= 0.0),
            "Travel times cannot be negative"
        );

        Ok(Self {
            rows: row_set,
            columns: column_set,
            times,
        })
    }

    /// The row keys, in declared order
    pub fn rows(&self) -> &IndexSet<R> {
        &self.rows
    }

    /// The facility columns, in declared order
    pub fn columns(&self) -> &IndexSet<FacilityID> {
        &self.columns
    }

    /// The travel time from `row` to `facility`, if both are present in the matrix
    pub fn get(&self, row: &R, facility: &FacilityID) -> Option<f64> {
        let row_idx = self.rows.get_index_of(row)?;
        let col_idx = self.columns.get_index_of(facility)?;
        Some(self.times[row_idx * self.columns.len() + col_idx])
    }

    /// Iterate over rows, yielding the row key and the travel times in column order
    pub fn iter_rows(&self) -> impl Iterator<Item = (&R, &[f64])> {
        let width = self.columns.len();
        self.rows.iter().enumerate().map(move |(idx, row)| {
            let start = idx * width;
            (row, &self.times[start..start + width])
        })
    }

    /// Number of rows in the matrix
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}
