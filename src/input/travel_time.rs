//! Code for reading travel time matrices.
//!
//! Matrices are stored in "wide" format: the first column contains the row ID and there is one
//! further column per facility, with the facility ID as its header. Empty cells or `nan` mark
//! pairs which are unreachable.
use super::*;
use crate::area::AreaID;
use crate::facility::FacilityID;
use crate::id::IDLike;
use crate::travel_time::TravelTimeMatrix;
use anyhow::{Context, Result, ensure};
use std::io::Read;
use std::path::Path;

/// The file containing travel times from areas to facilities
pub const AREA_TRAVEL_TIME_FILE_NAME: &str = "area_travel_time.csv";

/// The file containing travel times between facilities
pub const FACILITY_TRAVEL_TIME_FILE_NAME: &str = "inter_hospital_time.csv";

/// Read travel times from areas to facilities from the specified model directory
pub fn read_area_travel_times(model_dir: &Path) -> Result<TravelTimeMatrix<AreaID>> {
    read_travel_time_matrix(&model_dir.join(AREA_TRAVEL_TIME_FILE_NAME))
}

/// Read travel times between facilities from the specified model directory
pub fn read_facility_travel_times(model_dir: &Path) -> Result<TravelTimeMatrix<FacilityID>> {
    read_travel_time_matrix(&model_dir.join(FACILITY_TRAVEL_TIME_FILE_NAME))
}

fn read_travel_time_matrix<R: IDLike>(file_path: &Path) -> Result<TravelTimeMatrix<R>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)
        .with_context(|| input_err_msg(file_path))?;
    read_travel_time_matrix_from_reader(reader).with_context(|| input_err_msg(file_path))
}

fn read_travel_time_matrix_from_reader<R, T>(mut reader: csv::Reader<T>) -> Result<TravelTimeMatrix<R>>
where
    R: IDLike,
    T: Read,
{
    let headers = reader.headers()?.clone();
    ensure!(
        headers.len() > 1,
        "Travel time matrix must have at least one facility column"
    );
    let mut columns = Vec::with_capacity(headers.len() - 1);
    for header in headers.iter().skip(1) {
        ensure!(!header.is_empty(), "Facility ID cannot be empty");
        columns.push(FacilityID::new(header));
    }

    let mut rows = Vec::new();
    let mut times = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut fields = record.iter();
        let row = fields.next().unwrap_or_default();
        ensure!(!row.is_empty(), "Row ID cannot be empty");

        for (column, value) in columns.iter().zip(fields) {
            let time = parse_travel_time(value)
                .with_context(|| format!("Invalid travel time from {row} to {column}"))?;
            times.push(time);
        }
        rows.push(R::from(row.to_string()));
    }
    ensure!(!rows.is_empty(), "CSV file cannot be empty");

    TravelTimeMatrix::new(rows, columns, times)
}

/// Parse a single cell of a travel time matrix
fn parse_travel_time(value: &str) -> Result<f64> {
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }

    let time: f64 = value.parse()?;
    ensure!(time >= 0.0, "Travel times cannot be negative (got {time})");

    Ok(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn read_str<R: IDLike>(data: &str) -> Result<TravelTimeMatrix<R>> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());
        read_travel_time_matrix_from_reader(reader)
    }

    #[test]
    fn test_read_area_travel_times() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(AREA_TRAVEL_TIME_FILE_NAME)).unwrap();
            writeln!(
                file,
                "area,H1,H2
A1,10.5,20
A2,,3"
            )
            .unwrap();
        }

        let matrix = read_area_travel_times(dir.path()).unwrap();
        assert!(matrix.rows().iter().map(|id| &*id.0).eq(["A1", "A2"]));
        assert!(matrix.columns().iter().map(|id| &*id.0).eq(["H1", "H2"]));
        assert_eq!(matrix.get(&"A1".into(), &"H1".into()), Some(10.5));
        assert!(matrix.get(&"A2".into(), &"H1".into()).unwrap().is_nan());
        assert_eq!(matrix.get(&"A2".into(), &"H2".into()), Some(3.0));
    }

    #[test]
    fn test_read_facility_travel_times_missing_file() {
        let dir = tempdir().unwrap();
        assert_error!(
            read_facility_travel_times(dir.path()),
            format!(
                "Error reading {}",
                dir.path().join(FACILITY_TRAVEL_TIME_FILE_NAME).display()
            )
        );
    }

    #[rstest]
    #[case("", true)]
    #[case("nan", true)]
    #[case("NaN", true)]
    #[case("inf", false)]
    #[case("0", false)]
    #[case("12.25", false)]
    fn test_parse_travel_time(#[case] value: &str, #[case] is_nan: bool) {
        let time = parse_travel_time(value).unwrap();
        assert_eq!(time.is_nan(), is_nan);
    }

    #[rstest]
    #[case("-1")]
    #[case("-inf")]
    #[case("ten")]
    fn test_parse_travel_time_invalid(#[case] value: &str) {
        assert!(parse_travel_time(value).is_err());
    }

    #[test]
    fn test_read_matrix_invalid_cell() {
        assert_error!(
            read_str::<AreaID>("area,H1,H2\nA1,10,-5"),
            "Invalid travel time from A1 to H2"
        );
    }

    #[test]
    fn test_read_matrix_ragged() {
        assert!(read_str::<AreaID>("area,H1,H2\nA1,10").is_err());
    }

    #[test]
    fn test_read_matrix_no_facilities() {
        assert_error!(
            read_str::<AreaID>("area\nA1"),
            "Travel time matrix must have at least one facility column"
        );
    }

    #[test]
    fn test_read_matrix_no_rows() {
        assert_error!(read_str::<AreaID>("area,H1"), "CSV file cannot be empty");
    }

    #[test]
    fn test_read_matrix_duplicates() {
        assert_error!(
            read_str::<FacilityID>("from,H1,H2\nH1,0,5\nH1,5,0"),
            "Duplicate row ID: H1"
        );
        assert_error!(
            read_str::<FacilityID>("from,H1,H1\nH1,0,5"),
            "Duplicate facility column: H1"
        );
    }
}
