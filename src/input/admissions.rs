//! Code for reading the admissions file.
use super::*;
use crate::area::{AdmissionsMap, AreaID};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

const ADMISSIONS_FILE_NAME: &str = "admissions.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct AdmissionsRaw {
    area: String,
    admissions: f64,
}

/// Read stroke admissions for each area from the specified model directory.
///
/// Any columns other than `area` and `admissions` are ignored.
pub fn read_admissions(model_dir: &Path) -> Result<AdmissionsMap> {
    let file_path = model_dir.join(ADMISSIONS_FILE_NAME);
    let admissions_csv = read_csv(&file_path)?;
    read_admissions_from_iter(admissions_csv).with_context(|| input_err_msg(&file_path))
}

fn read_admissions_from_iter<I>(iter: I) -> Result<AdmissionsMap>
where
    I: Iterator<Item = AdmissionsRaw>,
{
    let mut map = AdmissionsMap::new();
    for raw in iter {
        ensure!(
            raw.admissions.is_finite() && raw.admissions >= 0.0,
            "Invalid number of admissions for area {} ({}). Must be >=0.",
            raw.area,
            raw.admissions
        );

        let id = AreaID::from(raw.area);
        ensure!(
            map.insert(id.clone(), raw.admissions).is_none(),
            "Duplicate area ID found: {id}"
        );
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn raw(area: &str, admissions: f64) -> AdmissionsRaw {
        AdmissionsRaw {
            area: area.into(),
            admissions,
        }
    }

    #[test]
    fn test_read_admissions() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(ADMISSIONS_FILE_NAME)).unwrap();
            writeln!(
                file,
                "area,admissions,area_name
E01000001,12.5,City of London 001A
E01000002,0,City of London 001B"
            )
            .unwrap();
        }

        let admissions = read_admissions(dir.path()).unwrap();
        assert_eq!(
            admissions,
            AdmissionsMap::from([("E01000001".into(), 12.5), ("E01000002".into(), 0.0)])
        );
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_read_admissions_invalid(#[case] admissions: f64) {
        assert!(read_admissions_from_iter([raw("A1", admissions)].into_iter()).is_err());
    }

    #[test]
    fn test_read_admissions_duplicate() {
        let iter = [raw("A1", 1.0), raw("A1", 2.0)].into_iter();
        assert_error!(read_admissions_from_iter(iter), "Duplicate area ID found: A1");
    }
}
