//! Code for reading the facilities file.
use super::*;
use crate::facility::{Facility, FacilityMap};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

const FACILITIES_FILE_NAME: &str = "stroke_hospitals.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct FacilityRaw {
    #[serde(rename = "Postcode")]
    id: String,
    #[serde(rename = "Hospital_name", default)]
    name: Option<String>,
    #[serde(rename = "Use_IVT", deserialize_with = "deserialise_flag")]
    use_ivt: bool,
    #[serde(rename = "Use_MT", deserialize_with = "deserialise_flag")]
    use_mt: bool,
    #[serde(rename = "Use_MSU", deserialize_with = "deserialise_flag")]
    use_msu: bool,
}

/// Read facilities from the specified model directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// A map of facilities, in the order in which they appear in the file.
pub fn read_facilities(model_dir: &Path) -> Result<FacilityMap> {
    let file_path = model_dir.join(FACILITIES_FILE_NAME);
    let facilities_csv = read_csv(&file_path)?;
    read_facilities_from_iter(facilities_csv).with_context(|| input_err_msg(&file_path))
}

fn read_facilities_from_iter<I>(iter: I) -> Result<FacilityMap>
where
    I: Iterator<Item = FacilityRaw>,
{
    let mut facilities = FacilityMap::new();
    for raw in iter {
        ensure!(!raw.id.is_empty(), "Facility ID cannot be empty");

        let facility = Facility {
            id: raw.id.into(),
            name: raw.name.unwrap_or_default(),
            offers_thrombolysis: raw.use_ivt,
            offers_thrombectomy: raw.use_mt,
            offers_msu: raw.use_msu,
        };
        let id = facility.id.clone();
        ensure!(
            facilities.insert(id.clone(), facility).is_none(),
            "Duplicate facility ID found: {id}"
        );
    }

    Ok(facilities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn raw(id: &str, use_ivt: bool, use_mt: bool, use_msu: bool) -> FacilityRaw {
        FacilityRaw {
            id: id.into(),
            name: None,
            use_ivt,
            use_mt,
            use_msu,
        }
    }

    #[test]
    fn test_read_facilities() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(FACILITIES_FILE_NAME)).unwrap();
            writeln!(
                file,
                "Postcode,Hospital_name,Use_IVT,Use_MT,Use_MSU
TR13HD,Royal Cornwall,1,0,1
PL68DH,Derriford,1,1,0
EX25DW,,0,1,0"
            )
            .unwrap();
        }

        let facilities = read_facilities(dir.path()).unwrap();
        assert!(facilities.keys().map(|id| &*id.0).eq(["TR13HD", "PL68DH", "EX25DW"]));
        assert_eq!(
            facilities["PL68DH"],
            Facility {
                id: "PL68DH".into(),
                name: "Derriford".into(),
                offers_thrombolysis: true,
                offers_thrombectomy: true,
                offers_msu: false,
            }
        );
        assert_eq!(facilities["EX25DW"].name, "");
        assert!(facilities["TR13HD"].offers_msu);
    }

    #[test]
    fn test_read_facilities_bad_flag() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(FACILITIES_FILE_NAME)).unwrap();
            writeln!(file, "Postcode,Hospital_name,Use_IVT,Use_MT,Use_MSU\nH1,A,2,0,0").unwrap();
        }

        assert!(read_facilities(dir.path()).is_err());
    }

    #[test]
    fn test_read_facilities_from_iter_duplicate() {
        let iter = [raw("H1", true, false, false), raw("H1", false, true, false)].into_iter();
        assert_error!(
            read_facilities_from_iter(iter),
            "Duplicate facility ID found: H1"
        );
    }

    #[test]
    fn test_read_facilities_from_iter_empty_id() {
        let iter = [raw("", true, false, false)].into_iter();
        assert_error!(read_facilities_from_iter(iter), "Facility ID cannot be empty");
    }
}
