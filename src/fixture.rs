//! Fixtures for tests

use crate::area::{AdmissionsMap, AreaID};
use crate::facility::{Facility, FacilityID, FacilityMap};
use crate::geography::GeoData;
use crate::travel_time::TravelTimeMatrix;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.err().expect("expected an error").chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

fn facility(id: &str, ivt: bool, mt: bool, msu: bool) -> (FacilityID, Facility) {
    let facility = Facility {
        id: id.into(),
        name: format!("{id} Hospital"),
        offers_thrombolysis: ivt,
        offers_thrombectomy: mt,
        offers_msu: msu,
    };
    (facility.id.clone(), facility)
}

#[fixture]
pub fn facilities() -> FacilityMap {
    [
        facility("H1", true, false, true),
        facility("H2", true, true, false),
        facility("H3", false, true, false),
    ]
    .into_iter()
    .collect()
}

#[fixture]
pub fn area_travel_times() -> TravelTimeMatrix<AreaID> {
    TravelTimeMatrix::new(
        ["A1".into(), "A2".into(), "A3".into()],
        ["H1".into(), "H2".into(), "H3".into()],
        vec![
            10.0, 20.0, 15.0, // A1
            30.0, 5.0, 40.0, // A2
            25.0, 25.0, 12.0, // A3
        ],
    )
    .unwrap()
}

#[fixture]
pub fn facility_travel_times() -> TravelTimeMatrix<FacilityID> {
    TravelTimeMatrix::new(
        ["H1".into(), "H2".into(), "H3".into()],
        ["H1".into(), "H2".into(), "H3".into()],
        vec![
            0.0, 18.0, 22.0, // H1
            18.0, 0.0, 9.0, // H2
            22.0, 9.0, 0.0, // H3
        ],
    )
    .unwrap()
}

#[fixture]
pub fn admissions() -> AdmissionsMap {
    [("A1".into(), 100.0), ("A2".into(), 50.0)]
        .into_iter()
        .collect()
}

#[fixture]
pub fn geodata(
    facilities: FacilityMap,
    admissions: AdmissionsMap,
    area_travel_times: TravelTimeMatrix<AreaID>,
    facility_travel_times: TravelTimeMatrix<FacilityID>,
) -> GeoData {
    GeoData {
        facilities,
        admissions,
        area_travel_times,
        facility_travel_times,
    }
}
