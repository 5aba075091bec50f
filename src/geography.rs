//! Functionality for resolving the nearest treatment facilities for each area.
use crate::area::{AdmissionsMap, AreaID};
use crate::facility::{Capability, FacilityID, FacilityMap};
use crate::travel_time::TravelTimeMatrix;
use anyhow::Result;
use log::info;

pub mod collate;
pub use collate::{CombinedRecord, CombinedTable, collate};
pub mod nearest;
pub use nearest::{
    Assignment, AssignmentMap, ResolutionError, resolve_nearest, resolve_nearest_with_capability,
};
pub mod transfer;
pub use transfer::{TransferAssignment, TransferMap, resolve_transfers};

/// The raw geographic data required to assign facilities to areas
#[derive(PartialEq, Debug)]
pub struct GeoData {
    /// All facilities and the treatments they offer
    pub facilities: FacilityMap,
    /// Stroke admissions for each area
    pub admissions: AdmissionsMap,
    /// Travel times from areas to facilities
    pub area_travel_times: TravelTimeMatrix<AreaID>,
    /// Travel times between facilities
    pub facility_travel_times: TravelTimeMatrix<FacilityID>,
}

/// The individual assignments calculated from [`GeoData`], before being combined
#[derive(PartialEq, Debug)]
pub struct ResolvedAssignments {
    /// Nearest thrombolysis facility for each area
    pub nearest_ivt: AssignmentMap<AreaID>,
    /// Nearest thrombectomy facility for each area
    pub nearest_mt: AssignmentMap<AreaID>,
    /// Nearest mobile stroke unit base for each area
    pub nearest_msu: AssignmentMap<AreaID>,
    /// Thrombectomy facility to transfer to from each facility
    pub transfers: TransferMap,
}

impl ResolvedAssignments {
    /// Combine the assignments with admissions data into one record per area
    pub fn collate(&self, admissions: &AdmissionsMap) -> CombinedTable {
        collate(
            &self.nearest_ivt,
            &self.nearest_mt,
            &self.nearest_msu,
            &self.transfers,
            admissions,
        )
    }
}

/// Resolve the nearest facility for each capability, plus transfer facilities.
pub fn resolve_assignments(geodata: &GeoData) -> Result<ResolvedAssignments> {
    let resolve = |capability| {
        let assignments = resolve_nearest_with_capability(
            &geodata.area_travel_times,
            &geodata.facilities,
            capability,
        )?;
        info!(
            "Resolved nearest {capability} facility for {} areas",
            assignments.len()
        );
        Ok::<_, anyhow::Error>(assignments)
    };

    let nearest_ivt = resolve(Capability::Thrombolysis)?;
    let nearest_mt = resolve(Capability::Thrombectomy)?;
    let nearest_msu = resolve(Capability::MobileStrokeUnit)?;
    let transfers = resolve_transfers(&geodata.facility_travel_times, &geodata.facilities)?;
    info!("Resolved transfer facility for {} facilities", transfers.len());

    Ok(ResolvedAssignments {
        nearest_ivt,
        nearest_mt,
        nearest_msu,
        transfers,
    })
}

/// Resolve all assignments and combine them into a single table keyed by area
pub fn process_geography(geodata: &GeoData) -> Result<CombinedTable> {
    let assignments = resolve_assignments(geodata)?;
    Ok(assignments.collate(&geodata.admissions))
}
