//! Code for finding the thrombectomy facility to which patients are transferred from each facility.
use super::nearest::resolve_nearest_with_capability;
use crate::facility::{Capability, FacilityID, FacilityMap};
use crate::travel_time::TravelTimeMatrix;
use anyhow::{Context, Result};
use indexmap::IndexMap;

/// The thrombectomy facility that patients at a given facility would be sent to
#[derive(PartialEq, Debug, Clone)]
pub struct TransferAssignment {
    /// The nearest thrombectomy facility
    pub facility: FacilityID,
    /// Travel time between the two facilities in minutes
    pub time: f64,
    /// Whether patients have to be moved, i.e. the source facility doesn't offer thrombectomy
    /// itself
    pub transfer_required: bool,
}

/// Transfer assignments keyed by source facility
pub type TransferMap = IndexMap<FacilityID, Option<TransferAssignment>>;

/// Find the nearest thrombectomy facility for every source facility in `matrix`.
///
/// # Arguments
///
/// * `matrix` - Travel times between facilities
/// * `facilities` - All facilities, used to determine which offer thrombectomy
pub fn resolve_transfers(
    matrix: &TravelTimeMatrix<FacilityID>,
    facilities: &FacilityMap,
) -> Result<TransferMap> {
    let assignments =
        resolve_nearest_with_capability(matrix, facilities, Capability::Thrombectomy)
            .context("Could not resolve transfer facilities")?;

    let transfers = assignments
        .into_iter()
        .map(|(source, assignment)| {
            let transfer = assignment.map(|assignment| TransferAssignment {
                transfer_required: assignment.facility != source,
                facility: assignment.facility,
                time: assignment.time,
            });
            (source, transfer)
        })
        .collect();

    Ok(transfers)
}
