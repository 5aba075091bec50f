//! Code for finding the nearest eligible facility for each row of a travel time matrix.
use crate::facility::{Capability, FacilityID, FacilityMap, facilities_with_capability};
use crate::id::IDLike;
use crate::travel_time::TravelTimeMatrix;
use anyhow::Result;
use indexmap::{IndexMap, IndexSet};
use log::warn;

/// The nearest facility for a given row and how long it takes to get there
#[derive(PartialEq, Debug, Clone)]
pub struct Assignment {
    /// The nearest eligible facility
    pub facility: FacilityID,
    /// Travel time to the facility in minutes
    pub time: f64,
}

/// Assignments keyed by row, in the same order as the rows of the travel time matrix.
///
/// A value of `None` indicates that none of the eligible facilities could be reached from that
/// row.
pub type AssignmentMap<R> = IndexMap<R, Option<Assignment>>;

/// An error which prevents nearest facilities from being resolved
#[derive(PartialEq, Debug, derive_more::Display, derive_more::Error)]
pub enum ResolutionError {
    /// There are no facilities to choose from
    #[display("No eligible facilities provided")]
    EmptyCandidateSet,
    /// An eligible facility has no column in the travel time matrix
    #[display("Facility {facility} is missing from the travel time matrix")]
    UnknownFacility {
        /// The missing facility
        facility: FacilityID,
    },
}

/// Find the nearest eligible facility for every row of `matrix`.
///
/// Non-finite travel times are ignored. If two or more facilities are equally near, the one which
/// comes first in the matrix's column order is chosen, regardless of the order of `eligible`.
///
/// # Arguments
///
/// * `matrix` - Travel times from each row to each facility
/// * `eligible` - The facilities which may be assigned. Must be a non-empty subset of the
///   matrix's columns.
///
/// # Returns
///
/// An [`AssignmentMap`] with one entry per row of the matrix.
pub fn resolve_nearest<R: IDLike>(
    matrix: &TravelTimeMatrix<R>,
    eligible: &IndexSet<FacilityID>,
) -> Result<AssignmentMap<R>, ResolutionError> {
    if eligible.is_empty() {
        return Err(ResolutionError::EmptyCandidateSet);
    }

    let columns = matrix.columns();
    let mut col_indices = eligible
        .iter()
        .map(|id| {
            columns
                .get_index_of(id)
                .ok_or_else(|| ResolutionError::UnknownFacility {
                    facility: id.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    col_indices.sort_unstable();

    let assignments = matrix
        .iter_rows()
        .map(|(row, times)| {
            let mut nearest: Option<(usize, f64)> = None;
            for &idx in &col_indices {
                let time = times[idx];
                if !time.is_finite() {
                    continue;
                }

                // Strict comparison so that the first column wins on ties
                if nearest.is_none_or(|(_, best)| time < best) {
                    nearest = Some((idx, time));
                }
            }

            let assignment = nearest.map(|(idx, time)| Assignment {
                facility: columns[idx].clone(),
                time,
            });
            (row.clone(), assignment)
        })
        .collect();

    Ok(assignments)
}

/// Find the nearest facility offering `capability` for every row of `matrix`.
///
/// Rows for which no such facility is reachable are assigned `None` and reported with a warning.
pub fn resolve_nearest_with_capability<R: IDLike>(
    matrix: &TravelTimeMatrix<R>,
    facilities: &FacilityMap,
    capability: Capability,
) -> Result<AssignmentMap<R>> {
    let eligible = facilities_with_capability(facilities, capability);
    let assignments = resolve_nearest(matrix, &eligible).map_err(|err| {
        let msg = match err {
            ResolutionError::EmptyCandidateSet => format!("No facility offers {capability}"),
            ResolutionError::UnknownFacility { .. } => {
                format!("Could not find nearest {capability} facility")
            }
        };
        anyhow::Error::new(err).context(msg)
    })?;

    let unreachable = count_unreachable(&assignments);
    if unreachable > 0 {
        warn!("{unreachable} rows cannot reach any facility offering {capability}");
    }

    Ok(assignments)
}

/// Count the rows for which no facility could be reached
pub fn count_unreachable<R>(assignments: &AssignmentMap<R>) -> usize {
    assignments.values().filter(|a| a.is_none()).count()
}
