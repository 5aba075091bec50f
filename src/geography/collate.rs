//! Code for combining the separately resolved assignments into a single record per area.
use super::nearest::{Assignment, AssignmentMap};
use super::transfer::{TransferAssignment, TransferMap};
use crate::area::{AdmissionsMap, AreaID};
use indexmap::IndexMap;

/// All resolved geographic information for a single area.
///
/// Any field may be missing, e.g. if no facility could be reached from the area or there are no
/// admissions data for it.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct CombinedRecord {
    /// Nearest thrombolysis facility
    pub nearest_ivt: Option<Assignment>,
    /// Nearest thrombectomy facility
    pub nearest_mt: Option<Assignment>,
    /// Thrombectomy facility to transfer to from the nearest thrombolysis facility
    pub transfer_mt: Option<TransferAssignment>,
    /// Nearest mobile stroke unit base
    pub nearest_msu: Option<Assignment>,
    /// Number of stroke admissions
    pub admissions: Option<f64>,
}

/// Combined records keyed by area
pub type CombinedTable = IndexMap<AreaID, CombinedRecord>;

/// Combine assignments and admissions into one record per area.
///
/// The areas of `nearest_ivt` determine which rows appear in the output and in what order. All
/// other inputs are left-joined onto these rows: areas missing from another input get `None` for
/// the corresponding fields rather than being dropped.
///
/// Transfers are joined via the area's nearest thrombolysis facility rather than the area itself.
pub fn collate(
    nearest_ivt: &AssignmentMap<AreaID>,
    nearest_mt: &AssignmentMap<AreaID>,
    nearest_msu: &AssignmentMap<AreaID>,
    transfers: &TransferMap,
    admissions: &AdmissionsMap,
) -> CombinedTable {
    nearest_ivt
        .iter()
        .map(|(area_id, ivt)| {
            let transfer_mt = ivt
                .as_ref()
                .and_then(|ivt| transfers.get(&ivt.facility))
                .and_then(Clone::clone);

            let record = CombinedRecord {
                nearest_ivt: ivt.clone(),
                nearest_mt: nearest_mt.get(area_id).cloned().flatten(),
                transfer_mt,
                nearest_msu: nearest_msu.get(area_id).cloned().flatten(),
                admissions: admissions.get(area_id).copied(),
            };
            (area_id.clone(), record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::FacilityID;

    fn assignment(facility: &str, time: f64) -> Option<Assignment> {
        Some(Assignment {
            facility: facility.into(),
            time,
        })
    }

    fn transfer(facility: &str, time: f64, transfer_required: bool) -> Option<TransferAssignment> {
        Some(TransferAssignment {
            facility: facility.into(),
            time,
            transfer_required,
        })
    }

    fn ivt() -> AssignmentMap<AreaID> {
        AssignmentMap::from([
            ("A1".into(), assignment("H1", 10.0)),
            ("A2".into(), assignment("H2", 5.0)),
            ("A3".into(), None),
            ("A4".into(), assignment("H4", 8.0)),
        ])
    }

    fn transfers() -> TransferMap {
        TransferMap::from([
            ("H1".into(), transfer("H2", 18.0, true)),
            ("H2".into(), transfer("H2", 0.0, false)),
        ])
    }

    #[test]
    fn test_collate() {
        let mt = AssignmentMap::from([
            ("A1".into(), assignment("H3", 15.0)),
            ("A2".into(), assignment("H2", 5.0)),
        ]);
        let msu = AssignmentMap::from([("A1".into(), assignment("H1", 10.0))]);
        let admissions = AdmissionsMap::from([("A2".into(), 50.0), ("A9".into(), 1.0)]);

        let table = collate(&ivt(), &mt, &msu, &transfers(), &admissions);

        // Row count and order come from the thrombolysis assignments
        assert!(table.keys().map(|id| &*id.0).eq(["A1", "A2", "A3", "A4"]));

        assert_eq!(
            table["A1"],
            CombinedRecord {
                nearest_ivt: assignment("H1", 10.0),
                nearest_mt: assignment("H3", 15.0),
                transfer_mt: transfer("H2", 18.0, true),
                nearest_msu: assignment("H1", 10.0),
                admissions: None,
            }
        );
        assert_eq!(
            table["A2"],
            CombinedRecord {
                nearest_ivt: assignment("H2", 5.0),
                nearest_mt: assignment("H2", 5.0),
                transfer_mt: transfer("H2", 0.0, false),
                nearest_msu: None,
                admissions: Some(50.0),
            }
        );

        // No thrombolysis facility, so nothing to join transfers on
        assert_eq!(table["A3"], CombinedRecord::default());

        // Thrombolysis facility without an entry in the transfer table
        assert_eq!(table["A4"].nearest_ivt, assignment("H4", 8.0));
        assert_eq!(table["A4"].transfer_mt, None);
    }

    #[test]
    fn test_collate_row_count_independent_of_other_inputs() {
        let empty = AssignmentMap::new();
        let table = collate(&ivt(), &empty, &empty, &TransferMap::new(), &AdmissionsMap::new());
        assert_eq!(table.len(), ivt().len());
    }

    #[test]
    fn test_collate_empty_anchor() {
        let mt = AssignmentMap::from([("A1".into(), assignment("H3", 15.0))]);
        let table = collate(
            &AssignmentMap::new(),
            &mt,
            &mt,
            &TransferMap::from([(FacilityID::new("H1"), None)]),
            &AdmissionsMap::from([("A1".into(), 1.0)]),
        );
        assert!(table.is_empty());
    }
}
