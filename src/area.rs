//! Areas are the small geographic units (e.g. LSOAs) for which admissions are recorded.
use crate::id::define_id_type;
use indexmap::IndexMap;

define_id_type! {AreaID}

/// Number of stroke admissions for each area
pub type AdmissionsMap = IndexMap<AreaID, f64>;
