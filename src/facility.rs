//! Facilities are hospital-like units which may offer one or more stroke treatments.
use crate::id::define_id_type;
use indexmap::{IndexMap, IndexSet};
use strum::{Display, EnumIter};

define_id_type! {FacilityID}

/// A map of [`Facility`]s, keyed by facility ID
pub type FacilityMap = IndexMap<FacilityID, Facility>;

/// A treatment capability which a facility may offer
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Display, EnumIter)]
pub enum Capability {
    /// Intravenous thrombolysis (IVT)
    #[strum(to_string = "thrombolysis")]
    Thrombolysis,
    /// Mechanical thrombectomy (MT)
    #[strum(to_string = "thrombectomy")]
    Thrombectomy,
    /// Base for a mobile stroke unit (MSU)
    #[strum(to_string = "mobile stroke unit")]
    MobileStrokeUnit,
}

/// Represents a facility with an ID, a name and the treatments it offers.
#[derive(PartialEq, Debug, Clone)]
pub struct Facility {
    /// A unique identifier for the facility (e.g. a postcode)
    pub id: FacilityID,
    /// A human-readable name for the facility
    pub name: String,
    /// Whether the facility offers thrombolysis
    pub offers_thrombolysis: bool,
    /// Whether the facility offers thrombectomy
    pub offers_thrombectomy: bool,
    /// Whether the facility is a base for a mobile stroke unit
    pub offers_msu: bool,
}

impl Facility {
    /// Whether the facility offers the given capability
    pub fn offers(&self, capability: Capability) -> bool {
        match capability {
            Capability::Thrombolysis => self.offers_thrombolysis,
            Capability::Thrombectomy => self.offers_thrombectomy,
            Capability::MobileStrokeUnit => self.offers_msu,
        }
    }
}

/// Get the IDs of all facilities offering the given capability.
///
/// The IDs are returned in the same order as they appear in `facilities`.
pub fn facilities_with_capability(
    facilities: &FacilityMap,
    capability: Capability,
) -> IndexSet<FacilityID> {
    facilities
        .values()
        .filter(|facility| facility.offers(capability))
        .map(|facility| facility.id.clone())
        .collect()
}
