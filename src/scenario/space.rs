//! The scenario space is the Cartesian product of a number of parameter axes.
//!
//! Each axis names a scenario parameter and lists the values it should take. Every combination of
//! values is a [`ScenarioPoint`], identified by its position in the product. The product is
//! ordered with the first axis varying slowest and the last axis varying fastest.
use indexmap::IndexMap;
use itertools::Itertools;
use toml::Value;

/// Candidate values for each scenario parameter, in declaration order
pub type ScenarioAxes = IndexMap<String, Vec<Value>>;

/// One value for each scenario parameter
pub type ScenarioPoint = IndexMap<String, Value>;

/// An error indicating that the scenario axes are invalid
#[derive(PartialEq, Debug, derive_more::Display, derive_more::Error)]
pub enum ScenarioSpaceError {
    /// An axis has no values, so no scenarios can be generated
    #[display("No values provided for scenario parameter {axis}")]
    EmptyAxis {
        /// The name of the offending axis
        axis: String,
    },
    /// There are more combinations of values than can be indexed
    #[display("Too many scenarios")]
    TooManyScenarios,
}

/// The set of all scenarios generated by a set of axes
#[derive(PartialEq, Debug, Clone)]
pub struct ScenarioSpace {
    axes: ScenarioAxes,
    len: usize,
}

impl ScenarioSpace {
    /// Create a new [`ScenarioSpace`] from the given axes.
    ///
    /// If there are no axes, the space consists of a single scenario with no parameters set.
    pub fn new(axes: ScenarioAxes) -> Result<Self, ScenarioSpaceError> {
        let mut len: usize = 1;
        for (name, values) in &axes {
            if values.is_empty() {
                return Err(ScenarioSpaceError::EmptyAxis { axis: name.clone() });
            }
            len = len
                .checked_mul(values.len())
                .ok_or(ScenarioSpaceError::TooManyScenarios)?;
        }

        Ok(Self { axes, len })
    }

    /// The axes this space was generated from
    pub fn axes(&self) -> &ScenarioAxes {
        &self.axes
    }

    /// The number of scenarios
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the space is empty (never true for a successfully constructed space)
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the scenario with the given index, or `None` if the index is out of range
    pub fn point(&self, index: usize) -> Option<ScenarioPoint> {
        (index < self.len).then(|| self.point_unchecked(index))
    }

    /// Get the scenario with the given index, which must be in range
    fn point_unchecked(&self, index: usize) -> ScenarioPoint {
        // Decode index as a mixed-radix number, with the last axis as the least significant digit
        let mut remainder = index;
        let mut values = Vec::with_capacity(self.axes.len());
        for (name, axis_values) in self.axes.iter().rev() {
            let value = &axis_values[remainder % axis_values.len()];
            remainder /= axis_values.len();
            values.push((name.clone(), value.clone()));
        }

        values.into_iter().rev().collect()
    }

    /// Iterate over all scenarios in order, along with their indices
    pub fn iter(&self) -> impl Iterator<Item = (usize, ScenarioPoint)> + '_ {
        (0..self.len).map(|index| (index, self.point_unchecked(index)))
    }

    /// The names of the axes, in order
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.keys().map(String::as_str)
    }

    /// A human-readable summary of the axes, e.g. "speed (2 values), dose (3 values)"
    pub fn describe(&self) -> String {
        self.axes
            .iter()
            .map(|(name, values)| format!("{name} ({} values)", values.len()))
            .join(", ")
    }
}

/// Enumerate all scenarios generated by the given axes, along with their indices
pub fn enumerate_scenarios(
    axes: ScenarioAxes,
) -> Result<Vec<(usize, ScenarioPoint)>, ScenarioSpaceError> {
    let space = ScenarioSpace::new(axes)?;
    Ok(space.iter().collect())
}
