//! Closing situations of storm-surge barriers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete key for the state of nearby barriers (open, closed, failed...).
///
/// Wave data and model uncertainties are tabulated per closing situation.
/// The numbering comes from the hydraulic database and carries no meaning
/// here.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ClosingSituation(u32);

impl ClosingSituation {
    /// Creates a closing situation from its database id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the database id.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl From<u32> for ClosingSituation {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ClosingSituation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
