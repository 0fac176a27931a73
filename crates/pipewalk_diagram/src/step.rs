// SPDX-License-Identifier: MIT OR Apache-2.0
//! Step definitions.

use crate::geometry::Anchor;
use serde::{Deserialize, Serialize};

/// Identifier for a step.
///
/// Step ids are positive and dense from 1 in diagram order; id `n` names the
/// step at index `n - 1` of the step table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StepId(u32);

impl StepId {
    /// Create a step id
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the numeric id
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One stage of the visualized sequence.
///
/// Steps are defined once at startup and immutable for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Step id, dense from 1
    pub id: StepId,
    /// Display name
    pub name: String,
    /// Short one-line description
    pub description: String,
    /// Normalized indicator position
    pub position: Anchor,
    /// Detail payload shown while the step is selected
    pub details: String,
}

impl Step {
    /// Create a step
    pub fn new(
        id: u32,
        name: impl Into<String>,
        description: impl Into<String>,
        position: Anchor,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: StepId::new(id),
            name: name.into(),
            description: description.into(),
            position,
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_id_display() {
        assert_eq!(StepId::new(4).to_string(), "4");
    }

    #[test]
    fn test_step_creation() {
        let step = Step::new(1, "Source", "Code lands in the repo", Anchor::new(35.0, 15.0), "details");
        assert_eq!(step.id.get(), 1);
        assert_eq!(step.name, "Source");
    }
}
