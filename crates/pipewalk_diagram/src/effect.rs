// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-step pulse effects.

use crate::geometry::Anchor;
use crate::step::StepId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// An auxiliary pulse spawned a fixed delay after entering a step.
///
/// Effects are explicit per-step configuration. A diagram that wants a
/// deployment pulse on steps 3 and 5 lists two entries; nothing is inferred
/// from step numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulseEffect {
    /// Step whose entry triggers the pulse
    pub step: StepId,
    /// Delay after the step becomes active
    pub delay: Duration,
    /// Normalized pulse position
    pub position: Anchor,
}

impl PulseEffect {
    /// Create a pulse effect
    pub fn new(step: u32, delay: Duration, position: Anchor) -> Self {
        Self { step: StepId::new(step), delay, position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_effect_creation() {
        let pulse = PulseEffect::new(3, Duration::from_millis(1500), Anchor::new(50.0, 65.0));
        assert_eq!(pulse.step.get(), 3);
        assert_eq!(pulse.delay, Duration::from_millis(1500));
    }
}
