// SPDX-License-Identifier: MIT OR Apache-2.0
//! Diagram container, validation, and RON persistence.

use crate::effect::PulseEffect;
use crate::path::PathSegment;
use crate::step::{Step, StepId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while loading or validating a diagram
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    /// Diagram defines no steps
    #[error("diagram '{0}' defines no steps")]
    Empty(String),

    /// Step ids are not dense from 1
    #[error("step ids must be dense from 1: expected {expected}, found {found}")]
    NonDenseId {
        /// Id the step table position requires
        expected: u32,
        /// Id actually found there
        found: u32,
    },

    /// A normalized position is outside `[0, 100]`
    #[error("step {step} position out of range (top {top}, left {left})")]
    PositionOutOfRange {
        /// Offending step id
        step: StepId,
        /// Authored top percent
        top: f32,
        /// Authored left percent
        left: f32,
    },

    /// More segments than steps
    #[error("{segments} path segments defined for {steps} steps")]
    TooManySegments {
        /// Segment count
        segments: usize,
        /// Step count
        steps: usize,
    },

    /// A pulse effect names a step the diagram does not define
    #[error("pulse effect references unknown step {0}")]
    UnknownPulseStep(StepId),

    /// Reading the diagram file failed
    #[error("failed to read diagram file: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing the diagram failed
    #[error("failed to parse diagram: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serializing the diagram failed
    #[error("failed to serialize diagram: {0}")]
    Serialize(#[from] ron::Error),
}

/// An immutable pipeline diagram: the declarative step/path/effect table
/// the sequencer walks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagram {
    /// Diagram name
    pub name: String,
    /// Ordered step table, ids dense from 1
    steps: Vec<Step>,
    /// Path segments; segment `i` animates the transition into step `i + 1`
    #[serde(default)]
    segments: Vec<PathSegment>,
    /// Pulse effects keyed to step entry
    #[serde(default)]
    pulses: Vec<PulseEffect>,
}

impl Diagram {
    /// Build and validate a diagram
    pub fn new(
        name: impl Into<String>,
        steps: Vec<Step>,
        segments: Vec<PathSegment>,
        pulses: Vec<PulseEffect>,
    ) -> Result<Self, DiagramError> {
        let diagram = Self { name: name.into(), steps, segments, pulses };
        diagram.validate()?;
        Ok(diagram)
    }

    /// Validate the table invariants
    pub fn validate(&self) -> Result<(), DiagramError> {
        if self.steps.is_empty() {
            return Err(DiagramError::Empty(self.name.clone()));
        }

        for (index, step) in self.steps.iter().enumerate() {
            let expected = index as u32 + 1;
            if step.id.get() != expected {
                return Err(DiagramError::NonDenseId { expected, found: step.id.get() });
            }
            if !step.position.in_bounds() {
                return Err(DiagramError::PositionOutOfRange {
                    step: step.id,
                    top: step.position.top,
                    left: step.position.left,
                });
            }
        }

        if self.segments.len() > self.steps.len() {
            return Err(DiagramError::TooManySegments {
                segments: self.segments.len(),
                steps: self.steps.len(),
            });
        }

        for pulse in &self.pulses {
            if self.step(pulse.step).is_none() {
                return Err(DiagramError::UnknownPulseStep(pulse.step));
            }
        }

        Ok(())
    }

    /// Number of steps
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Get a step by id
    pub fn step(&self, id: StepId) -> Option<&Step> {
        let index = id.get().checked_sub(1)? as usize;
        self.steps.get(index)
    }

    /// Iterate steps in diagram order
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    /// Get a path segment by index
    pub fn segment(&self, index: usize) -> Option<&PathSegment> {
        self.segments.get(index)
    }

    /// Number of path segments
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Pulse effects triggered by entering `step`
    pub fn pulses_for(&self, step: StepId) -> impl Iterator<Item = &PulseEffect> {
        self.pulses.iter().filter(move |p| p.step == step)
    }

    /// Parse and validate a diagram from RON text
    pub fn from_ron_str(text: &str) -> Result<Self, DiagramError> {
        let diagram: Diagram = ron::from_str(text)?;
        diagram.validate()?;
        Ok(diagram)
    }

    /// Load and validate a diagram from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DiagramError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, DiagramError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}
