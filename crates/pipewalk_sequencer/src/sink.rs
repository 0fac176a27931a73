// SPDX-License-Identifier: MIT OR Apache-2.0
//! Presentation sink: the abstract display surface.
//!
//! The sequencer never touches a real UI. It emits indicator styling,
//! detail selection, and marker lifecycle calls through this trait, and
//! reads back exactly one thing: the rendered viewport size used to convert
//! normalized positions to pixels at animation time.

use pipewalk_diagram::{Anchor, MarkerKind, PixelPoint, StepId, Viewport};
use std::time::Duration;
use uuid::Uuid;

/// Unique identifier for a transient marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub Uuid);

impl MarkerId {
    /// Create a new random marker ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MarkerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Visual state of a step indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorPhase {
    /// Zero visibility, neutral color
    #[default]
    Hidden,
    /// Full visibility, in-progress color, "current" styling
    Active,
    /// Full visibility, success color
    Completed,
}

/// Display surface driven by the sequencer.
///
/// Implementations own the visuals; the sequencer owns the state machine.
/// All calls are infallible: a sink that cannot honor a call drops it.
pub trait PresentationSink {
    /// Whether an indicator exists for `step`
    fn has_indicator(&self, step: StepId) -> bool;

    /// Position an indicator at its normalized anchor
    fn place_indicator(&mut self, step: StepId, anchor: Anchor);

    /// Apply a visual phase to an indicator
    fn set_indicator_phase(&mut self, step: StepId, phase: IndicatorPhase);

    /// Bind a step's detail payload to its display slot
    fn install_details(&mut self, step: StepId, details: &str);

    /// Show exactly one step's details, hiding the rest
    fn show_details(&mut self, step: StepId);

    /// Create a transient marker at a pixel position
    fn spawn_marker(&mut self, kind: MarkerKind, at: PixelPoint) -> MarkerId;

    /// Begin moving a marker towards `to` over `travel`
    fn begin_marker_move(&mut self, marker: MarkerId, to: PixelPoint, travel: Duration);

    /// Remove one transient marker
    fn remove_marker(&mut self, marker: MarkerId);

    /// Remove every transient marker
    fn clear_markers(&mut self);

    /// Current rendered size of the reference surface
    fn viewport(&self) -> Viewport;
}
