// SPDX-License-Identifier: MIT OR Apache-2.0
//! Concrete presentation sink backed by an in-memory scene.
//!
//! The sequencer drives this presenter through the sink trait; the panel
//! reads it back each frame to paint indicators, details, and markers.
//! Marker moves are interpolated here against the scene clock, eased to
//! match the reference transition.

use indexmap::IndexMap;
use pipewalk_diagram::{Anchor, MarkerKind, PixelPoint, StepId, Viewport};
use pipewalk_sequencer::{IndicatorPhase, MarkerId, PresentationSink};
use std::time::Duration;

/// Visual state of one step indicator
#[derive(Debug, Clone, Copy)]
pub struct IndicatorVisual {
    /// Normalized position on the canvas
    pub anchor: Anchor,
    /// Current phase
    pub phase: IndicatorPhase,
}

#[derive(Debug, Clone, Copy)]
struct MarkerMove {
    from: PixelPoint,
    to: PixelPoint,
    started: Duration,
    travel: Duration,
}

/// Visual state of one transient marker
#[derive(Debug, Clone, Copy)]
pub struct MarkerVisual {
    /// Marker style
    pub kind: MarkerKind,
    origin: PixelPoint,
    spawned: Duration,
    current_move: Option<MarkerMove>,
}

impl MarkerVisual {
    /// Pixel position at a given scene clock reading
    pub fn position_at(&self, clock: Duration) -> PixelPoint {
        let Some(m) = self.current_move else {
            return self.origin;
        };
        if m.travel.is_zero() {
            return m.to;
        }
        let t = clock.saturating_sub(m.started).as_secs_f32() / m.travel.as_secs_f32();
        m.from.lerp(m.to, ease_in_out(t.clamp(0.0, 1.0)))
    }

    /// Time since the marker was spawned
    pub fn age(&self, clock: Duration) -> Duration {
        clock.saturating_sub(self.spawned)
    }
}

/// Quadratic ease-in-out, close enough to the reference CSS easing
fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// In-memory scene the panel paints from
pub struct ScenePresenter {
    clock: Duration,
    viewport: Viewport,
    indicators: IndexMap<StepId, IndicatorVisual>,
    details: IndexMap<StepId, String>,
    selected: Option<StepId>,
    markers: IndexMap<MarkerId, MarkerVisual>,
}

impl ScenePresenter {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            clock: Duration::ZERO,
            viewport: Viewport::default(),
            indicators: IndexMap::new(),
            details: IndexMap::new(),
            selected: None,
            markers: IndexMap::new(),
        }
    }

    /// Register an indicator slot for a step. Only registered steps
    /// satisfy [`PresentationSink::has_indicator`].
    pub fn register_indicator(&mut self, step: StepId) {
        self.indicators.insert(
            step,
            IndicatorVisual { anchor: Anchor::new(0.0, 0.0), phase: IndicatorPhase::Hidden },
        );
    }

    /// Advance the scene clock by elapsed frame time
    pub fn advance_clock(&mut self, dt: Duration) {
        self.clock += dt;
    }

    /// Current scene clock reading
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Update the rendered canvas size
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Current canvas size (inherent accessor, same value as the sink's)
    pub fn current_viewport(&self) -> Viewport {
        self.viewport
    }

    /// Iterate indicators in registration order
    pub fn indicators(&self) -> impl Iterator<Item = (StepId, &IndicatorVisual)> {
        self.indicators.iter().map(|(id, vis)| (*id, vis))
    }

    /// Iterate live markers
    pub fn markers(&self) -> impl Iterator<Item = &MarkerVisual> {
        self.markers.values()
    }

    /// Number of live markers
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// The step whose details are showing, with its payload
    pub fn selected_details(&self) -> Option<(StepId, &str)> {
        let id = self.selected?;
        let text = self.details.get(&id)?;
        Some((id, text.as_str()))
    }
}

impl Default for ScenePresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationSink for ScenePresenter {
    fn has_indicator(&self, step: StepId) -> bool {
        self.indicators.contains_key(&step)
    }

    fn place_indicator(&mut self, step: StepId, anchor: Anchor) {
        if let Some(vis) = self.indicators.get_mut(&step) {
            vis.anchor = anchor;
        }
    }

    fn set_indicator_phase(&mut self, step: StepId, phase: IndicatorPhase) {
        if let Some(vis) = self.indicators.get_mut(&step) {
            vis.phase = phase;
        }
    }

    fn install_details(&mut self, step: StepId, details: &str) {
        self.details.insert(step, details.to_string());
    }

    fn show_details(&mut self, step: StepId) {
        if self.details.contains_key(&step) {
            self.selected = Some(step);
        }
    }

    fn spawn_marker(&mut self, kind: MarkerKind, at: PixelPoint) -> MarkerId {
        let id = MarkerId::new();
        self.markers.insert(
            id,
            MarkerVisual { kind, origin: at, spawned: self.clock, current_move: None },
        );
        id
    }

    fn begin_marker_move(&mut self, marker: MarkerId, to: PixelPoint, travel: Duration) {
        if let Some(vis) = self.markers.get_mut(&marker) {
            vis.current_move = Some(MarkerMove {
                from: vis.origin,
                to,
                started: self.clock,
                travel,
            });
        }
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.markers.shift_remove(&marker);
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}
