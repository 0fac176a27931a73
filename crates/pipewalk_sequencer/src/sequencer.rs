// SPDX-License-Identifier: MIT OR Apache-2.0
//! The step sequencer state machine.
//!
//! One run walks `idle -> running(1) -> ... -> running(N) -> finished`.
//! `reset` returns any state to idle, `next` forces a single forward
//! transition (or wraps to idle from the last step), and `start` is only
//! honored from idle. All delayed work goes through a cancellable
//! [`TimerQueue`], so superseded continuations never fire.

use crate::sink::{IndicatorPhase, PresentationSink};
use crate::timer::{TimerId, TimerQueue};
use pipewalk_diagram::{Anchor, Diagram, MarkerKind, PixelPoint, StepId};
use std::collections::BTreeSet;
use std::time::Duration;

/// Timing knobs for a sequencer. Defaults match the reference behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerConfig {
    /// Time each step stays current during an automatic run
    pub step_hold: Duration,
    /// Delay between spawning a marker and starting its move
    pub marker_lead_in: Duration,
    /// Travel time of a marker along its segment
    pub marker_travel: Duration,
    /// Lifetime of a pulse marker
    pub pulse_lifetime: Duration,
    /// Quiet period before indicators are repositioned after a resize
    pub reposition_debounce: Duration,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            step_hold: Duration::from_millis(3000),
            marker_lead_in: Duration::from_millis(100),
            marker_travel: Duration::from_millis(1500),
            pulse_lifetime: Duration::from_millis(2000),
            reposition_debounce: Duration::from_millis(200),
        }
    }
}

/// Run state of a sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunState {
    /// Current step index: 0 = idle, `1..=N` = on that step
    pub current: u32,
    /// Whether the sequencer self-schedules the next step
    pub auto_advance: bool,
    /// Whether a full automatic run is executing
    pub in_flight: bool,
}

/// Delayed continuation payloads
enum Continuation {
    /// Advance the run by one step, or finish it
    AutoAdvance,
    /// Start a spawned marker moving
    BeginMarkerMove {
        marker: crate::sink::MarkerId,
        to: PixelPoint,
    },
    /// Remove a marker whose lifetime elapsed
    RemoveMarker(crate::sink::MarkerId),
    /// Spawn a pulse marker at a configured position
    SpawnPulse { position: Anchor },
    /// Re-place every indicator after a resize settled
    Reposition,
}

/// Walks a [`Diagram`] forward, driving a [`PresentationSink`].
pub struct StepSequencer {
    diagram: Diagram,
    config: SequencerConfig,
    state: RunState,
    timers: TimerQueue<Continuation>,
    /// Pending automatic-advance handle, cancelled by `next` and `reset`
    auto_timer: Option<TimerId>,
    /// Pending debounced reposition handle
    reposition_timer: Option<TimerId>,
    /// Steps whose indicator was missing at initialization
    missing: BTreeSet<StepId>,
}

impl StepSequencer {
    /// Create a sequencer over a diagram
    pub fn new(diagram: Diagram, config: SequencerConfig) -> Self {
        Self {
            diagram,
            config,
            state: RunState::default(),
            timers: TimerQueue::new(),
            auto_timer: None,
            reposition_timer: None,
            missing: BTreeSet::new(),
        }
    }

    /// The diagram being walked
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Number of steps in the diagram
    pub fn step_count(&self) -> usize {
        self.diagram.step_count()
    }

    /// Current step index (0 = idle)
    pub fn current_step(&self) -> u32 {
        self.state.current
    }

    /// Whether an automatic run is executing
    pub fn is_in_flight(&self) -> bool {
        self.state.in_flight
    }

    /// Whether automatic advancement is enabled
    pub fn auto_advance(&self) -> bool {
        self.state.auto_advance
    }

    /// Bind each step to its indicator and install detail payloads.
    ///
    /// A step whose indicator is missing from the sink is logged and
    /// skipped for the rest of the process; remaining steps still work.
    pub fn initialize(&mut self, sink: &mut dyn PresentationSink) {
        for step in self.diagram.steps() {
            if !sink.has_indicator(step.id) {
                tracing::warn!(step = %step.id, "indicator missing, skipping step");
                self.missing.insert(step.id);
                continue;
            }
            sink.place_indicator(step.id, step.position);
            sink.set_indicator_phase(step.id, IndicatorPhase::Hidden);
        }

        for step in self.diagram.steps() {
            sink.install_details(step.id, &step.details);
        }

        sink.show_details(StepId::new(1));
        tracing::debug!(steps = self.diagram.step_count(), "sequencer initialized");
    }

    /// Return to the initial state: idle, every indicator hidden, every
    /// transient marker removed, step 1's details showing. Idempotent, and
    /// cancels all pending continuations.
    pub fn reset(&mut self, sink: &mut dyn PresentationSink) {
        self.timers.clear();
        self.auto_timer = None;
        self.reposition_timer = None;
        self.state = RunState::default();

        for step in self.diagram.steps() {
            if self.missing.contains(&step.id) {
                continue;
            }
            sink.set_indicator_phase(step.id, IndicatorPhase::Hidden);
        }

        sink.clear_markers();
        sink.show_details(StepId::new(1));
    }

    /// Begin an automatic run from step 1. No-op while a run is in flight.
    pub fn start(&mut self, sink: &mut dyn PresentationSink) {
        if self.state.in_flight {
            return;
        }

        self.reset(sink);
        self.state.auto_advance = true;
        self.state.in_flight = true;
        tracing::debug!("walkthrough started");
        self.advance_to(1, sink);
    }

    /// Advance a single step manually, disabling automatic advancement.
    /// From the last step this wraps around and behaves as [`Self::reset`].
    /// Any pending automatic continuation is cancelled first.
    pub fn next(&mut self, sink: &mut dyn PresentationSink) {
        if let Some(id) = self.auto_timer.take() {
            self.timers.cancel(id);
        }

        if (self.state.current as usize) < self.diagram.step_count() {
            self.state.auto_advance = false;
            self.advance_to(self.state.current + 1, sink);
        } else {
            self.reset(sink);
        }
    }

    /// Show a step's details, as when its indicator is clicked
    pub fn select_step(&mut self, step: StepId, sink: &mut dyn PresentationSink) {
        if self.diagram.step(step).is_some() {
            sink.show_details(step);
        }
    }

    /// Make `index` the current step: everything below it completed,
    /// everything above it hidden. Launches the segment marker and pulse
    /// effects for the entered step, and schedules the next advance when
    /// auto-advance is on. An index past the step count ends the run.
    pub fn advance_to(&mut self, index: u32, sink: &mut dyn PresentationSink) {
        if index == 0 {
            return;
        }
        if index as usize > self.diagram.step_count() {
            self.state.in_flight = false;
            return;
        }

        self.state.current = index;
        tracing::debug!(step = index, "advancing");

        for step in self.diagram.steps() {
            if self.missing.contains(&step.id) {
                continue;
            }
            let phase = match step.id.get().cmp(&index) {
                std::cmp::Ordering::Less => IndicatorPhase::Completed,
                std::cmp::Ordering::Equal => IndicatorPhase::Active,
                std::cmp::Ordering::Greater => IndicatorPhase::Hidden,
            };
            sink.set_indicator_phase(step.id, phase);
        }

        sink.show_details(StepId::new(index));
        self.animate_marker(index as usize - 1, sink);

        let pulses: Vec<_> = self
            .diagram
            .pulses_for(StepId::new(index))
            .map(|p| (p.delay, p.position))
            .collect();
        for (delay, position) in pulses {
            self.timers.schedule(delay, Continuation::SpawnPulse { position });
        }

        if self.state.auto_advance {
            let id = self.timers.schedule(self.config.step_hold, Continuation::AutoAdvance);
            self.auto_timer = Some(id);
        }
    }

    /// Launch a transient marker along a path segment. No-op when the
    /// segment index is out of range.
    pub fn animate_marker(&mut self, segment_index: usize, sink: &mut dyn PresentationSink) {
        let Some(segment) = self.diagram.segment(segment_index) else {
            return;
        };

        let viewport = sink.viewport();
        let start = segment.from.to_pixels(viewport);
        let end = segment.to.to_pixels(viewport);
        let kind = segment.marker;

        let marker = sink.spawn_marker(kind, start);
        self.timers.schedule(
            self.config.marker_lead_in,
            Continuation::BeginMarkerMove { marker, to: end },
        );
        self.timers.schedule(
            self.config.marker_lead_in + self.config.marker_travel,
            Continuation::RemoveMarker(marker),
        );
    }

    /// Note that the reference surface resized. Repositioning is debounced:
    /// only the last notification within the quiet period takes effect.
    /// Safe in any run state.
    pub fn notify_resized(&mut self) {
        if let Some(id) = self.reposition_timer.take() {
            self.timers.cancel(id);
        }
        let id = self
            .timers
            .schedule(self.config.reposition_debounce, Continuation::Reposition);
        self.reposition_timer = Some(id);
    }

    /// Advance time by `dt` and run every continuation that came due
    pub fn tick(&mut self, dt: Duration, sink: &mut dyn PresentationSink) {
        for continuation in self.timers.advance(dt) {
            self.dispatch(continuation, sink);
        }
    }

    fn dispatch(&mut self, continuation: Continuation, sink: &mut dyn PresentationSink) {
        match continuation {
            Continuation::AutoAdvance => {
                self.auto_timer = None;
                if (self.state.current as usize) < self.diagram.step_count() {
                    self.advance_to(self.state.current + 1, sink);
                } else {
                    self.finish_run(sink);
                }
            }
            Continuation::BeginMarkerMove { marker, to } => {
                sink.begin_marker_move(marker, to, self.config.marker_travel);
            }
            Continuation::RemoveMarker(marker) => {
                sink.remove_marker(marker);
            }
            Continuation::SpawnPulse { position } => {
                let at = position.to_pixels(sink.viewport());
                let marker = sink.spawn_marker(MarkerKind::Pulse, at);
                self.timers
                    .schedule(self.config.pulse_lifetime, Continuation::RemoveMarker(marker));
            }
            Continuation::Reposition => {
                self.reposition_timer = None;
                for step in self.diagram.steps() {
                    if self.missing.contains(&step.id) {
                        continue;
                    }
                    sink.place_indicator(step.id, step.position);
                }
            }
        }
    }

    /// Terminal transition of an automatic run: the last step's completed
    /// styling is applied and the in-flight flag clears.
    fn finish_run(&mut self, sink: &mut dyn PresentationSink) {
        self.state.in_flight = false;
        let last = StepId::new(self.state.current);
        if self.diagram.step(last).is_some() && !self.missing.contains(&last) {
            sink.set_indicator_phase(last, IndicatorPhase::Completed);
        }
        tracing::debug!("walkthrough finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MarkerId;
    use pipewalk_diagram::{PathSegment, PulseEffect, Step, Viewport};
    use std::collections::{HashMap, HashSet};

    /// Sink that records every call for assertions
    struct RecordingSink {
        viewport: Viewport,
        present: HashSet<StepId>,
        placements: Vec<(StepId, Anchor)>,
        phases: HashMap<StepId, IndicatorPhase>,
        installed: HashMap<StepId, String>,
        shown: Option<StepId>,
        live_markers: HashMap<MarkerId, (MarkerKind, PixelPoint)>,
        spawned: Vec<(MarkerId, MarkerKind, PixelPoint)>,
        moves: Vec<(MarkerId, PixelPoint, Duration)>,
    }

    impl RecordingSink {
        fn new(step_count: u32) -> Self {
            Self {
                viewport: Viewport::new(1000.0, 500.0),
                present: (1..=step_count).map(StepId::new).collect(),
                placements: Vec::new(),
                phases: HashMap::new(),
                installed: HashMap::new(),
                shown: None,
                live_markers: HashMap::new(),
                spawned: Vec::new(),
                moves: Vec::new(),
            }
        }

        fn phase(&self, id: u32) -> IndicatorPhase {
            self.phases.get(&StepId::new(id)).copied().unwrap_or_default()
        }

        fn active_count(&self) -> usize {
            self.phases.values().filter(|p| **p == IndicatorPhase::Active).count()
        }
    }

    impl PresentationSink for RecordingSink {
        fn has_indicator(&self, step: StepId) -> bool {
            self.present.contains(&step)
        }

        fn place_indicator(&mut self, step: StepId, anchor: Anchor) {
            self.placements.push((step, anchor));
        }

        fn set_indicator_phase(&mut self, step: StepId, phase: IndicatorPhase) {
            self.phases.insert(step, phase);
        }

        fn install_details(&mut self, step: StepId, details: &str) {
            self.installed.insert(step, details.to_string());
        }

        fn show_details(&mut self, step: StepId) {
            self.shown = Some(step);
        }

        fn spawn_marker(&mut self, kind: MarkerKind, at: PixelPoint) -> MarkerId {
            let id = MarkerId::new();
            self.live_markers.insert(id, (kind, at));
            self.spawned.push((id, kind, at));
            id
        }

        fn begin_marker_move(&mut self, marker: MarkerId, to: PixelPoint, travel: Duration) {
            self.moves.push((marker, to, travel));
        }

        fn remove_marker(&mut self, marker: MarkerId) {
            self.live_markers.remove(&marker);
        }

        fn clear_markers(&mut self) {
            self.live_markers.clear();
        }

        fn viewport(&self) -> Viewport {
            self.viewport
        }
    }

    fn step(id: u32) -> Step {
        Step::new(
            id,
            format!("Step {id}"),
            format!("Description {id}"),
            Anchor::new(40.0, id as f32 * 10.0),
            format!("Details {id}"),
        )
    }

    fn diagram(steps: u32, segments: u32) -> Diagram {
        let segs = (0..segments)
            .map(|i| {
                PathSegment::new(
                    Anchor::new(50.0, i as f32 * 10.0),
                    Anchor::new(50.0, i as f32 * 10.0 + 10.0),
                )
            })
            .collect();
        Diagram::new("test", (1..=steps).map(step).collect(), segs, vec![]).unwrap()
    }

    fn sequencer(steps: u32, segments: u32) -> (StepSequencer, RecordingSink) {
        let mut seq = StepSequencer::new(diagram(steps, segments), SequencerConfig::default());
        let mut sink = RecordingSink::new(steps);
        seq.initialize(&mut sink);
        (seq, sink)
    }

    #[test]
    fn test_initialize_places_hides_and_shows_first_details() {
        let (_, sink) = sequencer(5, 5);
        assert_eq!(sink.placements.len(), 5);
        for id in 1..=5 {
            assert_eq!(sink.phase(id), IndicatorPhase::Hidden);
            assert_eq!(sink.installed[&StepId::new(id)], format!("Details {id}"));
        }
        assert_eq!(sink.shown, Some(StepId::new(1)));
    }

    #[test]
    fn test_initialize_skips_missing_indicator() {
        let mut seq = StepSequencer::new(diagram(3, 3), SequencerConfig::default());
        let mut sink = RecordingSink::new(3);
        sink.present.remove(&StepId::new(2));
        seq.initialize(&mut sink);

        assert_eq!(sink.placements.len(), 2);
        // Details are still installed for the skipped step
        assert!(sink.installed.contains_key(&StepId::new(2)));

        seq.advance_to(3, &mut sink);
        assert_eq!(sink.phase(1), IndicatorPhase::Completed);
        // Skipped step is never styled
        assert!(!sink.phases.contains_key(&StepId::new(2)));
        assert_eq!(sink.phase(3), IndicatorPhase::Active);
    }

    #[test]
    fn test_advance_partitions_phases() {
        let (mut seq, mut sink) = sequencer(5, 5);
        seq.advance_to(3, &mut sink);

        assert_eq!(sink.phase(1), IndicatorPhase::Completed);
        assert_eq!(sink.phase(2), IndicatorPhase::Completed);
        assert_eq!(sink.phase(3), IndicatorPhase::Active);
        assert_eq!(sink.phase(4), IndicatorPhase::Hidden);
        assert_eq!(sink.phase(5), IndicatorPhase::Hidden);
        assert_eq!(sink.active_count(), 1);
        assert_eq!(sink.shown, Some(StepId::new(3)));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let (mut seq, mut sink) = sequencer(5, 5);
        seq.start(&mut sink);
        seq.tick(Duration::from_millis(3000), &mut sink);
        assert_eq!(seq.current_step(), 2);

        seq.reset(&mut sink);
        assert_eq!(seq.current_step(), 0);
        assert!(!seq.is_in_flight());
        assert!(!seq.auto_advance());
        for id in 1..=5 {
            assert_eq!(sink.phase(id), IndicatorPhase::Hidden);
        }
        assert!(sink.live_markers.is_empty());
        assert_eq!(sink.shown, Some(StepId::new(1)));

        // Idempotent, and the cancelled run never resumes
        seq.reset(&mut sink);
        seq.tick(Duration::from_secs(60), &mut sink);
        assert_eq!(seq.current_step(), 0);
        assert!(sink.live_markers.is_empty());
    }

    #[test]
    fn test_start_while_in_flight_is_noop() {
        let (mut seq, mut sink) = sequencer(5, 5);
        seq.start(&mut sink);
        seq.tick(Duration::from_millis(3000), &mut sink);
        let state_before = (seq.current_step(), seq.auto_advance(), seq.is_in_flight());

        seq.start(&mut sink);
        assert_eq!(
            (seq.current_step(), seq.auto_advance(), seq.is_in_flight()),
            state_before
        );
    }

    #[test]
    fn test_next_cancels_pending_auto_advance() {
        let (mut seq, mut sink) = sequencer(5, 5);
        seq.start(&mut sink);
        assert_eq!(seq.current_step(), 1);

        seq.next(&mut sink);
        assert_eq!(seq.current_step(), 2);
        assert!(!seq.auto_advance());

        // The continuation scheduled by the automatic run must not fire
        seq.tick(Duration::from_secs(10), &mut sink);
        assert_eq!(seq.current_step(), 2);
    }

    #[test]
    fn test_next_from_idle_enters_step_one() {
        let (mut seq, mut sink) = sequencer(3, 3);
        seq.next(&mut sink);
        assert_eq!(seq.current_step(), 1);
        assert_eq!(sink.phase(1), IndicatorPhase::Active);
    }

    #[test]
    fn test_next_at_last_step_behaves_as_reset() {
        let (mut seq, mut sink) = sequencer(3, 3);
        for _ in 0..3 {
            seq.next(&mut sink);
        }
        assert_eq!(seq.current_step(), 3);

        seq.next(&mut sink);
        assert_eq!(seq.current_step(), 0);
        assert!(!seq.is_in_flight());
        for id in 1..=3 {
            assert_eq!(sink.phase(id), IndicatorPhase::Hidden);
        }
        assert_eq!(sink.shown, Some(StepId::new(1)));
    }

    #[test]
    fn test_marker_lifecycle() {
        let (mut seq, mut sink) = sequencer(3, 3);
        seq.advance_to(1, &mut sink);

        assert_eq!(sink.spawned.len(), 1);
        let (id, kind, at) = sink.spawned[0];
        assert_eq!(kind, MarkerKind::Dot);
        // Segment 0 starts at (left 0%, top 50%) of a 1000x500 viewport
        assert_eq!(at, PixelPoint::new(0.0, 250.0));
        assert!(sink.moves.is_empty());

        // Move begins after the lead-in
        seq.tick(Duration::from_millis(100), &mut sink);
        assert_eq!(sink.moves.len(), 1);
        let (moved, to, travel) = sink.moves[0];
        assert_eq!(moved, id);
        assert_eq!(to, PixelPoint::new(100.0, 250.0));
        assert_eq!(travel, Duration::from_millis(1500));
        assert!(sink.live_markers.contains_key(&id));

        // Removed once the travel completes
        seq.tick(Duration::from_millis(1500), &mut sink);
        assert!(!sink.live_markers.contains_key(&id));
    }

    #[test]
    fn test_marker_out_of_range_is_noop() {
        // 3 steps, only 1 segment: entering steps 2 and 3 spawns nothing
        let (mut seq, mut sink) = sequencer(3, 1);
        seq.advance_to(2, &mut sink);
        seq.advance_to(3, &mut sink);
        assert_eq!(sink.spawned.len(), 0);

        seq.animate_marker(7, &mut sink);
        assert_eq!(sink.spawned.len(), 0);
    }

    #[test]
    fn test_segment_marker_kind_is_honored() {
        let steps = (1..=2).map(step).collect();
        let segs = vec![
            PathSegment::new(Anchor::new(0.0, 0.0), Anchor::new(10.0, 10.0))
                .with_marker(MarkerKind::Artifact),
        ];
        let diagram = Diagram::new("artifact", steps, segs, vec![]).unwrap();
        let mut seq = StepSequencer::new(diagram, SequencerConfig::default());
        let mut sink = RecordingSink::new(2);
        seq.initialize(&mut sink);

        seq.advance_to(1, &mut sink);
        assert_eq!(sink.spawned[0].1, MarkerKind::Artifact);
    }

    #[test]
    fn test_pulse_effect_spawns_and_expires() {
        let steps = (1..=3).map(step).collect();
        let pulses = vec![PulseEffect::new(
            3,
            Duration::from_millis(1500),
            Anchor::new(50.0, 65.0),
        )];
        let diagram = Diagram::new("pulses", steps, vec![], pulses).unwrap();
        let mut seq = StepSequencer::new(diagram, SequencerConfig::default());
        let mut sink = RecordingSink::new(3);
        seq.initialize(&mut sink);

        seq.advance_to(3, &mut sink);
        assert_eq!(sink.spawned.len(), 0);

        seq.tick(Duration::from_millis(1500), &mut sink);
        assert_eq!(sink.spawned.len(), 1);
        let (id, kind, at) = sink.spawned[0];
        assert_eq!(kind, MarkerKind::Pulse);
        assert_eq!(at, PixelPoint::new(650.0, 250.0));

        seq.tick(Duration::from_millis(2000), &mut sink);
        assert!(!sink.live_markers.contains_key(&id));
    }

    #[test]
    fn test_full_automatic_run() {
        let (mut seq, mut sink) = sequencer(6, 6);
        seq.start(&mut sink);
        assert!(seq.is_in_flight());
        assert_eq!(seq.current_step(), 1);

        // 18 seconds at 3 seconds per step, in 100ms frames
        for _ in 0..200 {
            seq.tick(Duration::from_millis(100), &mut sink);
        }

        assert!(!seq.is_in_flight());
        assert_eq!(seq.current_step(), 6);
        for id in 1..=6 {
            assert_eq!(sink.phase(id), IndicatorPhase::Completed);
        }
        assert_eq!(sink.active_count(), 0);
        assert!(sink.live_markers.is_empty());
        // One marker per segment was spawned along the way
        assert_eq!(sink.spawned.len(), 6);
    }

    #[test]
    fn test_resize_repositions_once_after_debounce() {
        let (mut seq, mut sink) = sequencer(4, 0);
        sink.placements.clear();

        seq.notify_resized();
        seq.tick(Duration::from_millis(100), &mut sink);
        seq.notify_resized();
        seq.tick(Duration::from_millis(100), &mut sink);
        // First notification was superseded before its quiet period ended
        assert!(sink.placements.is_empty());

        seq.tick(Duration::from_millis(100), &mut sink);
        assert_eq!(sink.placements.len(), 4);
    }

    #[test]
    fn test_select_step_shows_details() {
        let (mut seq, mut sink) = sequencer(3, 0);
        seq.select_step(StepId::new(2), &mut sink);
        assert_eq!(sink.shown, Some(StepId::new(2)));

        // Unknown steps are ignored
        seq.select_step(StepId::new(9), &mut sink);
        assert_eq!(sink.shown, Some(StepId::new(2)));
    }
}
