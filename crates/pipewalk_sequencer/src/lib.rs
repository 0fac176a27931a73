// SPDX-License-Identifier: MIT OR Apache-2.0
//! Step sequencer for Pipewalk.
//!
//! This crate walks a pipeline diagram step by step:
//! - Automatic timed advancement or manual stepping
//! - Cancellable delay timers (no fire-and-forget continuations)
//! - Transient marker animation along path segments
//! - Pulse effects on configured steps
//! - Debounced indicator repositioning on resize
//!
//! ## Architecture
//!
//! The sequencer owns its run state and a [`timer::TimerQueue`] of pending
//! continuations; every observable effect goes through the
//! [`sink::PresentationSink`] trait, so the whole state machine runs and
//! tests without a display surface. The host drives time by calling
//! [`StepSequencer::tick`] from its frame loop.
//!
//! [`StepSequencer::tick`]: sequencer::StepSequencer::tick

pub mod sequencer;
pub mod sink;
pub mod timer;

pub use sequencer::{RunState, SequencerConfig, StepSequencer};
pub use sink::{IndicatorPhase, MarkerId, PresentationSink};
pub use timer::{TimerId, TimerQueue};
