// SPDX-License-Identifier: MIT OR Apache-2.0
//! Diagram data model for Pipewalk.
//!
//! This crate provides the immutable description of a pipeline diagram:
//! - Steps with normalized positions and detail payloads
//! - Path segments traversed by transient markers
//! - Pulse effects attached to specific steps
//! - Percent/pixel geometry conversion
//!
//! ## Architecture
//!
//! A [`Diagram`] is defined once at startup (built-in sample or RON file),
//! validated, and never mutated afterwards. Everything that walks or draws
//! a diagram holds it by reference.

pub mod diagram;
pub mod effect;
pub mod geometry;
pub mod path;
pub mod samples;
pub mod step;

pub use diagram::{Diagram, DiagramError};
pub use effect::PulseEffect;
pub use geometry::{Anchor, PixelPoint, Viewport};
pub use path::{MarkerKind, PathSegment};
pub use step::{Step, StepId};
