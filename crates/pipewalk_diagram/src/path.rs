// SPDX-License-Identifier: MIT OR Apache-2.0
//! Path segments traversed by transient markers.

use crate::geometry::Anchor;
use serde::{Deserialize, Serialize};

/// Visual class of a transient marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerKind {
    /// Plain moving dot
    #[default]
    Dot,
    /// Code artifact, drawn as a small package
    Artifact,
    /// Stationary pulse ring, used by step effects
    Pulse,
}

impl MarkerKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dot => "Dot",
            Self::Artifact => "Artifact",
            Self::Pulse => "Pulse",
        }
    }
}

/// The fixed start/end pair a marker traverses when entering a step.
///
/// Segment at index `i` animates the transition into step `i + 1`; the
/// segment table may be shorter than the step table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    /// Normalized start position
    pub from: Anchor,
    /// Normalized end position
    pub to: Anchor,
    /// Marker style for this segment
    #[serde(default)]
    pub marker: MarkerKind,
}

impl PathSegment {
    /// Create a segment animated by a plain dot
    pub fn new(from: Anchor, to: Anchor) -> Self {
        Self { from, to, marker: MarkerKind::Dot }
    }

    /// Override the marker style
    pub fn with_marker(mut self, marker: MarkerKind) -> Self {
        self.marker = marker;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_default_marker() {
        let segment = PathSegment::new(Anchor::new(35.0, 15.0), Anchor::new(35.0, 30.0));
        assert_eq!(segment.marker, MarkerKind::Dot);
    }

    #[test]
    fn test_segment_marker_override() {
        let segment = PathSegment::new(Anchor::new(0.0, 0.0), Anchor::new(10.0, 10.0))
            .with_marker(MarkerKind::Artifact);
        assert_eq!(segment.marker, MarkerKind::Artifact);
    }
}
