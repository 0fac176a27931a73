// SPDX-License-Identifier: MIT OR Apache-2.0
//! Diagram palette and egui styling.

use egui::{Color32, Rounding, Visuals};
use pipewalk_sequencer::IndicatorPhase;

/// Colors used on the diagram canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramTheme {
    /// Canvas background
    pub canvas_bg: Color32,
    /// Path segment guide lines
    pub lane: Color32,
    /// In-progress indicator fill
    pub in_progress: Color32,
    /// Completed indicator fill
    pub success: Color32,
    /// Indicator number badge text
    pub indicator_text: Color32,
    /// Plain moving dot
    pub dot: Color32,
    /// Code artifact marker
    pub artifact: Color32,
    /// Pulse ring
    pub pulse: Color32,
}

impl Default for DiagramTheme {
    fn default() -> Self {
        Self {
            canvas_bg: Color32::from_gray(24),
            lane: Color32::from_gray(60),
            in_progress: Color32::from_rgb(255, 153, 0),
            success: Color32::from_rgb(30, 142, 62),
            indicator_text: Color32::from_gray(240),
            dot: Color32::from_rgb(100, 180, 255),
            artifact: Color32::from_rgb(255, 200, 100),
            pulse: Color32::from_rgb(100, 220, 140),
        }
    }
}

impl DiagramTheme {
    /// Indicator fill for a phase. Hidden indicators are not drawn at all;
    /// the transparent fill is a fallback.
    pub fn indicator_fill(&self, phase: IndicatorPhase) -> Color32 {
        match phase {
            IndicatorPhase::Hidden => Color32::TRANSPARENT,
            IndicatorPhase::Active => self.in_progress,
            IndicatorPhase::Completed => self.success,
        }
    }

    /// Apply the matching chrome styling to an egui context
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();
        visuals.panel_fill = Color32::from_gray(32);
        visuals.window_rounding = Rounding::same(6.0);
        visuals.widgets.noninteractive.rounding = Rounding::same(4.0);
        visuals.widgets.inactive.rounding = Rounding::same(4.0);
        visuals.widgets.hovered.rounding = Rounding::same(4.0);
        visuals.widgets.active.rounding = Rounding::same(4.0);
        visuals.selection.bg_fill = self.in_progress.linear_multiply(0.4);
        ctx.set_visuals(visuals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_fill_mapping() {
        let theme = DiagramTheme::default();
        assert_eq!(theme.indicator_fill(IndicatorPhase::Active), theme.in_progress);
        assert_eq!(theme.indicator_fill(IndicatorPhase::Completed), theme.success);
        assert_eq!(theme.indicator_fill(IndicatorPhase::Hidden), Color32::TRANSPARENT);
    }
}
