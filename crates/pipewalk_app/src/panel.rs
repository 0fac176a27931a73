// SPDX-License-Identifier: MIT OR Apache-2.0
//! Diagram panel: toolbar, canvas, and details view.
//!
//! The panel owns the sequencer and the scene presenter. Each frame it
//! feeds elapsed time to both, forwards button and indicator clicks to the
//! sequencer, and paints whatever the scene holds.

use crate::scene::ScenePresenter;
use crate::theme::DiagramTheme;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};
use pipewalk_diagram::{Anchor, Diagram, MarkerKind, StepId, Viewport};
use pipewalk_sequencer::{IndicatorPhase, SequencerConfig, StepSequencer};
use std::time::Duration;

const INDICATOR_RADIUS: f32 = 14.0;
const ACTIVE_RING_WIDTH: f32 = 2.5;
const DOT_RADIUS: f32 = 6.0;
const ARTIFACT_SIZE: f32 = 13.0;
const PULSE_BASE_RADIUS: f32 = 12.0;
const PULSE_GROWTH_PER_SEC: f32 = 22.0;

/// Interactive view over one pipeline diagram
pub struct DiagramPanel {
    sequencer: StepSequencer,
    scene: ScenePresenter,
    theme: DiagramTheme,
}

impl DiagramPanel {
    /// Create a panel and bind the diagram's indicators
    pub fn new(diagram: Diagram) -> Self {
        let mut sequencer = StepSequencer::new(diagram, SequencerConfig::default());
        let mut scene = ScenePresenter::new();

        let ids: Vec<StepId> = sequencer.diagram().steps().map(|s| s.id).collect();
        for id in ids {
            scene.register_indicator(id);
        }
        sequencer.initialize(&mut scene);

        Self { sequencer, scene, theme: DiagramTheme::default() }
    }

    /// The theme used by the canvas
    pub fn theme(&self) -> &DiagramTheme {
        &self.theme
    }

    /// Run one frame: advance time, then lay out toolbar, canvas, details
    pub fn update(&mut self, ctx: &egui::Context) {
        let dt = Duration::from_secs_f32(ctx.input(|i| i.stable_dt).max(0.0));
        self.scene.advance_clock(dt);
        self.sequencer.tick(dt, &mut self.scene);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::TopBottomPanel::bottom("details")
            .resizable(true)
            .default_height(150.0)
            .show(ctx, |ui| self.details(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ui));
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(&self.sequencer.diagram().name);
            ui.separator();

            if ui.button("\u{25b6} Start Walkthrough").clicked() {
                self.sequencer.start(&mut self.scene);
            }
            if ui.button("Next Step").clicked() {
                self.sequencer.next(&mut self.scene);
            }
            if ui.button("Reset").clicked() {
                self.sequencer.reset(&mut self.scene);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(self.status_text());
            });
        });
    }

    fn status_text(&self) -> String {
        let current = self.sequencer.current_step();
        let count = self.sequencer.step_count();
        if current == 0 {
            "idle".to_string()
        } else {
            format!("step {current} of {count}")
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let viewport = Viewport::new(rect.width(), rect.height());
        if self.scene.current_viewport() != viewport {
            self.scene.set_viewport(viewport);
            self.sequencer.notify_resized();
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 8.0, self.theme.canvas_bg);

        self.paint_segments(&painter, rect, viewport);
        let clicked = self.paint_indicators(ui, &painter, rect, viewport);
        self.paint_markers(&painter, rect);

        if let Some(step) = clicked {
            self.sequencer.select_step(step, &mut self.scene);
        }
    }

    fn paint_segments(&self, painter: &egui::Painter, rect: Rect, viewport: Viewport) {
        let stroke = Stroke::new(1.0, self.theme.lane);
        for index in 0..self.sequencer.diagram().segment_count() {
            let Some(segment) = self.sequencer.diagram().segment(index) else {
                continue;
            };
            let from = to_canvas(segment.from, viewport, rect);
            let to = to_canvas(segment.to, viewport, rect);
            painter.line_segment([from, to], stroke);
        }
    }

    /// Paint visible indicators and return the step whose badge was clicked
    fn paint_indicators(
        &self,
        ui: &mut egui::Ui,
        painter: &egui::Painter,
        rect: Rect,
        viewport: Viewport,
    ) -> Option<StepId> {
        let indicators: Vec<(StepId, Anchor, IndicatorPhase)> = self
            .scene
            .indicators()
            .map(|(id, vis)| (id, vis.anchor, vis.phase))
            .collect();

        let mut clicked = None;
        for (id, anchor, phase) in indicators {
            if phase == IndicatorPhase::Hidden {
                continue;
            }

            let center = to_canvas(anchor, viewport, rect);
            painter.circle_filled(center, INDICATOR_RADIUS, self.theme.indicator_fill(phase));
            painter.text(
                center,
                Align2::CENTER_CENTER,
                id.to_string(),
                FontId::proportional(12.0),
                self.theme.indicator_text,
            );

            if phase == IndicatorPhase::Active {
                painter.circle_stroke(
                    center,
                    INDICATOR_RADIUS + 4.0,
                    Stroke::new(ACTIVE_RING_WIDTH, self.theme.in_progress),
                );
                if let Some(step) = self.sequencer.diagram().step(id) {
                    painter.text(
                        Pos2::new(center.x, center.y + INDICATOR_RADIUS + 14.0),
                        Align2::CENTER_CENTER,
                        &step.name,
                        FontId::proportional(11.0),
                        self.theme.indicator_text,
                    );
                }
            }

            let hit = Rect::from_center_size(center, Vec2::splat(INDICATOR_RADIUS * 2.0));
            let response = ui.interact(hit, ui.id().with(("indicator", id.get())), Sense::click());
            if response.clicked() {
                clicked = Some(id);
            }
        }

        clicked
    }

    fn paint_markers(&self, painter: &egui::Painter, rect: Rect) {
        let clock = self.scene.clock();
        for marker in self.scene.markers() {
            let position = marker.position_at(clock);
            let at = Pos2::new(rect.min.x + position.x, rect.min.y + position.y);

            match marker.kind {
                MarkerKind::Dot => {
                    painter.circle_filled(at, DOT_RADIUS, self.theme.dot);
                }
                MarkerKind::Artifact => {
                    let body = Rect::from_center_size(at, Vec2::splat(ARTIFACT_SIZE));
                    painter.rect_filled(body, 3.0, self.theme.artifact);
                    painter.rect_stroke(body, 3.0, Stroke::new(1.0, Color32::from_gray(40)));
                }
                MarkerKind::Pulse => {
                    let age = marker.age(clock).as_secs_f32();
                    let radius = PULSE_BASE_RADIUS + age * PULSE_GROWTH_PER_SEC;
                    let fade = (1.0 - age / 2.0).clamp(0.0, 1.0);
                    painter.circle_stroke(
                        at,
                        radius,
                        Stroke::new(2.0, self.theme.pulse.gamma_multiply(fade)),
                    );
                }
            }
        }
    }

    fn details(&mut self, ui: &mut egui::Ui) {
        let Some((id, text)) = self.scene.selected_details() else {
            ui.label("No step selected");
            return;
        };

        let (name, description) = match self.sequencer.diagram().step(id) {
            Some(step) => (step.name.clone(), step.description.clone()),
            None => (format!("Step {id}"), String::new()),
        };
        let text = text.to_string();

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading(format!("{id}. {name}"));
            if !description.is_empty() {
                ui.label(egui::RichText::new(description).italics());
            }
            ui.separator();
            ui.label(text);
        });
    }
}

/// Convert a normalized anchor to canvas coordinates
fn to_canvas(anchor: Anchor, viewport: Viewport, rect: Rect) -> Pos2 {
    let px = anchor.to_pixels(viewport);
    Pos2::new(rect.min.x + px.x, rect.min.y + px.y)
}
