//! Interactive line-growth viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the drawing state (canvas,
//! growth engine, random generator, configuration) and implements
//! [`eframe::App`] to animate the growth and control it through an egui UI.

use eframe::App;
use image::RgbImage;
use log::{info, warn};
use rand::{SeedableRng, rngs::StdRng};
use sprout_core::{
    Config, GrowthEngine, Step,
    color::BaseColor,
    growth::{EngineState, HaltReason},
};
use std::path::Path;

/// Builds the deviation generator for a run.
///
/// ### Parameters
/// - `seed` - Fixed seed, or `None` to draw a fresh one from entropy.
///
/// ### Returns
/// The generator and the seed it was built from, so the run can be replayed.
pub fn seeded_rng(seed: Option<u64>) -> (StdRng, u64) {
    let seed = seed.unwrap_or_else(rand::random);
    (StdRng::seed_from_u64(seed), seed)
}

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The growth core: [`GrowthEngine`] drawing onto an [`RgbImage`].
/// - UI configuration (pan/zoom, animation speed, output path).
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true`, call [`Viewer::step_batch`].
/// 3. Upload the canvas to the GPU texture if it changed and paint it.
///
/// ### Fields
/// - `cfg` - Configuration edited in the side panel; applied on reset.
/// - `canvas` - The raster the engine draws on.
/// - `engine` - Frontier and progress state of the current drawing.
/// - `rng` - Deviation generator, seeded from `seed`.
/// - `seed` - Seed of the current drawing, shown so it can be replayed.
///
/// - `texture` - GPU copy of `canvas`, created lazily on the first frame.
/// - `canvas_dirty` - Whether `canvas` changed since the last upload.
///
/// - `running` - Whether growth is currently auto-advancing.
/// - `steps_per_frame` - Engine steps taken per frame while running.
/// - `zoom` - Zoom factor for canvas-to-screen coordinate mapping.
/// - `pan` - Screen-space pan offset in pixels.
///
/// - `last_step` - Outcome of the most recent engine step.
/// - `save_path` - Where "Save PNG" writes to.
/// - `message` - Last save result shown in the status bar.
pub struct Viewer {
    cfg: Config,
    canvas: RgbImage,
    engine: GrowthEngine,
    rng: StdRng,
    seed: u64,

    texture: Option<egui::TextureHandle>,
    canvas_dirty: bool,

    running: bool,
    steps_per_frame: usize,
    zoom: f32,
    pan: egui::Vec2,

    last_step: Option<Step>,
    save_path: String,
    message: String,
}

impl Viewer {
    /// Creates a viewer with a blank canvas and an engine seeded from `cfg`.
    ///
    /// The growth does not start until "Run" or "Step" is pressed.
    pub fn new(cfg: Config) -> Self {
        let (rng, seed) = seeded_rng(cfg.rng_seed);
        let canvas = cfg.blank_canvas();
        let engine = GrowthEngine::from_config(&cfg);

        Self {
            cfg,
            canvas,
            engine,
            rng,
            seed,
            texture: None,
            canvas_dirty: true,
            running: false,
            steps_per_frame: 10,
            zoom: 0.75,
            pan: egui::vec2(0.0, 0.0),
            last_step: None,
            save_path: "sprout.png".to_string(),
            message: String::new(),
        }
    }

    /// Restarts the drawing with the current seed and configuration.
    ///
    /// This keeps the camera settings, but:
    /// - Replaces the canvas with a blank one of the configured size.
    /// - Rebuilds the engine from `cfg` (so edited parameters take effect).
    /// - Re-seeds the generator with `seed`, replaying the same drawing.
    /// - Clears `last_step` and stops auto-running.
    fn reset(&mut self) {
        self.canvas = self.cfg.blank_canvas();
        self.engine = GrowthEngine::from_config(&self.cfg);
        self.rng = StdRng::seed_from_u64(self.seed);
        self.canvas_dirty = true;
        self.last_step = None;
        self.running = false;
        info!("reset drawing with seed {}", self.seed);
    }

    /// Picks a new random seed and resets.
    fn reseed(&mut self) {
        self.seed = rand::random();
        self.reset();
    }

    /// Advances the engine by a single candidate.
    ///
    /// Stops auto-running once the engine halts.
    fn step_once(&mut self) -> Step {
        let step = self.engine.step(&mut self.canvas, &mut self.rng);
        match step {
            Step::Accepted { .. } => self.canvas_dirty = true,
            Step::Halted(_) => self.running = false,
            Step::Rejected(_) | Step::Pruned(_) => {}
        }
        self.last_step = Some(step);
        step
    }

    /// Advances the engine by up to `n` candidates, stopping early on halt.
    fn step_batch(&mut self, n: usize) {
        for _ in 0..n {
            if let Step::Halted(_) = self.step_once() {
                break;
            }
        }
    }

    /// Writes the canvas as it is now to `path`.
    fn save_png(&mut self, path: &Path) -> Result<(), String> {
        self.canvas
            .save(path)
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
        info!("saved {} segments to {}", self.engine.progress(), path.display());
        Ok(())
    }

    /// Size of the canvas in pixels as an egui vector.
    fn canvas_size(&self) -> egui::Vec2 {
        egui::vec2(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    /// Converts a canvas pixel position to screen-space.
    ///
    /// The canvas is centered inside `rect`, scaled by `zoom` and offset by
    /// `pan`. Both spaces have y pointing down.
    ///
    /// ### Parameters
    /// - `p` - Position in canvas pixels.
    /// - `rect` - Screen-space rectangle representing the drawing area.
    ///
    /// ### Returns
    /// The corresponding egui position in screen-space.
    fn canvas_to_screen(&self, p: glam::Vec2, rect: egui::Rect) -> egui::Pos2 {
        let half = self.canvas_size() * 0.5;
        let center = rect.center();
        egui::pos2(
            center.x + (p.x - half.x) * self.zoom + self.pan.x,
            center.y + (p.y - half.y) * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to canvas pixels.
    ///
    /// This is the inverse of [`Viewer::canvas_to_screen`] (up to floating
    /// point rounding).
    fn screen_to_canvas(&self, p: egui::Pos2, rect: egui::Rect) -> glam::Vec2 {
        let half = self.canvas_size() * 0.5;
        let center = rect.center();
        glam::Vec2::new(
            (p.x - center.x - self.pan.x) / self.zoom + half.x,
            (p.y - center.y - self.pan.y) / self.zoom + half.y,
        )
    }

    /// Uploads the canvas to the GPU texture if it changed.
    fn sync_texture(&mut self, ctx: &egui::Context) {
        if !self.canvas_dirty && self.texture.is_some() {
            return;
        }
        let size = [self.canvas.width() as usize, self.canvas.height() as usize];
        let image = egui::ColorImage::from_rgb(size, self.canvas.as_raw());
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("canvas", image, egui::TextureOptions::NEAREST))
            }
        }
        self.canvas_dirty = false;
    }

    /// Helper to draw a labeled `u32` [`egui::DragValue`].
    fn labeled_drag_u32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut u32,
        range: std::ops::RangeInclusive<u32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, saving, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let halted = self.engine.state() == EngineState::Halted;
                if ui
                    .add_enabled(
                        !halted,
                        egui::Button::new(if self.running { "⏸ Pause" } else { "▶ Run" }),
                    )
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.steps_per_frame)
                        .prefix("steps/frame = ")
                        .range(1..=5000)
                        .speed(1.0),
                );

                if ui.add_enabled(!halted, egui::Button::new("Step")).clicked() {
                    self.step_once();
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                if ui.button("Reseed").clicked() {
                    self.reseed();
                }

                ui.separator();
                ui.text_edit_singleline(&mut self.save_path);
                if ui.button("Save PNG").clicked() {
                    let path = self.save_path.clone();
                    self.message = match self.save_png(Path::new(&path)) {
                        Ok(()) => format!("saved {path}"),
                        Err(err) => {
                            warn!("{err}");
                            err
                        }
                    };
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (progress, frontier, counters, seed).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let report = self.engine.report();
                ui.label(format!("seed = {}", self.seed));
                ui.separator();
                ui.label(format!(
                    "segments = {} / {}",
                    report.accepted,
                    self.engine.params().max_segments
                ));
                ui.label(format!("frontier = {}", self.engine.frontier_len()));
                ui.label(format!("rejected = {}", report.rejected));
                ui.label(format!("pruned = {}", report.pruned));
                ui.separator();
                ui.label(match report.halt {
                    None => "running".to_string(),
                    Some(HaltReason::BudgetExhausted) => "halted: budget reached".to_string(),
                    Some(HaltReason::FrontierExhausted) => "halted: frontier empty".to_string(),
                });
                if !self.message.is_empty() {
                    ui.separator();
                    ui.label(&self.message);
                }
            });
        });
    }

    /// Builds the right-hand configuration panel.
    ///
    /// Edits only take effect on the next reset.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Growth");
                Self::labeled_drag_u32(
                    ui,
                    "max_segments:",
                    &mut self.cfg.max_segments,
                    1..=100_000,
                    10.0,
                );
                Self::labeled_drag_u32(
                    ui,
                    "angle_deviation:",
                    &mut self.cfg.angle_deviation_degrees,
                    0..=180,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "segment_length:",
                    &mut self.cfg.segment_length,
                    1.0..=500.0,
                    0.5,
                );
                Self::labeled_drag_u32(ui, "line_width:", &mut self.cfg.line_width, 1..=15, 0.1);

                ui.separator();
                ui.label("Color");
                let mut rgb = self.cfg.base_color.channels().unwrap_or([255; 3]);
                ui.horizontal(|ui| {
                    ui.label("base_color:");
                    if ui.color_edit_button_srgb(&mut rgb).changed() {
                        self.cfg.base_color = BaseColor::from_rgb(rgb);
                    }
                });
                ui.horizontal(|ui| {
                    for (name, color) in [
                        ("red", BaseColor::Red),
                        ("green", BaseColor::Green),
                        ("blue", BaseColor::Blue),
                    ] {
                        if ui.selectable_label(self.cfg.base_color == color, name).clicked() {
                            self.cfg.base_color = color;
                        }
                    }
                });

                ui.separator();
                ui.label("Canvas");
                Self::labeled_drag_u32(ui, "width:", &mut self.cfg.canvas_width, 16..=8192, 4.0);
                Self::labeled_drag_u32(ui, "height:", &mut self.cfg.canvas_height, 16..=8192, 4.0);

                ui.separator();
                ui.label("Seed");
                let mut centered = self.cfg.seed_point.is_none();
                if ui.checkbox(&mut centered, "centered").changed() {
                    self.cfg.seed_point = if centered {
                        None
                    } else {
                        Some(self.cfg.seed_point())
                    };
                }
                if let Some(p) = self.cfg.seed_point.as_mut() {
                    Self::labeled_drag_f32(ui, "x:", &mut p.x, 1.0..=8191.0, 1.0);
                    Self::labeled_drag_f32(ui, "y:", &mut p.y, 1.0..=8191.0, 1.0);
                }
                Self::labeled_drag_f32(
                    ui,
                    "angle:",
                    &mut self.cfg.seed_angle_degrees,
                    -360.0..=360.0,
                    1.0,
                );

                ui.separator();
                let valid = self.cfg.validate();
                if let Err(err) = &valid {
                    ui.colored_label(egui::Color32::LIGHT_RED, err.to_string());
                }
                if ui
                    .add_enabled(valid.is_ok(), egui::Button::new("Apply & reset"))
                    .clicked()
                {
                    self.reset();
                }
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config::default();
                }
            });
    }

    /// Builds the central panel where the canvas is shown.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let canvas_before = self.screen_to_canvas(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.1, 10.0);

                let screen_after = self.canvas_to_screen(canvas_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            if self.running {
                self.step_batch(self.steps_per_frame);
                ctx.request_repaint();
            }
            self.sync_texture(ctx);

            let min = self.canvas_to_screen(glam::Vec2::ZERO, rect);
            let max = self.canvas_to_screen(
                glam::Vec2::new(self.canvas_size().x, self.canvas_size().y),
                rect,
            );
            let canvas_rect = egui::Rect::from_min_max(min, max);
            painter.rect_stroke(
                canvas_rect,
                0.0,
                egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
                egui::StrokeKind::Outside,
            );
            if let Some(texture) = &self.texture {
                painter.image(
                    texture.id(),
                    canvas_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }

            // Hover readout in canvas pixels.
            if let Some(hover) = response.hover_pos() {
                let p = self.screen_to_canvas(hover, rect);
                painter.text(
                    rect.left_top() + egui::vec2(8.0, 8.0),
                    egui::Align2::LEFT_TOP,
                    format!("({:.0}, {:.0})", p.x, p.y),
                    egui::FontId::monospace(12.0),
                    egui::Color32::GRAY,
                );
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
