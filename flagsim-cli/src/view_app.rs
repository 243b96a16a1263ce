//! Interactive flag viewer
//!
//! Draws the mesh with a simple orthographic projection and drives the core
//! with fixed-size physics ticks accumulated from frame time.

use eframe::egui;
use flagsim_core::{
    build_simulation_context, step_simulation, FlagConfig, FlagError, PhysicsParams, SceneConfig,
    SimulationContext, SpringFamily,
};
use glam::Vec3;
use tracing::{info, warn};

/// Upper bound on physics ticks per frame, so a slow frame cannot snowball
const MAX_TICKS_PER_FRAME: u32 = 32;

/// Flag viewer application
pub struct ViewApp {
    flag_config: FlagConfig,
    scene_config: SceneConfig,
    ctx: SimulationContext,
    /// Copy edited by the sliders, applied to the flag in one go
    params: PhysicsParams,
    resolution: (usize, usize),
    playing: bool,
    speed_multiplier: f32,
    accumulator: f32,
    yaw: f32,
    show_secondary: bool,
    last_error: Option<String>,
}

impl ViewApp {
    pub fn new(flag_config: FlagConfig, scene_config: SceneConfig) -> Result<Self, FlagError> {
        let ctx = build_simulation_context(flag_config.clone(), scene_config.clone(), u32::MAX)?;
        Ok(Self {
            params: flag_config.physics.clone(),
            resolution: (flag_config.width_segments, flag_config.height_segments),
            flag_config,
            scene_config,
            ctx,
            playing: true,
            speed_multiplier: 1.0,
            accumulator: 0.0,
            yaw: 0.5,
            show_secondary: false,
            last_error: None,
        })
    }

    fn reset(&mut self) {
        let config = FlagConfig {
            physics: self.params.clone(),
            width_segments: self.resolution.0,
            height_segments: self.resolution.1,
            ..self.flag_config.clone()
        };
        let scene = self.ctx.scene.config.clone();
        match build_simulation_context(config, scene, u32::MAX) {
            Ok(ctx) => {
                self.ctx = ctx;
                self.accumulator = 0.0;
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    fn sync_params(&mut self) {
        let flag = &mut self.ctx.scene.flag;
        if &self.params != flag.params() {
            match flag.apply_params(&self.params) {
                Ok(()) => {
                    info!(params = ?self.params, "applied physics parameters");
                    self.last_error = None;
                }
                Err(e) => {
                    warn!(%e, "rejected physics parameters");
                    self.last_error = Some(e.to_string());
                    self.params = flag.params().clone();
                }
            }
        }

        let (w, h) = self.resolution;
        if (w, h) != (flag.width_segments(), flag.height_segments()) {
            if let Err(e) = flag.set_resolution(w, h) {
                self.last_error = Some(e.to_string());
                self.resolution = (flag.width_segments(), flag.height_segments());
            }
        }
    }

    fn advance(&mut self, frame_dt: f32) {
        self.accumulator += frame_dt * self.speed_multiplier;
        let dt = self.ctx.dt();
        let mut ticks = 0;
        while self.accumulator >= dt && ticks < MAX_TICKS_PER_FRAME {
            if let Err(e) = step_simulation(&mut self.ctx) {
                self.last_error = Some(e.to_string());
                self.playing = false;
                break;
            }
            self.accumulator -= dt;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator = 0.0;
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Flag");
        ui.add(egui::Slider::new(&mut self.params.mass, 0.1..=5.0).text("mass"));
        ui.add(egui::Slider::new(&mut self.params.stiffness, 0.001..=0.5).text("stiffness"));
        ui.add(egui::Slider::new(&mut self.params.viscosity, 0.001..=0.2).text("viscosity"));
        ui.add(egui::Slider::new(&mut self.params.damping, 0.0..=0.01).text("damping"));
        ui.add(egui::Slider::new(&mut self.params.tick_rate, 20.0..=400.0).text("tick rate"));
        ui.add(egui::Slider::new(&mut self.resolution.0, 1..=60).text("width segments"));
        ui.add(egui::Slider::new(&mut self.resolution.1, 0..=40).text("height segments"));

        ui.separator();
        ui.label("Shear");
        ui.checkbox(&mut self.params.shear.enabled, "enable");
        ui.add(egui::Slider::new(&mut self.params.shear.stiffness_ratio, 0.0..=1.0).text("stiffness"));
        ui.add(egui::Slider::new(&mut self.params.shear.viscosity_ratio, 0.0..=1.0).text("viscosity"));

        ui.label("Bend");
        ui.checkbox(&mut self.params.bend.enabled, "enable");
        ui.add(egui::Slider::new(&mut self.params.bend.stiffness_ratio, 0.0..=1.0).text("stiffness"));
        ui.add(egui::Slider::new(&mut self.params.bend.viscosity_ratio, 0.0..=1.0).text("viscosity"));

        ui.separator();
        ui.heading("Scene");
        let scene = &mut self.ctx.scene.config;
        ui.checkbox(&mut scene.wind_enabled, "wind");
        vec3_sliders(ui, "amplitude", &mut scene.wind_amplitude);
        vec3_sliders(ui, "frequency", &mut scene.wind_frequency);
        ui.checkbox(&mut scene.gravity_enabled, "gravity");
        ui.add(egui::Slider::new(&mut scene.gravity_strength, 0.0..=5.0).text("strength"));
        if ui.button("Defaults").clicked() {
            *scene = self.scene_config.clone();
        }

        ui.separator();
        ui.add(egui::Slider::new(&mut self.yaw, -3.1..=3.1).text("yaw"));
        ui.checkbox(&mut self.show_secondary, "show shear and bend");
    }

    fn draw(&self, ui: &mut egui::Ui) {
        let rect = ui.max_rect();
        let painter = ui.painter();

        let height = self.flag_config.height;
        let width = self.flag_config.width;
        let extent = width.max(2.0 * height) * 1.2;
        let scale = rect.width().min(rect.height()) / extent;
        let focus = Vec3::new(width * 0.5, height, 0.0);
        let (sin, cos) = self.yaw.sin_cos();
        let project = |p: Vec3| {
            let p = p - focus;
            let x = p.x * cos + p.z * sin;
            rect.center() + egui::vec2(x * scale, -p.y * scale)
        };

        // pole
        painter.line_segment(
            [project(Vec3::ZERO), project(Vec3::new(0.0, 2.0 * height, 0.0))],
            egui::Stroke::new(3.0, egui::Color32::DARK_GRAY),
        );

        let flag = &self.ctx.scene.flag;
        let particles = flag.particles();
        let mut families = vec![(SpringFamily::Structural, egui::Color32::LIGHT_BLUE)];
        if self.show_secondary {
            families.push((SpringFamily::Shear, egui::Color32::from_gray(90)));
            families.push((SpringFamily::Bend, egui::Color32::from_rgb(120, 90, 40)));
        }
        for (family, color) in families {
            if !flag.is_enabled(family) {
                continue;
            }
            for spring in flag.springs(family) {
                painter.line_segment(
                    [project(particles[spring.a()].pos), project(particles[spring.b()].pos)],
                    egui::Stroke::new(1.0, color),
                );
            }
        }

        for particle in particles.iter().filter(|p| p.pinned) {
            painter.circle_filled(project(particle.pos), 3.0, egui::Color32::RED);
        }
    }
}

fn vec3_sliders(ui: &mut egui::Ui, label: &str, v: &mut Vec3) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(&mut v.x).speed(0.05).range(0.0..=10.0));
        ui.add(egui::DragValue::new(&mut v.y).speed(0.05).range(0.0..=10.0));
        ui.add(egui::DragValue::new(&mut v.z).speed(0.05).range(0.0..=10.0));
    });
}

impl eframe::App for ViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(if self.playing { "⏸ Pause" } else { "▶ Play" }).clicked() {
                    self.playing = !self.playing;
                }

                if ui.button("⏮ Reset").clicked() {
                    self.reset();
                }

                if ui.button("⏭ Step").clicked() {
                    if let Err(e) = step_simulation(&mut self.ctx) {
                        self.last_error = Some(e.to_string());
                    }
                }

                ui.separator();

                ui.label("Speed:");
                ui.add(egui::Slider::new(&mut self.speed_multiplier, 0.1..=4.0));

                ui.separator();

                ui.label(format!(
                    "Tick: {}  t = {:.2}s  E = {:.3}",
                    self.ctx.current_step,
                    self.ctx.time,
                    self.ctx.scene.flag.kinetic_energy() + self.ctx.scene.flag.elastic_energy()
                ));
            });
        });

        egui::SidePanel::right("params").show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| self.controls(ui));
        });
        self.sync_params();

        if let Some(ref error) = self.last_error {
            egui::TopBottomPanel::bottom("errors").show(ctx, |ui| {
                ui.label(egui::RichText::new(format!("Error: {}", error)).color(egui::Color32::RED));
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| self.draw(ui));

        if self.playing {
            let frame_dt = ctx.input(|i| i.stable_dt);
            self.advance(frame_dt);
            ctx.request_repaint();
        }
    }
}
