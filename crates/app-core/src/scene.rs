//! Scene orchestration: the list of finalized curves, the pending sketch
//! buffer, global animation parameters, and per-frame update/draw dispatch.

use glam::Vec2;
use rand::prelude::*;

use crate::backend::{RenderBackend, Topology};
use crate::constants::*;
use crate::curve::{Curve, CurveMode, CurveStyle};

/// Round to three decimals, the precision the velocity controls work in.
#[inline]
pub fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

/// Read-only projection of scene state for UI readouts.
#[derive(Clone, Copy, Debug)]
pub struct SceneReadout {
    pub curve_count: usize,
    pub mode: CurveMode,
    pub velocity: f32,
    pub segments: u32,
    pub animating: bool,
    pub special_mode: bool,
    pub draw_lines: bool,
    pub draw_sample_points: bool,
}

/// Exclusive owner of all curves and the pending buffer. All mutation happens
/// synchronously from one caller per frame; there is no interior locking.
pub struct Scene {
    pub curves: Vec<Curve>,
    pub pending: Vec<Vec2>,
    pub base_velocity: f32,
    pub num_segments: u32,
    pub mode: CurveMode,
    pub is_animating: bool,
    pub draw_lines: bool,
    pub draw_sample_points: bool,
    pub special_mode: bool,
    pub next_style: CurveStyle,
    rng: StdRng,
}

impl Scene {
    /// Seeded construction keeps style rolls and jitter deterministic in
    /// tests; frontends pass an arbitrary seed.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let next_style = CurveStyle::sample(&mut rng);
        Self {
            curves: Vec::new(),
            pending: Vec::new(),
            base_velocity: DEFAULT_VELOCITY,
            num_segments: DEFAULT_SEGMENTS,
            mode: CurveMode::BSpline,
            is_animating: true,
            draw_lines: true,
            draw_sample_points: true,
            special_mode: false,
            next_style,
            rng,
        }
    }

    /// Capture one pointer sample into the pending sketch.
    ///
    /// Drag samples closer than the spacing threshold to the last captured
    /// point are discarded; single clicks always append. Past capacity the
    /// oldest point is evicted, keeping relative order.
    pub fn add_pending_point(&mut self, point: Vec2, dragging: bool) {
        if dragging {
            if let Some(last) = self.pending.last() {
                if last.distance(point) < DRAG_SAMPLE_SPACING {
                    return;
                }
            }
        }
        if self.pending.len() >= MAX_PENDING_POINTS {
            self.pending.remove(0);
        }
        self.pending.push(point);
    }

    /// Commit the pending sketch as a curve. Fewer than four points is a
    /// silent no-op. On commit, a fresh style is rolled for the next curve.
    pub fn finalize_pending(&mut self) {
        if self.pending.len() < MIN_DRAWABLE_POINTS {
            return;
        }
        let curve = Curve::new(
            &self.pending,
            self.base_velocity,
            self.num_segments,
            self.next_style,
            self.mode,
            self.special_mode,
            &mut self.rng,
        );
        self.curves.push(curve);
        self.next_style = CurveStyle::sample(&mut self.rng);
        self.pending.clear();
    }

    /// Per-frame update. The wall-clock delta is folded into one velocity
    /// scalar and broadcast to every curve; positions only advance while
    /// animation is on.
    pub fn tick(&mut self, elapsed_ms: f32) {
        let scalar = round3(self.base_velocity * elapsed_ms / TICK_TIME_DIVISOR);
        for curve in &mut self.curves {
            curve.update_velocity(scalar);
            if self.is_animating {
                curve.update_positions(&mut self.rng);
            }
        }
    }

    /// Drop all curves and the pending sketch.
    pub fn clear(&mut self) {
        self.curves.clear();
        self.pending.clear();
    }

    pub fn set_num_segments(&mut self, segments: u32) {
        self.num_segments = segments.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
        for curve in &mut self.curves {
            curve.set_segments(self.num_segments);
        }
    }

    pub fn adjust_segments(&mut self, delta: i32) {
        let next = (self.num_segments as i32 + delta).clamp(MIN_SEGMENTS as i32, MAX_SEGMENTS as i32);
        self.set_num_segments(next as u32);
    }

    /// Slider/hotkey path: clamp, round to three decimals, and broadcast
    /// immediately (the tick re-broadcasts its time-scaled scalar anyway).
    pub fn set_base_velocity(&mut self, velocity: f32) {
        self.base_velocity = round3(velocity.clamp(MIN_VELOCITY, MAX_VELOCITY));
        for curve in &mut self.curves {
            curve.update_velocity(self.base_velocity);
        }
    }

    pub fn adjust_velocity(&mut self, delta: f32) {
        self.set_base_velocity(self.base_velocity + delta);
    }

    pub fn set_mode(&mut self, mode: CurveMode) {
        self.mode = mode;
        for curve in &mut self.curves {
            curve.set_mode(mode);
        }
    }

    pub fn set_special_mode(&mut self, enabled: bool) {
        self.special_mode = enabled;
        for curve in &mut self.curves {
            curve.set_special_mode(enabled);
        }
    }

    pub fn toggle_special_mode(&mut self) {
        self.set_special_mode(!self.special_mode);
    }

    pub fn toggle_animation(&mut self) {
        self.is_animating = !self.is_animating;
    }

    pub fn toggle_lines(&mut self) {
        self.draw_lines = !self.draw_lines;
    }

    pub fn toggle_sample_points(&mut self) {
        self.draw_sample_points = !self.draw_sample_points;
    }

    pub fn readout(&self) -> SceneReadout {
        SceneReadout {
            curve_count: self.curves.len(),
            mode: self.mode,
            velocity: self.base_velocity,
            segments: self.num_segments,
            animating: self.is_animating,
            special_mode: self.special_mode,
            draw_lines: self.draw_lines,
            draw_sample_points: self.draw_sample_points,
        }
    }

    /// Dispatch one frame's draw calls: every finalized curve, then a
    /// transient preview of the pending sketch once it is long enough to
    /// draw. A failed draw is logged and skipped; other calls proceed.
    pub fn render(&mut self, backend: &mut dyn RenderBackend) {
        let draw_lines = self.draw_lines;
        let draw_points = self.draw_sample_points;
        for i in 0..self.curves.len() {
            if draw_lines {
                if let Some(geometry) = self.curves[i].describe(&mut self.rng) {
                    if let Err(err) = backend.draw(&geometry, Topology::LineStrip) {
                        log::warn!("skipping line draw for curve {i}: {err}");
                    }
                }
            }
            if draw_points {
                if let Some(geometry) = self.curves[i].describe(&mut self.rng) {
                    if let Err(err) = backend.draw(&geometry, Topology::Points) {
                        log::warn!("skipping point draw for curve {i}: {err}");
                    }
                }
            }
        }

        if self.pending.len() >= MIN_DRAWABLE_POINTS {
            let preview = Curve::new(
                &self.pending,
                self.base_velocity,
                self.num_segments,
                self.next_style,
                self.mode,
                self.special_mode,
                &mut self.rng,
            );
            if draw_lines {
                if let Some(geometry) = preview.describe(&mut self.rng) {
                    if let Err(err) = backend.draw(&geometry, Topology::LineStrip) {
                        log::warn!("skipping preview line draw: {err}");
                    }
                }
            }
            if draw_points {
                if let Some(geometry) = preview.describe(&mut self.rng) {
                    if let Err(err) = backend.draw(&geometry, Topology::Points) {
                        log::warn!("skipping preview point draw: {err}");
                    }
                }
            }
        }
    }
}
