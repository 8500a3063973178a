//! Per-curve state: control points, the velocity model that animates them,
//! and the geometry description handed to a render backend.
//!
//! These types intentionally avoid referencing platform-specific APIs and are
//! suitable for use on both native and web targets. Basis evaluation itself
//! lives in the shader; the core only decides how many samples to request and
//! which uniforms accompany them.

use glam::{Vec2, Vec4};
use rand::prelude::*;

use crate::constants::*;

/// Parametric basis selecting how a control polygon is interpolated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveMode {
    BSpline,
    Bezier,
    CatmullRom,
}

impl CurveMode {
    pub fn name(self) -> &'static str {
        match self {
            CurveMode::BSpline => "B-Spline",
            CurveMode::Bezier => "Bezier",
            CurveMode::CatmullRom => "Catmull-Rom",
        }
    }

    pub fn index(self) -> u32 {
        match self {
            CurveMode::BSpline => 0,
            CurveMode::Bezier => 1,
            CurveMode::CatmullRom => 2,
        }
    }

    pub fn from_index(index: u32) -> Option<CurveMode> {
        match index {
            0 => Some(CurveMode::BSpline),
            1 => Some(CurveMode::Bezier),
            2 => Some(CurveMode::CatmullRom),
            _ => None,
        }
    }
}

/// Per-control-point animation state.
///
/// Invariant: `speed = 0.03 * base + base * perturbation * direction` per
/// axis, recomputed wholesale on every base-velocity change. Direction signs
/// flip on boundary bounces; perturbation is fixed for the curve's lifetime.
#[derive(Clone, Copy, Debug)]
pub struct VelocityState {
    pub speed: Vec2,
    pub direction: Vec2,
    pub perturbation: Vec2,
}

impl VelocityState {
    fn recompute_speed(&mut self, base: f32) {
        self.speed = Vec2::new(
            SPEED_BASE_FACTOR * base + base * self.perturbation.x * self.direction.x,
            SPEED_BASE_FACTOR * base + base * self.perturbation.y * self.direction.y,
        );
    }
}

/// Visual attributes rolled once per curve (special mode re-rolls per draw).
#[derive(Clone, Copy, Debug)]
pub struct CurveStyle {
    pub color: Vec4,
    pub point_size: f32,
    pub shape_type: u32,
}

impl CurveStyle {
    /// Roll a fresh style: slightly over-saturated RGB, translucent alpha,
    /// a point size in [20, 40), and one of three sample-point glyphs.
    pub fn sample(rng: &mut StdRng) -> Self {
        let color = Vec4::new(
            rng.gen::<f32>() + COLOR_CHANNEL_BIAS,
            rng.gen::<f32>() + COLOR_CHANNEL_BIAS,
            rng.gen::<f32>() + COLOR_CHANNEL_BIAS,
            rng.gen::<f32>() * ALPHA_SPAN + ALPHA_MIN,
        );
        let point_size = rng.gen::<f32>() * POINT_SIZE_SPAN + POINT_SIZE_MIN;
        let bucket = rng.gen::<f32>() * SHAPE_BUCKET_SPAN;
        let shape_type = if bucket < 0.5 {
            0
        } else if bucket < 1.0 {
            1
        } else {
            2
        };
        Self {
            color,
            point_size,
            shape_type,
        }
    }
}

/// Read-only geometry snapshot handed to a `RenderBackend` for one draw call.
#[derive(Clone, Debug)]
pub struct DrawGeometry {
    pub mode: CurveMode,
    pub control_points: Vec<[f32; 2]>,
    pub sample_count: u32,
    pub segments: u32,
    pub color: [f32; 4],
    pub point_size: f32,
    pub shape_type: u32,
}

/// One sketched curve: an immutable-length control polygon plus the velocity
/// state that bounces it around the viewport.
#[derive(Clone, Debug)]
pub struct Curve {
    pub control_points: Vec<Vec2>,
    pub velocities: Vec<VelocityState>,
    pub base_velocity: f32,
    pub segments: u32,
    pub mode: CurveMode,
    pub style: CurveStyle,
    pub special_mode: bool,
}

impl Curve {
    /// Build a curve from captured points. One direction-sign pair is rolled
    /// for the whole curve; each point gets its own perturbation pair.
    /// Fewer than four points is legal but renders as a no-op.
    pub fn new(
        points: &[Vec2],
        base_velocity: f32,
        segments: u32,
        style: CurveStyle,
        mode: CurveMode,
        special_mode: bool,
        rng: &mut StdRng,
    ) -> Self {
        let direction = Vec2::new(
            if rng.gen::<f32>() < 0.5 { -1.0 } else { 1.0 },
            if rng.gen::<f32>() < 0.5 { -1.0 } else { 1.0 },
        );
        let velocities = points
            .iter()
            .map(|_| {
                let perturbation = Vec2::new(
                    rng.gen::<f32>() * PERTURBATION_SPAN + PERTURBATION_MIN,
                    rng.gen::<f32>() * PERTURBATION_SPAN + PERTURBATION_MIN,
                );
                let mut state = VelocityState {
                    speed: Vec2::ZERO,
                    direction,
                    perturbation,
                };
                state.recompute_speed(base_velocity);
                state
            })
            .collect();
        Self {
            control_points: points.to_vec(),
            velocities,
            base_velocity,
            segments,
            mode,
            style,
            special_mode,
        }
    }

    /// Recompute every point's speed from the invariant. Directions and
    /// perturbations persist; positions are untouched.
    pub fn update_velocity(&mut self, new_base: f32) {
        self.base_velocity = new_base;
        for state in &mut self.velocities {
            state.recompute_speed(new_base);
        }
    }

    /// Advance every control point one tick and reflect off the viewport.
    ///
    /// Special mode replaces linear motion with sign-symmetric jitter scaled
    /// by the speed magnitude; bounces still flip direction signs there, but
    /// direction only re-enters motion through the next velocity update.
    pub fn update_positions(&mut self, rng: &mut StdRng) {
        for (point, state) in self.control_points.iter_mut().zip(&mut self.velocities) {
            let step = if self.special_mode {
                Vec2::new(
                    state.speed.x * SPECIAL_JITTER_SCALE * (rng.gen::<f32>() - 0.5),
                    state.speed.y * SPECIAL_JITTER_SCALE * (rng.gen::<f32>() - 0.5),
                )
            } else {
                state.speed * state.direction
            };
            *point += step;

            if point.x <= -1.0 || point.x >= 1.0 {
                state.direction.x = -state.direction.x;
                point.x = point.x.clamp(-1.0, 1.0);
            }
            if point.y <= -1.0 || point.y >= 1.0 {
                state.direction.y = -state.direction.y;
                point.y = point.y.clamp(-1.0, 1.0);
            }
        }
    }

    pub fn set_segments(&mut self, segments: u32) {
        self.segments = segments;
    }

    pub fn set_mode(&mut self, mode: CurveMode) {
        self.mode = mode;
    }

    pub fn set_special_mode(&mut self, enabled: bool) {
        self.special_mode = enabled;
    }

    /// Number of samples the backend should evaluate, or `None` when the
    /// control polygon is too short to draw.
    ///
    /// B-spline and Catmull-Rom slide a window of four points, giving
    /// `segments * (n - 3)` samples. Bezier chains cubic segments through
    /// every third point, giving `segments * floor((n - 1) / 3) + 1`;
    /// remainder points beyond the last full segment go unused.
    pub fn sample_count(&self) -> Option<u32> {
        let n = self.control_points.len();
        if n < MIN_DRAWABLE_POINTS {
            return None;
        }
        let n = n as u32;
        Some(match self.mode {
            CurveMode::BSpline | CurveMode::CatmullRom => self.segments * (n - 3),
            CurveMode::Bezier => self.segments * ((n - 1) / 3) + 1,
        })
    }

    /// Describe one draw call's worth of geometry and uniforms.
    ///
    /// In special mode the color and point size are re-rolled on every call
    /// (the flicker effect) and the glyph shape is rotated by one.
    pub fn describe(&self, rng: &mut StdRng) -> Option<DrawGeometry> {
        let sample_count = self.sample_count()?;
        let (color, point_size) = if self.special_mode {
            (
                Vec4::new(rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>(), 1.0),
                rng.gen::<f32>() * FLICKER_SIZE_SPAN + FLICKER_SIZE_MIN,
            )
        } else {
            (self.style.color, self.style.point_size)
        };
        let shape_type = if self.special_mode {
            (self.style.shape_type + 1) % 3
        } else {
            self.style.shape_type
        };
        Some(DrawGeometry {
            mode: self.mode,
            control_points: self.control_points.iter().map(|p| [p.x, p.y]).collect(),
            sample_count,
            segments: self.segments,
            color: color.to_array(),
            point_size,
            shape_type,
        })
    }
}
