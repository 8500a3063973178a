// Host-side tests for scene orchestration: pending capture, finalization,
// the frame tick, broadcast setters, and draw dispatch.

use app_core::{
    round3, BackendError, CurveMode, DrawGeometry, RenderBackend, Scene, Topology,
    MAX_PENDING_POINTS, SPEED_BASE_FACTOR,
};
use glam::Vec2;

/// Records every accepted draw call.
#[derive(Default)]
struct RecordingBackend {
    calls: Vec<(Topology, u32)>,
}

impl RenderBackend for RecordingBackend {
    fn draw(&mut self, geometry: &DrawGeometry, topology: Topology) -> Result<(), BackendError> {
        self.calls.push((topology, geometry.sample_count));
        Ok(())
    }
}

/// Rejects point draws, accepts line draws.
#[derive(Default)]
struct FailingPointsBackend {
    lines: usize,
}

impl RenderBackend for FailingPointsBackend {
    fn draw(&mut self, geometry: &DrawGeometry, topology: Topology) -> Result<(), BackendError> {
        match topology {
            Topology::LineStrip => {
                self.lines += 1;
                Ok(())
            }
            Topology::Points => Err(BackendError::Pipeline(geometry.mode)),
        }
    }
}

fn click(scene: &mut Scene, x: f32, y: f32) {
    scene.add_pending_point(Vec2::new(x, y), false);
}

fn sketch_square(scene: &mut Scene) {
    click(scene, -0.5, -0.5);
    click(scene, 0.5, -0.5);
    click(scene, 0.5, 0.5);
    click(scene, -0.5, 0.5);
}

#[test]
fn finalize_needs_four_points() {
    let mut scene = Scene::new(1);
    click(&mut scene, 0.0, 0.0);
    click(&mut scene, 0.2, 0.0);
    click(&mut scene, 0.4, 0.0);
    scene.finalize_pending();
    // Too short: silently dropped nothing, pending untouched
    assert!(scene.curves.is_empty());
    assert_eq!(scene.pending.len(), 3);

    click(&mut scene, 0.6, 0.0);
    scene.finalize_pending();
    assert_eq!(scene.curves.len(), 1);
    assert!(scene.pending.is_empty());
}

#[test]
fn finalized_curve_inherits_globals_and_prerolled_style() {
    let mut scene = Scene::new(2);
    scene.set_num_segments(10);
    scene.set_mode(CurveMode::CatmullRom);
    let style_before = scene.next_style;

    sketch_square(&mut scene);
    scene.finalize_pending();

    let curve = &scene.curves[0];
    assert_eq!(curve.segments, 10);
    assert_eq!(curve.mode, CurveMode::CatmullRom);
    assert_eq!(curve.style.color, style_before.color);
    // A fresh style is rolled for the next curve
    assert_ne!(scene.next_style.color, style_before.color);
}

#[test]
fn four_point_bspline_samples_once_per_segment() {
    let mut scene = Scene::new(3);
    scene.set_num_segments(9);
    sketch_square(&mut scene);
    scene.finalize_pending();
    // n=4 -> segments * (4 - 3)
    assert_eq!(scene.curves[0].sample_count(), Some(9));
}

#[test]
fn pending_overflow_evicts_oldest_in_order() {
    let mut scene = Scene::new(4);
    for i in 0..260 {
        click(&mut scene, (i % 100) as f32 / 100.0, i as f32);
    }
    assert_eq!(scene.pending.len(), MAX_PENDING_POINTS);
    // First four clicks were evicted; the rest survive in original order
    assert_eq!(scene.pending[0].y, 4.0);
    assert_eq!(scene.pending[255].y, 259.0);
    for window in scene.pending.windows(2) {
        assert_eq!(window[1].y - window[0].y, 1.0);
    }
}

#[test]
fn drag_samples_are_decimated_clicks_are_not() {
    let mut scene = Scene::new(5);
    scene.add_pending_point(Vec2::new(0.0, 0.0), true);
    // Closer than the 0.1 spacing: discarded
    scene.add_pending_point(Vec2::new(0.05, 0.0), true);
    assert_eq!(scene.pending.len(), 1);
    // At or beyond the spacing: kept
    scene.add_pending_point(Vec2::new(0.1, 0.0), true);
    assert_eq!(scene.pending.len(), 2);
    // A plain click always appends, even on top of the last point
    scene.add_pending_point(Vec2::new(0.1, 0.0), false);
    assert_eq!(scene.pending.len(), 3);
}

#[test]
fn tick_scalar_is_time_scaled_and_broadcast() {
    let mut scene = Scene::new(6);
    scene.set_base_velocity(0.02);
    sketch_square(&mut scene);
    scene.finalize_pending();
    sketch_square(&mut scene);
    scene.finalize_pending();

    // round3(0.02 * 700 / 7) = 2.0
    scene.tick(700.0);
    for curve in &scene.curves {
        assert!((curve.base_velocity - 2.0).abs() < 1e-6);
        for state in &curve.velocities {
            let expected =
                SPEED_BASE_FACTOR * 2.0 + 2.0 * state.perturbation.x * state.direction.x;
            assert!((state.speed.x - expected).abs() < 1e-6);
        }
    }
}

#[test]
fn tick_only_moves_points_while_animating() {
    let mut scene = Scene::new(7);
    scene.set_base_velocity(0.5);
    sketch_square(&mut scene);
    scene.finalize_pending();

    scene.toggle_animation();
    assert!(!scene.is_animating);
    let before = scene.curves[0].control_points.clone();
    scene.tick(16.0);
    // Velocity was still broadcast, positions stayed put
    assert_eq!(scene.curves[0].control_points, before);

    scene.toggle_animation();
    scene.tick(16.0);
    assert_ne!(scene.curves[0].control_points, before);
}

#[test]
fn zero_velocity_tick_is_motionless() {
    let mut scene = Scene::new(8);
    scene.set_base_velocity(0.0);
    sketch_square(&mut scene);
    scene.finalize_pending();
    let before = scene.curves[0].control_points.clone();
    scene.tick(16.0);
    assert_eq!(scene.curves[0].control_points, before);
}

#[test]
fn setters_clamp_and_broadcast() {
    let mut scene = Scene::new(9);
    sketch_square(&mut scene);
    scene.finalize_pending();

    scene.set_num_segments(500);
    assert_eq!(scene.num_segments, 100);
    assert_eq!(scene.curves[0].segments, 100);
    scene.adjust_segments(-500);
    assert_eq!(scene.num_segments, 1);

    scene.set_base_velocity(7.5);
    assert_eq!(scene.base_velocity, 1.0);
    assert!((scene.curves[0].base_velocity - 1.0).abs() < 1e-6);
    scene.adjust_velocity(-3.0);
    assert_eq!(scene.base_velocity, -1.0);

    scene.set_mode(CurveMode::Bezier);
    assert_eq!(scene.curves[0].mode, CurveMode::Bezier);

    scene.set_special_mode(true);
    assert!(scene.curves[0].special_mode);
    scene.toggle_special_mode();
    assert!(!scene.curves[0].special_mode);
}

#[test]
fn velocity_steps_stay_at_three_decimals() {
    let mut scene = Scene::new(10);
    scene.set_base_velocity(0.0);
    for _ in 0..7 {
        scene.adjust_velocity(0.01);
    }
    assert_eq!(scene.base_velocity, round3(scene.base_velocity));
    assert!((scene.base_velocity - 0.07).abs() < 1e-6);
}

#[test]
fn clear_drops_curves_and_pending() {
    let mut scene = Scene::new(11);
    sketch_square(&mut scene);
    scene.finalize_pending();
    click(&mut scene, 0.1, 0.1);
    scene.clear();
    assert!(scene.curves.is_empty());
    assert!(scene.pending.is_empty());
    assert_eq!(scene.readout().curve_count, 0);
}

#[test]
fn render_dispatches_lines_and_points_per_curve() {
    let mut scene = Scene::new(12);
    sketch_square(&mut scene);
    scene.finalize_pending();
    sketch_square(&mut scene);
    scene.finalize_pending();

    let mut backend = RecordingBackend::default();
    scene.render(&mut backend);
    assert_eq!(backend.calls.len(), 4);
    let lines = backend
        .calls
        .iter()
        .filter(|(t, _)| *t == Topology::LineStrip)
        .count();
    assert_eq!(lines, 2);
}

#[test]
fn render_respects_draw_toggles() {
    let mut scene = Scene::new(13);
    sketch_square(&mut scene);
    scene.finalize_pending();

    scene.toggle_lines();
    let mut backend = RecordingBackend::default();
    scene.render(&mut backend);
    assert_eq!(backend.calls.len(), 1);
    assert_eq!(backend.calls[0].0, Topology::Points);

    scene.toggle_sample_points();
    let mut backend = RecordingBackend::default();
    scene.render(&mut backend);
    assert!(backend.calls.is_empty());
}

#[test]
fn render_previews_pending_sketch_without_storing_it() {
    let mut scene = Scene::new(14);
    sketch_square(&mut scene);

    let mut backend = RecordingBackend::default();
    scene.render(&mut backend);
    // No finalized curves, but the 4-point pending sketch previews
    assert_eq!(backend.calls.len(), 2);
    assert!(scene.curves.is_empty());
    assert_eq!(scene.pending.len(), 4);
}

#[test]
fn backend_failure_skips_only_that_draw() {
    let mut scene = Scene::new(15);
    sketch_square(&mut scene);
    scene.finalize_pending();
    sketch_square(&mut scene);
    scene.finalize_pending();

    let mut backend = FailingPointsBackend::default();
    scene.render(&mut backend);
    // Every point draw failed, every line draw still went through
    assert_eq!(backend.lines, 2);
}

#[test]
fn readout_projects_scene_state() {
    let mut scene = Scene::new(16);
    sketch_square(&mut scene);
    scene.finalize_pending();
    scene.set_mode(CurveMode::Bezier);
    scene.set_num_segments(42);
    scene.set_base_velocity(0.25);

    let r = scene.readout();
    assert_eq!(r.curve_count, 1);
    assert_eq!(r.mode.name(), "Bezier");
    assert_eq!(r.segments, 42);
    assert!((r.velocity - 0.25).abs() < 1e-6);
    assert!(r.animating);
    assert!(!r.special_mode);
    assert!(r.draw_lines);
    assert!(r.draw_sample_points);
}
