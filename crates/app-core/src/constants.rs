// Shared sketch/animation tuning constants used by core logic and frontends.

// Sketch capture
pub const MAX_PENDING_POINTS: usize = 256; // oldest point evicted past this
pub const MIN_DRAWABLE_POINTS: usize = 4; // shorter sketches render as no-ops
pub const DRAG_START_THRESHOLD: f32 = 0.1; // press-to-drag distance, NDC
pub const DRAG_SAMPLE_SPACING: f32 = 0.1; // min spacing between drag samples

// Animation
pub const DEFAULT_VELOCITY: f32 = 0.01;
pub const VELOCITY_STEP: f32 = 0.01; // hotkey increment
pub const MIN_VELOCITY: f32 = -1.0;
pub const MAX_VELOCITY: f32 = 1.0;
pub const SPEED_BASE_FACTOR: f32 = 0.03; // base term of the speed invariant
pub const PERTURBATION_MIN: f32 = 0.001;
pub const PERTURBATION_SPAN: f32 = 0.01; // perturbation in [0.001, 0.011)
pub const SPECIAL_JITTER_SCALE: f32 = 200.0; // special-mode displacement gain
pub const TICK_TIME_DIVISOR: f32 = 7.0; // elapsed-ms to velocity scalar

// Curve sampling
pub const DEFAULT_SEGMENTS: u32 = 1;
pub const MIN_SEGMENTS: u32 = 1;
pub const MAX_SEGMENTS: u32 = 100;

// Style sampling
pub const COLOR_CHANNEL_BIAS: f32 = 0.05; // channels land in [0.05, 1.05)
pub const ALPHA_MIN: f32 = 0.3;
pub const ALPHA_SPAN: f32 = 0.7;
pub const POINT_SIZE_MIN: f32 = 20.0;
pub const POINT_SIZE_SPAN: f32 = 20.0; // creation-time size in [20, 40)
pub const FLICKER_SIZE_MIN: f32 = 20.0;
pub const FLICKER_SIZE_SPAN: f32 = 70.0; // special-mode size in [20, 90)
pub const SHAPE_BUCKET_SPAN: f32 = 1.5; // three equal buckets of 0.5
