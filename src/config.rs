use crate::simulation::ForceParams;

/// Initial window size for both fields
pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 720;

/// Off-screen pointer position meaning "no pointer"
pub const POINTER_SENTINEL: f32 = -1000.0;

// ============================================
// Viewport Adapter
// ============================================

/// Quiescence required after the last resize event before regenerating
pub const RESIZE_DEBOUNCE_MS: u64 = 100;

/// Viewports narrower than this use the fixed narrow population
pub const NARROW_BREAKPOINT: f32 = 768.0;

// ============================================
// Wave Particle Field
// ============================================

pub const WAVE_FORCES: ForceParams = ForceParams {
    repulsion_strength: 3.5,
    return_strength: 0.03,
    friction: 0.85,
    max_speed: 8.0,
};

/// Pointer repulsion radius in pixels
pub const WAVE_INFLUENCE_RADIUS: f32 = 300.0;

/// Viewport area (px²) per mark on wide viewports
pub const WAVE_AREA_PER_AGENT: f32 = 8000.0;
pub const WAVE_MAX_AGENTS: usize = 100;
pub const WAVE_NARROW_AGENTS: usize = 40;

/// Marks leaving the viewport by more than this re-enter from the opposite edge
pub const WAVE_WRAP_MARGIN: f32 = 50.0;

/// Simulation time advanced per drawn frame
pub const WAVE_TIME_STEP: f32 = 0.015;

/// Spatial frequency and amplitude (px) of the anchor drift
pub const WAVE_FREQUENCY: f32 = 0.01;
pub const WAVE_AMPLITUDE: f32 = 30.0;

/// Fraction of the remaining heading error closed each frame
pub const WAVE_HEADING_SMOOTHING: f32 = 0.1;

/// Mark thickness range [min, min + spread)
pub const WAVE_SIZE_MIN: f32 = 1.0;
pub const WAVE_SIZE_SPREAD: f32 = 1.5;

/// Mark length range [min, min + spread)
pub const WAVE_LENGTH_MIN: f32 = 4.0;
pub const WAVE_LENGTH_SPREAD: f32 = 5.0;

/// Reserved per-mark mass range [min, min + spread)
pub const WAVE_MASS_MIN: f32 = 1.0;
pub const WAVE_MASS_SPREAD: f32 = 30.0;

/// Teardrop tail radius relative to mark thickness
pub const WAVE_TEARDROP_TAIL: f32 = 1.5;

/// Pink palette, RGBA
pub const WAVE_PALETTE: [[f32; 4]; 4] = [
    [236.0 / 255.0, 72.0 / 255.0, 153.0 / 255.0, 0.8],
    [219.0 / 255.0, 39.0 / 255.0, 119.0 / 255.0, 0.7],
    [244.0 / 255.0, 114.0 / 255.0, 182.0 / 255.0, 0.9],
    [190.0 / 255.0, 24.0 / 255.0, 93.0 / 255.0, 0.6],
];

pub const WAVE_BACKGROUND: [f64; 4] = [0.04, 0.02, 0.05, 1.0];

/// The whole wave layer is drawn faint over its background
pub const WAVE_LAYER_OPACITY: f32 = 0.4;

// ============================================
// Settling Dot Grid
// ============================================

pub const DOT_FORCES: ForceParams = ForceParams {
    repulsion_strength: 5.0,
    return_strength: 0.08,
    friction: 0.8,
    max_speed: 12.0,
};

pub const DOT_INFLUENCE_RADIUS: f32 = 150.0;

/// Lattice pitch in pixels
pub const DOT_SPACING: f32 = 32.0;

pub const DOT_RADIUS: f32 = 1.5;

/// Velocity component below which a dot counts as settled
pub const DOT_REST_EPSILON: f32 = 0.05;

/// #c0c0c8
pub const DOT_COLOR: [f32; 4] = [192.0 / 255.0, 192.0 / 255.0, 200.0 / 255.0, 1.0];

pub const DOT_BACKGROUND: [f64; 4] = [0.06, 0.06, 0.08, 1.0];

pub const DOT_LAYER_OPACITY: f32 = 0.6;

/// Fraction of the height where the dot layer starts fading to transparent
pub const DOT_FADE_START: f32 = 0.4;

// ============================================
// Rendering
// ============================================

/// Segments used to flatten a half circle
pub const ARC_SEGMENTS: usize = 8;

/// Segments used to flatten each quadratic flank of a teardrop
pub const CURVE_SEGMENTS: usize = 6;

/// Initial vertex buffer capacity (vertices); grows on demand
pub const INITIAL_VERTEX_CAPACITY: usize = 16 * 1024;
