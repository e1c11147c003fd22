// Re-export parry for the bounding volume types used across the crate
pub use parry3d_f64 as parry3d;

// Our Real scalar type. The tolerances below assume double precision.
pub type Real = f64;

/// Geometric tolerance for plane signs, segment depths and line solves.
pub const EPSILON: Real = 1e-10;

/// Two vertices whose coordinates all differ by less than this are the same vertex.
pub const VERTEX_TOLERANCE: Real = 1e-5;

/// Faces with an area below this are rejected at insertion.
pub const AREA_TOLERANCE: Real = 1e-10;

/// Slack added to every comparison of the fuzzy bounding box overlap test.
pub const BOUNDS_TOLERANCE: Real = 1e-10;

// Pi
/// Archimedes' constant (π)
pub const PI: Real = core::f64::consts::PI;

// Frac Pi 2
/// π/2
pub const FRAC_PI_2: Real = core::f64::consts::FRAC_PI_2;

// Tau
/// The full circle constant (τ)
pub const TAU: Real = core::f64::consts::TAU;
