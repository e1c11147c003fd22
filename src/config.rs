//! Configuration for boolean constructions.
//!
//! [`BooleanConfig`] collects the tolerances, the ray-casting behaviour and the
//! result cleanup used by one construction. The defaults reproduce the classic
//! face-splitting modeller with a fixed perturbation seed, so repeated runs on
//! the same input give the same output.
//!
//! # Example
//!
//! ```
//! use tricsg::config::{BooleanConfig, RayStrategy, UnresolvedPolicy};
//!
//! let config = BooleanConfig::default()
//!     .with_ray_strategy(RayStrategy::NearestHit)
//!     .with_unresolved(UnresolvedPolicy::Fail)
//!     .with_seed(Some(7));
//! assert_eq!(config.seed, Some(7));
//! ```

use crate::float_types::{EPSILON, Real};

/// Seed used for ray perturbation unless the caller picks another one.
pub const DEFAULT_SEED: u64 = 0x5eed_c5c5;

/// How ray crossings decide between inside and outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RayStrategy {
    /// Odd number of crossings is inside, even is outside.
    #[default]
    Parity,

    /// The nearest crossing decides: a face facing along the ray means the
    /// origin is inside, a face facing against it means outside.
    NearestHit,
}

/// What to do with faces that stay unclassified after ray casting and propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedPolicy {
    /// Treat them as outside the other operand.
    #[default]
    Outside,

    /// Treat them as inside the other operand.
    Inside,

    /// Abort the construction with [`crate::errors::CsgError::UnresolvedClassification`].
    Fail,
}

/// Configuration for one boolean construction.
#[derive(Debug, Clone)]
pub struct BooleanConfig {
    /// Tolerance for vertex signs against a plane, segment depths and line solves.
    pub plane_tolerance: Real,

    /// Number of perturbed re-casts before a face is left unclassified.
    pub max_ray_retries: usize,

    /// Upper bound of the random jitter added to each ray direction component.
    pub perturbation: Real,

    /// Seed for the perturbation RNG. `None` draws from the thread RNG.
    pub seed: Option<u64>,

    /// How crossings are turned into a face status.
    pub ray_strategy: RayStrategy,

    /// Fallback for faces that remain unclassified.
    pub unresolved: UnresolvedPolicy,

    /// Splitting stops once a mesh holds this many times its initial face count.
    pub split_growth_limit: usize,

    /// Split result edges that have another result vertex lying inside them.
    pub stitch_t_junctions: bool,

    /// Distance from an edge under which a vertex counts as lying on it when stitching.
    pub stitch_tolerance: Real,
}

impl Default for BooleanConfig {
    fn default() -> Self {
        Self {
            plane_tolerance: EPSILON,
            max_ray_retries: 32,
            perturbation: 1e-5,
            seed: Some(DEFAULT_SEED),
            ray_strategy: RayStrategy::default(),
            unresolved: UnresolvedPolicy::default(),
            split_growth_limit: 20,
            stitch_t_junctions: true,
            stitch_tolerance: 1e-7,
        }
    }
}

impl BooleanConfig {
    /// Settings of the classic modeller: nearest-hit ray casting and no result stitching.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            ray_strategy: RayStrategy::NearestHit,
            stitch_t_junctions: false,
            ..Self::default()
        }
    }

    /// Fail instead of guessing when a face cannot be classified.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            unresolved: UnresolvedPolicy::Fail,
            ..Self::default()
        }
    }

    /// Set the plane tolerance.
    #[must_use]
    pub const fn with_plane_tolerance(mut self, tolerance: Real) -> Self {
        self.plane_tolerance = tolerance;
        self
    }

    /// Set the number of perturbed ray retries.
    #[must_use]
    pub const fn with_max_ray_retries(mut self, retries: usize) -> Self {
        self.max_ray_retries = retries;
        self
    }

    /// Set the ray perturbation magnitude.
    #[must_use]
    pub const fn with_perturbation(mut self, magnitude: Real) -> Self {
        self.perturbation = magnitude;
        self
    }

    /// Set the perturbation seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Set the ray strategy.
    #[must_use]
    pub const fn with_ray_strategy(mut self, strategy: RayStrategy) -> Self {
        self.ray_strategy = strategy;
        self
    }

    /// Set the unresolved-face policy.
    #[must_use]
    pub const fn with_unresolved(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved = policy;
        self
    }

    /// Set the split growth limit.
    #[must_use]
    pub const fn with_split_growth_limit(mut self, factor: usize) -> Self {
        self.split_growth_limit = factor;
        self
    }

    /// Enable or disable T-junction stitching of the result.
    #[must_use]
    pub const fn with_stitch_t_junctions(mut self, enabled: bool) -> Self {
        self.stitch_t_junctions = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_seeded_and_stitches() {
        let config = BooleanConfig::default();
        assert_eq!(config.seed, Some(DEFAULT_SEED));
        assert!(config.stitch_t_junctions);
        assert_eq!(config.ray_strategy, RayStrategy::Parity);
        assert_eq!(config.unresolved, UnresolvedPolicy::Outside);
    }

    #[test]
    fn presets_override_only_their_fields() {
        let classic = BooleanConfig::classic();
        assert_eq!(classic.ray_strategy, RayStrategy::NearestHit);
        assert!(!classic.stitch_t_junctions);
        assert_eq!(classic.plane_tolerance, EPSILON);

        let strict = BooleanConfig::strict().with_max_ray_retries(3);
        assert_eq!(strict.unresolved, UnresolvedPolicy::Fail);
        assert_eq!(strict.max_ray_retries, 3);
    }
}
