//! Boolean operations on closed triangle meshes.
//!
//! A construction runs three phases, strictly in order:
//!
//! 1. **Split**: each operand's faces are cut along the intersection curve
//!    with the other operand ([`split::split_faces`]).
//! 2. **Classify**: each face is tagged inside, outside, or coplanar
//!    (same/opposite) relative to the other operand ([`classify::classify_faces`]).
//! 3. **Assemble**: the faces selected by the operation are copied into a new
//!    mesh ([`assemble::assemble`]).
//!
//! [`BooleanModeller`] keeps the split and classified operands, so all three
//! operations can be assembled from one split/classify pass.
//!
//! # Example
//!
//! ```
//! use tricsg::boolean::BooleanOp;
//! use tricsg::mesh::Mesh;
//! use tricsg::traits::CSGOps;
//!
//! let tetra = |offset: f64| {
//!     let mut mesh = Mesh::from_arrays(
//!         &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
//!         &[0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3],
//!     );
//!     mesh.translate(offset, 0.0, 0.0);
//!     mesh
//! };
//! let result = BooleanOp::Union.apply(tetra(0.0), tetra(5.0));
//! assert_eq!(result.face_count(), 8);
//! ```

use crate::config::BooleanConfig;
use crate::errors::{CsgResult, Operand};
use crate::mesh::Mesh;
use crate::tracing_ext::{PhaseTimer, log_mesh_stats};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use std::fmt::Display;
use tracing::{debug, warn};

pub mod assemble;
pub mod classify;
pub mod split;

/// The three CSG operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    Union,
    Intersection,
    /// First operand minus second.
    Difference,
}

impl Display for BooleanOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BooleanOp::Union => write!(f, "union (A ∪ B)"),
            BooleanOp::Intersection => write!(f, "intersection (A ∩ B)"),
            BooleanOp::Difference => write!(f, "difference (A − B)"),
        }
    }
}

impl BooleanOp {
    /// Run the operation with the default configuration.
    ///
    /// The default configuration cannot fail; should a custom policy have been
    /// configured through other means, the error is logged and an empty mesh
    /// returned.
    pub fn apply(self, first: Mesh, second: Mesh) -> Mesh {
        match self.apply_with_config(first, second, &BooleanConfig::default()) {
            Ok(mesh) => mesh,
            Err(err) => {
                warn!(%err, operation = %self, "boolean operation failed");
                Mesh::new()
            },
        }
    }

    /// Run the operation, consuming both operands.
    pub fn apply_with_config(
        self,
        first: Mesh,
        second: Mesh,
        config: &BooleanConfig,
    ) -> CsgResult<Mesh> {
        Ok(BooleanModeller::new(first, second, config)?.result(self))
    }
}

/// Split and classified operands, ready to assemble any operation.
#[derive(Debug, Clone)]
pub struct BooleanModeller {
    first: Mesh,
    second: Mesh,
    config: BooleanConfig,
    truncated: bool,
}

impl BooleanModeller {
    /// Split both operands against each other and classify their faces.
    pub fn new(mut first: Mesh, mut second: Mesh, config: &BooleanConfig) -> CsgResult<Self> {
        let _timer = PhaseTimer::with_operands("boolean", &first, &second);
        log_mesh_stats(&first, "first operand");
        log_mesh_stats(&second, "second operand");

        let truncated = {
            let _timer = PhaseTimer::new("split");
            let first_stats = split::split_faces(&mut first, &second, config);
            let second_stats = split::split_faces(&mut second, &first, config);
            debug!(?first_stats, ?second_stats, "operands split");
            first_stats.truncated || second_stats.truncated
        };

        let mut rng: Box<dyn RngCore> = if let Some(seed) = config.seed {
            Box::new(StdRng::seed_from_u64(seed))
        } else {
            Box::new(rand::thread_rng())
        };

        {
            let _timer = PhaseTimer::new("classify");
            let first_stats =
                classify::classify_faces(&mut first, &second, config, rng.as_mut(), Operand::First)?;
            let second_stats =
                classify::classify_faces(&mut second, &first, config, rng.as_mut(), Operand::Second)?;
            debug!(?first_stats, ?second_stats, "operands classified");
        }

        Ok(Self {
            first,
            second,
            config: config.clone(),
            truncated,
        })
    }

    /// The first operand after splitting and classification.
    pub const fn first(&self) -> &Mesh {
        &self.first
    }

    /// The second operand after splitting and classification.
    pub const fn second(&self) -> &Mesh {
        &self.second
    }

    /// Whether splitting stopped at `split_growth_limit` for either operand.
    /// Results assembled from a truncated split may not be closed.
    pub const fn split_truncated(&self) -> bool {
        self.truncated
    }

    /// Assemble the result of `op`.
    pub fn result(&self, op: BooleanOp) -> Mesh {
        let _timer = PhaseTimer::new("assemble");
        let mesh = assemble::assemble(&self.first, &self.second, op, &self.config);
        debug!(operation = %op, faces = mesh.face_count(), vertices = mesh.vertex_count(), "assembled result");
        mesh
    }

    pub fn union(&self) -> Mesh {
        self.result(BooleanOp::Union)
    }

    pub fn intersection(&self) -> Mesh {
        self.result(BooleanOp::Intersection)
    }

    pub fn difference(&self) -> Mesh {
        self.result(BooleanOp::Difference)
    }
}
