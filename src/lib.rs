//! Boolean operations (*union*, *intersection*, *difference*) on closed,
//! consistently oriented triangle meshes.
//!
//! Each operand's triangles are split along the curve where the two surfaces
//! cross, every resulting triangle is classified as inside, outside, or
//! coplanar with the other operand by ray casting, and the triangles each
//! operation needs are assembled into a new [`Mesh`].
//!
//! ```
//! use tricsg::{CSGOps, Mesh};
//!
//! let cube = |offset: f64| {
//!     let corners = [
//!         [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0],
//!         [0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0],
//!     ];
//!     let indices = [
//!         0, 2, 1, 0, 3, 2, 4, 5, 6, 4, 6, 7, 0, 1, 5, 0, 5, 4,
//!         3, 7, 6, 3, 6, 2, 0, 4, 7, 0, 7, 3, 1, 2, 6, 1, 6, 5,
//!     ];
//!     let mut mesh = Mesh::from_arrays(&corners, &indices);
//!     mesh.translate(offset, 0.0, 0.0);
//!     mesh
//! };
//!
//! let overlap = cube(0.0).intersection(cube(0.5));
//! assert!((overlap.volume() - 0.5).abs() < 1e-6);
//! ```
//!
//! # Features
//! #### Optional
//! - **parallel**: use rayon to classify candidate faces and cast probe rays
//!   on multiple threads

#![forbid(unsafe_code)]
#![deny(unused)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod aabb;
pub mod boolean;
pub mod config;
pub mod errors;
pub mod float_types;
pub mod mesh;
pub mod tracing_ext;
pub mod traits;

pub use boolean::{BooleanModeller, BooleanOp};
pub use config::BooleanConfig;
pub use errors::{CsgError, CsgResult};
pub use mesh::Mesh;
pub use traits::CSGOps;
