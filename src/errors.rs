//! Construction and boolean errors

use crate::float_types::Real;
use nalgebra::Point3;
use std::fmt::Display;

/// Which operand of a boolean construction an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    First,
    Second,
}

impl Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::First => write!(f, "first"),
            Operand::Second => write!(f, "second"),
        }
    }
}

/// All the possible issues we might encounter building meshes or running a boolean
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CsgError {
    /// (InvalidCoordinate) The coordinate has a NaN or infinite
    InvalidCoordinate(Point3<Real>),
    /// (IndexOutOfRange) A triangle references a vertex that does not exist
    IndexOutOfRange { index: usize, vertex_count: usize },
    /// (IncompleteTriangle) The index list length is not a multiple of three
    IncompleteTriangle { len: usize },
    /// (UnresolvedClassification) A face could not be classified against the other operand
    UnresolvedClassification { operand: Operand, face: usize },
}

impl Display for CsgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsgError::InvalidCoordinate(opoint) => write!(f, "(InvalidCoordinate) The coordinate ({}) has a NaN or infinite", opoint),
            CsgError::IndexOutOfRange { index, vertex_count } => write!(f, "(IndexOutOfRange) Vertex index {} is out of range (vertices.len = {})", index, vertex_count),
            CsgError::IncompleteTriangle { len } => write!(f, "(IncompleteTriangle) Index list of length {} is not made of whole triangles", len),
            CsgError::UnresolvedClassification { operand, face } => write!(f, "(UnresolvedClassification) Face {} of the {} operand could not be classified", face, operand),
        }
    }
}

/// Result alias used by fallible constructions
pub type CsgResult<T> = Result<T, CsgError>;
