//! Simplicial Mesh Datastructure for working with Topology and Geometry.
//!
//! - Container for mesh entities (Simplicies).
//! - Global numbering for unique identification of the entities.
//! - Entity Iteration
//! - Topological Information (Incidence, Boundary)
//! - Geometrical information (Coordinates, Volumes, Normals, Quadrature)
//! - Mesh generation and mesh file formats

extern crate nalgebra as na;

pub mod gen;
pub mod geometry;
pub mod io;
pub mod topology;

pub use common::Dim;

use topology::simplex::Simplex;

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
  #[error("mesh size must be positive and finite, got {0}")]
  InvalidMeshSize(f64),
  #[error("failed to parse gmsh file: {0}")]
  Gmsh(String),
  #[error("gmsh file has no {0} section")]
  MissingGmshSection(&'static str),
  #[error("mesh has no cells")]
  NoCells,
  #[error("element references unknown node tag {0}")]
  UnknownNodeTag(u64),
  #[error("cannot export {0}-dimensional cells to VTK")]
  UnsupportedVtkDim(Dim),
  #[error("topology is not a manifold: facet {facet:?} is shared by {ncocells} cells")]
  NonManifold { facet: Simplex, ncocells: usize },
}
