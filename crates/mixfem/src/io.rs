use crate::{function::MixedSolution, FeError};

use common::linalg::nalgebra::Vector;
use manifold::{
  geometry::coord::mesh::MeshCoords,
  io::vtk::{cell_scalars, cell_vectors, mesh_to_vtk},
  topology::complex::Complex,
  MeshError,
};

use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
  #[error("failed to create output directory: {0}")]
  Io(#[from] std::io::Error),
  #[error("failed to write vtk file: {0}")]
  Vtk(String),
  #[error(transparent)]
  Fe(#[from] FeError),
  #[error(transparent)]
  Mesh(#[from] MeshError),
}

/// Writes flux and potential, evaluated at the cell barycenters,
/// as cell data of a legacy VTK unstructured grid.
pub fn write_mixed_solution_vtk(
  path: impl AsRef<Path>,
  topology: &Complex,
  coords: &MeshCoords,
  solution: &MixedSolution,
) -> Result<(), ExportError> {
  let path = path.as_ref();
  if let Some(dir) = path.parent() {
    std::fs::create_dir_all(dir)?;
  }

  let dim = topology.dim();
  let barycenter = Vector::from_element(dim + 1, 1.0 / (dim + 1) as f64);

  let mut flux = Vec::with_capacity(3 * topology.ncells());
  let mut potential = Vec::with_capacity(topology.ncells());
  for cell in topology.cells().handle_iter() {
    let sigma = solution.flux.eval(cell, coords, barycenter.as_view())?;
    flux.extend(sigma.iter().copied());
    flux.extend(std::iter::repeat(0.0).take(3 - sigma.len()));
    potential.push(solution.potential.eval(cell, barycenter.as_view()));
  }

  let attributes = vec![cell_vectors("flux", flux), cell_scalars("u", potential)];
  let vtk = mesh_to_vtk("mixed poisson", topology, coords, attributes)?;
  vtk
    .export_ascii(path)
    .map_err(|e| ExportError::Vtk(format!("{e:?}")))?;

  tracing::info!("wrote solution to {}", path.display());
  Ok(())
}
