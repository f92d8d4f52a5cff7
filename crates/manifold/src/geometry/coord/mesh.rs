use super::{simplex::SimplexHandleExt, CoordRef};
use crate::{
  topology::{complex::Complex, VertexIdx},
  Dim,
};

use common::linalg::nalgebra::Matrix;

/// The coordinates of the vertices of the mesh.
///
/// One column per vertex.
#[derive(Debug, Clone)]
pub struct MeshCoords {
  matrix: Matrix,
}

impl MeshCoords {
  pub fn new(matrix: Matrix) -> Self {
    Self { matrix }
  }

  pub fn matrix(&self) -> &Matrix {
    &self.matrix
  }

  pub fn dim(&self) -> Dim {
    self.matrix.nrows()
  }
  pub fn nvertices(&self) -> usize {
    self.matrix.ncols()
  }

  pub fn coord(&self, ivertex: VertexIdx) -> CoordRef {
    self.matrix.column(ivertex)
  }
  pub fn coord_iter(
    &self,
  ) -> na::iter::ColumnIter<'_, f64, na::Dyn, na::Dyn, na::VecStorage<f64, na::Dyn, na::Dyn>> {
    self.matrix.column_iter()
  }

  /// Drops trailing coordinate components that vanish on all vertices.
  ///
  /// Used for planar meshes stored with 3 components.
  pub fn truncate_dim(self, dim: Dim) -> Self {
    let ndrop = self.dim() - dim;
    let matrix = self.matrix.remove_rows(dim, ndrop);
    Self::new(matrix)
  }

  /// The largest edge length of the mesh.
  pub fn mesh_width_max(&self, topology: &Complex) -> f64 {
    topology
      .edges()
      .simplex_iter()
      .map(|edge| (self.coord(edge.vertices()[1]) - self.coord(edge.vertices()[0])).norm())
      .fold(0.0, f64::max)
  }

  /// The largest ratio of cell diameter to inscribed ball diameter.
  pub fn shape_regularity(&self, topology: &Complex) -> f64 {
    topology
      .cells()
      .handle_iter()
      .map(|cell| {
        let simp = cell.coord_simplex(self);
        let surface: f64 = (0..simp.nvertices()).map(|i| simp.facet(i).vol()).sum();
        let inradius = simp.dim_intrinsic() as f64 * simp.vol() / surface;
        simp.diameter() / (2.0 * inradius)
      })
      .fold(0.0, f64::max)
  }
}

impl From<Matrix> for MeshCoords {
  fn from(matrix: Matrix) -> Self {
    Self::new(matrix)
  }
}
