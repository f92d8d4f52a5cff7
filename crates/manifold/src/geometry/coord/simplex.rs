use super::{mesh::MeshCoords, BaryCoord, BaryCoordRef, Coord, CoordRef};
use crate::{
  geometry::refsimp_vol,
  topology::{complex::handle::SimplexHandle, simplex::Simplex},
  Dim,
};

use common::{
  combo::Sign,
  linalg::nalgebra::{Matrix, Vector},
};

/// A simplex realized by the coordinates of its vertices.
#[derive(Debug, Clone)]
pub struct SimplexCoords {
  pub vertices: MeshCoords,
}

impl SimplexCoords {
  pub fn new(vertices: Matrix) -> Self {
    let vertices = vertices.into();
    Self { vertices }
  }
  pub fn standard(ndim: Dim) -> Self {
    let nvertices = ndim + 1;
    let mut vertices = Matrix::zeros(ndim, nvertices);
    for i in 0..ndim {
      vertices[(i, i + 1)] = 1.0;
    }
    Self::new(vertices)
  }
  pub fn from_simplex_and_coords(simp: &Simplex, coords: &MeshCoords) -> SimplexCoords {
    let mut vert_coords = Matrix::zeros(coords.dim(), simp.nvertices());
    for (i, v) in simp.iter().enumerate() {
      vert_coords.set_column(i, &coords.coord(v));
    }
    SimplexCoords::new(vert_coords)
  }

  pub fn nvertices(&self) -> usize {
    self.vertices.nvertices()
  }
  pub fn dim_intrinsic(&self) -> Dim {
    self.nvertices() - 1
  }
  pub fn dim_ambient(&self) -> Dim {
    self.vertices.dim()
  }
  pub fn is_same_dim(&self) -> bool {
    self.dim_intrinsic() == self.dim_ambient()
  }

  pub fn coord(&self, ivertex: usize) -> CoordRef {
    self.vertices.coord(ivertex)
  }
  pub fn base_vertex(&self) -> CoordRef {
    self.coord(0)
  }

  pub fn spanning_vectors(&self) -> Matrix {
    let mut mat = Matrix::zeros(self.dim_ambient(), self.dim_intrinsic());
    let v0 = self.base_vertex();
    for (i, vi) in self.vertices.coord_iter().skip(1).enumerate() {
      mat.set_column(i, &(vi - v0));
    }
    mat
  }

  /// Signed volume for full dimensional simplicies, unsigned otherwise.
  pub fn det(&self) -> f64 {
    let det = if self.dim_intrinsic() == 0 {
      1.0
    } else if self.is_same_dim() {
      self.spanning_vectors().determinant()
    } else {
      let span = self.spanning_vectors();
      (span.transpose() * span).determinant().max(0.0).sqrt()
    };
    refsimp_vol(self.dim_intrinsic()) * det
  }
  pub fn vol(&self) -> f64 {
    self.det().abs()
  }
  /// Volume negligible relative to a simplex of the same diameter.
  ///
  /// Scale invariant, so tiny but well shaped simplicies are fine.
  pub fn is_degenerate(&self) -> bool {
    let dim = self.dim_intrinsic();
    if dim == 0 {
      return false;
    }
    let scale = refsimp_vol(dim) * self.diameter().powi(dim as i32);
    self.vol() <= 1e-12 * scale
  }

  /// Total differential of barycentric coordinate functions in the rows(!) of
  /// a matrix.
  ///
  /// `None` for degenerate simplicies.
  pub fn difbarys(&self) -> Option<Matrix> {
    let difs = if self.dim_intrinsic() == 0 {
      Matrix::zeros(0, self.dim_ambient())
    } else {
      if self.is_degenerate() {
        return None;
      }
      // left inverse of the full column rank spanning vectors
      let span = self.spanning_vectors();
      let gram = span.transpose() * &span;
      gram.try_inverse()? * span.transpose()
    };
    let mut difs = difs.insert_row(0, 0.0);
    let row0 = -difs.row_sum();
    difs.set_row(0, &row0);
    Some(difs)
  }

  pub fn bary2global<'a>(&self, bary: impl Into<BaryCoordRef<'a>>) -> Coord {
    let bary = bary.into();
    self
      .vertices
      .coord_iter()
      .zip(bary.iter())
      .map(|(vi, &baryi)| baryi * vi)
      .fold(Vector::zeros(self.dim_ambient()), |acc, x| acc + x)
  }

  pub fn barycenter(&self) -> Coord {
    let mut barycenter = Vector::zeros(self.dim_ambient());
    self.vertices.coord_iter().for_each(|v| barycenter += v);
    barycenter /= self.nvertices() as f64;
    barycenter
  }

  /// The largest distance between two vertices.
  pub fn diameter(&self) -> f64 {
    let mut diam: f64 = 0.0;
    for i in 0..self.nvertices() {
      for j in (i + 1)..self.nvertices() {
        diam = diam.max((self.coord(j) - self.coord(i)).norm());
      }
    }
    diam
  }
}

/// Facets of a full dimensional simplex.
///
/// Facet `i` is the one opposite to local vertex `i`.
impl SimplexCoords {
  pub fn facet(&self, ifacet: usize) -> SimplexCoords {
    Self::new(self.vertices.matrix().clone().remove_column(ifacet))
  }

  /// Unit normal of facet `ifacet` pointing out of the simplex.
  pub fn outward_normal(&self, ifacet: usize) -> Option<Vector> {
    assert!(self.is_same_dim(), "Normals need a full dimensional simplex.");
    let grad = self.difbarys()?.row(ifacet).transpose();
    Some(-grad.normalize())
  }

  /// Relative orientation of the outward normal of facet `ifacet` and
  /// the orientation induced by the increasing vertex order of the facet.
  ///
  /// The product of this sign and the outward normal is the same for both
  /// cells sharing a facet, provided the vertices are globally sorted.
  pub fn facet_orientation(&self, ifacet: usize) -> Option<Sign> {
    let normal = self.outward_normal(ifacet)?;
    let span = self.facet(ifacet).spanning_vectors();
    let frame = Matrix::from_fn(self.dim_ambient(), self.dim_ambient(), |r, c| {
      if c < span.ncols() {
        span[(r, c)]
      } else {
        normal[r]
      }
    });
    Sign::from_f64(frame.determinant())
  }
}

/// Embeds barycentric coordinates of facet `ifacet` into the cell,
/// the coordinate of the opposite vertex is zero.
pub fn facet_bary_to_cell_bary<'a>(
  ifacet: usize,
  facet_bary: impl Into<BaryCoordRef<'a>>,
) -> BaryCoord {
  let facet_bary = facet_bary.into();
  assert!(ifacet <= facet_bary.len(), "Facet index out of range.");
  facet_bary.into_owned().insert_row(ifacet, 0.0)
}

pub trait SimplexHandleExt {
  fn coord_simplex(&self, coords: &MeshCoords) -> SimplexCoords;
}
impl SimplexHandleExt for SimplexHandle<'_> {
  fn coord_simplex(&self, coords: &MeshCoords) -> SimplexCoords {
    SimplexCoords::from_simplex_and_coords(self.simplex(), coords)
  }
}
