//! Element matrices and vectors of the mixed Poisson problem.

use crate::{
  fe::{DofMap, HDivSpace, L2Space},
  FeError,
};

use common::linalg::nalgebra::{Matrix, Vector};
use manifold::{
  geometry::coord::{
    mesh::MeshCoords,
    quadrature::SimplexQuadRule,
    simplex::SimplexHandleExt,
    CoordRef,
  },
  topology::complex::handle::SimplexHandle,
};

pub type ElMat = Matrix;
pub trait ElMatProvider: Sync {
  fn row_space(&self) -> &dyn DofMap;
  fn col_space(&self) -> &dyn DofMap;
  fn eval(&self, cell: SimplexHandle, coords: &MeshCoords) -> Result<ElMat, FeError>;
}

pub type ElVec = Vector;
pub trait ElVecProvider: Sync {
  fn space(&self) -> &dyn DofMap;
  fn eval(&self, cell: SimplexHandle, coords: &MeshCoords) -> Result<ElVec, FeError>;
}

/// Element Matrix for the H(div) mass bilinear form.
///
/// $M = [integral_T phi_j dot phi_i]_(i,j)$
pub struct HDivMassElmat<'a>(pub &'a HDivSpace);
impl ElMatProvider for HDivMassElmat<'_> {
  fn row_space(&self) -> &dyn DofMap {
    self.0
  }
  fn col_space(&self) -> &dyn DofMap {
    self.0
  }
  fn eval(&self, cell: SimplexHandle, coords: &MeshCoords) -> Result<ElMat, FeError> {
    let element = self.0.element(cell, coords)?;
    let qr = SimplexQuadRule::grundmann_moeller(self.0.dim(), 2 * self.0.poly_degree());

    let mut elmat = Matrix::zeros(element.nbasis(), element.nbasis());
    for (bary, weight) in qr.iter() {
      let values = element.eval(bary);
      elmat += weight * values.transpose() * values;
    }
    Ok(element.vol() * elmat)
  }
}

/// Element Matrix coupling flux divergence and potential.
///
/// $B = [integral_T div(phi_j) v_i]_(i,j)$, rows are potential, columns flux shape functions.
pub struct DivElmat<'a> {
  hdiv: &'a HDivSpace,
  l2: &'a L2Space,
}
impl<'a> DivElmat<'a> {
  pub fn new(hdiv: &'a HDivSpace, l2: &'a L2Space) -> Self {
    Self { hdiv, l2 }
  }
}
impl ElMatProvider for DivElmat<'_> {
  fn row_space(&self) -> &dyn DofMap {
    self.l2
  }
  fn col_space(&self) -> &dyn DofMap {
    self.hdiv
  }
  fn eval(&self, cell: SimplexHandle, coords: &MeshCoords) -> Result<ElMat, FeError> {
    let flux = self.hdiv.element(cell, coords)?;
    let potential = self.l2.element();
    let degree = self.hdiv.poly_degree() - 1 + self.l2.order();
    let qr = SimplexQuadRule::grundmann_moeller(self.hdiv.dim(), degree);

    let mut elmat = Matrix::zeros(potential.nbasis(), flux.nbasis());
    for (bary, weight) in qr.iter() {
      let div = flux.eval_div(bary);
      let v = potential.eval(bary);
      elmat += weight * v * div.transpose();
    }
    Ok(flux.vol() * elmat)
  }
}

/// Element Matrix for the L2 mass bilinear form of the potentials.
pub struct L2MassElmat<'a>(pub &'a L2Space);
impl ElMatProvider for L2MassElmat<'_> {
  fn row_space(&self) -> &dyn DofMap {
    self.0
  }
  fn col_space(&self) -> &dyn DofMap {
    self.0
  }
  fn eval(&self, cell: SimplexHandle, coords: &MeshCoords) -> Result<ElMat, FeError> {
    let simp = cell.coord_simplex(coords);
    let element = self.0.element();
    let qr = SimplexQuadRule::grundmann_moeller(self.0.dim(), 2 * self.0.order());

    let mut elmat = Matrix::zeros(element.nbasis(), element.nbasis());
    for (bary, weight) in qr.iter() {
      let v = element.eval(bary);
      elmat += weight * &v * v.transpose();
    }
    Ok(simp.vol() * elmat)
  }
}

/// Element Vector Provider for a scalar source function.
///
/// $F = [integral_T f v_i]_i$, computed with quadrature, exact for
/// source polynomials of degree at most 2.
pub struct SourceElvec<'a, F> {
  l2: &'a L2Space,
  source: F,
}
impl<'a, F> SourceElvec<'a, F>
where
  F: Fn(CoordRef) -> f64 + Sync,
{
  pub fn new(l2: &'a L2Space, source: F) -> Self {
    Self { l2, source }
  }
}
impl<F> ElVecProvider for SourceElvec<'_, F>
where
  F: Fn(CoordRef) -> f64 + Sync,
{
  fn space(&self) -> &dyn DofMap {
    self.l2
  }
  fn eval(&self, cell: SimplexHandle, coords: &MeshCoords) -> Result<ElVec, FeError> {
    let simp = cell.coord_simplex(coords);
    let element = self.l2.element();
    let qr = SimplexQuadRule::grundmann_moeller(self.l2.dim(), self.l2.order() + 2);

    let mut elvec = Vector::zeros(element.nbasis());
    for (bary, weight) in qr.iter() {
      let x = simp.bary2global(bary);
      elvec += weight * (self.source)(x.as_view()) * element.eval(bary);
    }
    Ok(simp.vol() * elvec)
  }
}
