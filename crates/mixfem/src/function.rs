//! Discrete functions given by their coefficients in a finite element space.

use crate::{
  fe::{DofMap, HDivElement, HDivSpace, L2Space, MixedSpace},
  FeError,
};

use common::linalg::nalgebra::Vector;
use manifold::{
  geometry::coord::{mesh::MeshCoords, BaryCoordRef},
  topology::complex::handle::SimplexHandle,
};

#[derive(Debug, Clone)]
pub struct HDivFunction {
  pub space: HDivSpace,
  pub coeffs: Vector,
}
impl HDivFunction {
  pub fn new(space: HDivSpace, coeffs: Vector) -> Self {
    assert_eq!(coeffs.len(), space.ndofs(), "Coefficients do not match space.");
    Self { space, coeffs }
  }

  pub fn local_coeffs(&self, cell: SimplexHandle) -> Vector {
    let dofs = self.space.local2global(cell);
    Vector::from_iterator(dofs.len(), dofs.iter().map(|&idof| self.coeffs[idof]))
  }

  /// The flux vector at a point of `cell`, with the element already built.
  pub fn eval_local(&self, element: &HDivElement, local: &Vector, bary: BaryCoordRef) -> Vector {
    element.eval(bary) * local
  }
  pub fn eval(
    &self,
    cell: SimplexHandle,
    coords: &MeshCoords,
    bary: BaryCoordRef,
  ) -> Result<Vector, FeError> {
    let element = self.space.element(cell, coords)?;
    Ok(self.eval_local(&element, &self.local_coeffs(cell), bary))
  }
  pub fn eval_div(
    &self,
    cell: SimplexHandle,
    coords: &MeshCoords,
    bary: BaryCoordRef,
  ) -> Result<f64, FeError> {
    let element = self.space.element(cell, coords)?;
    Ok(element.eval_div(bary).dot(&self.local_coeffs(cell)))
  }
}

#[derive(Debug, Clone)]
pub struct L2Function {
  pub space: L2Space,
  pub coeffs: Vector,
}
impl L2Function {
  pub fn new(space: L2Space, coeffs: Vector) -> Self {
    assert_eq!(coeffs.len(), space.ndofs(), "Coefficients do not match space.");
    Self { space, coeffs }
  }

  pub fn local_coeffs(&self, cell: SimplexHandle) -> Vector {
    let dofs = self.space.local2global(cell);
    Vector::from_iterator(dofs.len(), dofs.iter().map(|&idof| self.coeffs[idof]))
  }

  pub fn eval(&self, cell: SimplexHandle, bary: BaryCoordRef) -> f64 {
    self.space.element().eval(bary).dot(&self.local_coeffs(cell))
  }
}

/// Flux and potential of a solved mixed problem.
#[derive(Debug, Clone)]
pub struct MixedSolution {
  pub flux: HDivFunction,
  pub potential: L2Function,
}
impl MixedSolution {
  pub fn from_galsol(space: &MixedSpace, galsol: &Vector) -> Self {
    let (flux, potential) = space.split(galsol);
    Self {
      flux: HDivFunction::new(space.hdiv().clone(), flux),
      potential: L2Function::new(space.l2().clone(), potential),
    }
  }

  pub fn ndofs(&self) -> usize {
    self.flux.coeffs.len() + self.potential.coeffs.len()
  }
  /// All coefficients, flux first.
  pub fn coeffs(&self) -> Vector {
    let mut coeffs = self.flux.coeffs.clone().resize_vertically(self.ndofs(), 0.0);
    coeffs
      .rows_mut(self.flux.coeffs.len(), self.potential.coeffs.len())
      .copy_from(&self.potential.coeffs);
    coeffs
  }
}
