use super::{DofIdx, DofMap};
use crate::{poly::BaryMonomials, FeError};

use common::{combo::binomial, linalg::nalgebra::Vector};
use manifold::{
  geometry::coord::BaryCoordRef,
  topology::complex::{handle::SimplexHandle, Complex},
  Dim,
};

/// Discontinuous piecewise polynomials of total degree `order`.
///
/// The local shape functions are the homogeneous barycentric monomials,
/// so the space needs no geometry.
#[derive(Debug, Clone)]
pub struct L2Space {
  order: usize,
  dim: Dim,
  ncells: usize,
}

impl L2Space {
  pub fn new(topology: &Complex, order: usize) -> Result<Self, FeError> {
    let dim = topology.dim();
    if !(1..=3).contains(&dim) {
      return Err(FeError::UnsupportedDim(dim));
    }
    Ok(Self {
      order,
      dim,
      ncells: topology.ncells(),
    })
  }

  pub fn order(&self) -> usize {
    self.order
  }
  pub fn dim(&self) -> Dim {
    self.dim
  }

  pub fn element(&self) -> L2Element {
    L2Element::new(self.dim, self.order)
  }
}

impl DofMap for L2Space {
  fn ndofs(&self) -> usize {
    self.ncells * self.ndofs_local()
  }
  fn ndofs_local(&self) -> usize {
    binomial(self.dim + self.order, self.order)
  }
  fn local2global(&self, cell: SimplexHandle) -> Vec<DofIdx> {
    let nlocal = self.ndofs_local();
    let offset = cell.kidx() * nlocal;
    (offset..offset + nlocal).collect()
  }
}

#[derive(Debug, Clone)]
pub struct L2Element {
  monomials: BaryMonomials,
}
impl L2Element {
  pub fn new(dim: Dim, order: usize) -> Self {
    let monomials = BaryMonomials::new(dim + 1, order);
    Self { monomials }
  }
  pub fn nbasis(&self) -> usize {
    self.monomials.len()
  }
  /// Values of all shape functions.
  pub fn eval(&self, bary: BaryCoordRef) -> Vector {
    self.monomials.eval(bary)
  }
  /// Local coefficients of the constant one function.
  pub fn one(&self) -> Vector {
    self.monomials.one()
  }
}
