use super::{DofMap, HDivSpace, L2Space};
use crate::FeError;

use common::linalg::nalgebra::Vector;
use manifold::{geometry::coord::mesh::MeshCoords, topology::complex::Complex};

/// The product space $Sigma_h times V_h$ of fluxes and potentials.
///
/// Flux degrees of freedom come first, then the potential ones.
#[derive(Debug, Clone)]
pub struct MixedSpace {
  hdiv: HDivSpace,
  l2: L2Space,
}

impl MixedSpace {
  pub fn new(
    topology: &Complex,
    coords: &MeshCoords,
    hdiv_order: usize,
    l2_order: usize,
  ) -> Result<Self, FeError> {
    let hdiv = HDivSpace::new(topology, coords, hdiv_order)?;
    let l2 = L2Space::new(topology, l2_order)?;

    let space = Self { hdiv, l2 };
    if !space.is_stable_pair() {
      return Err(FeError::UnstablePair {
        hdiv_order,
        l2_order,
      });
    }
    Ok(space)
  }

  pub fn hdiv(&self) -> &HDivSpace {
    &self.hdiv
  }
  pub fn l2(&self) -> &L2Space {
    &self.l2
  }

  /// Whether the divergence of the fluxes covers the potential space.
  ///
  /// Otherwise the coupling $B^T$ has a kernel and the saddle point matrix
  /// is singular.
  pub fn is_stable_pair(&self) -> bool {
    self.l2.order() < self.hdiv.poly_degree()
  }

  pub fn ndofs(&self) -> usize {
    self.hdiv.ndofs() + self.l2.ndofs()
  }

  /// Splits a coefficient vector into flux and potential coefficients.
  pub fn split(&self, coeffs: &Vector) -> (Vector, Vector) {
    assert_eq!(coeffs.len(), self.ndofs());
    let nflux = self.hdiv.ndofs();
    let flux = coeffs.rows(0, nflux).into_owned();
    let potential = coeffs.rows(nflux, self.l2.ndofs()).into_owned();
    (flux, potential)
  }
}
