//! Module for the Poisson Equation in mixed form.
//!
//! Find $(sigma, u) in Sigma_h times V_h$ s.t. for all $(tau, v)$
//! $integral sigma dot tau + div(sigma) v + div(tau) u = integral f v$.
//!
//! No boundary condition is imposed, the formulation implies the natural
//! condition $u = 0$ on the boundary.

use crate::{
  assemble::{self, GalMat, GalVec},
  fe::{DofMap, MixedSpace},
  function::MixedSolution,
  operators::{DivElmat, HDivMassElmat, SourceElvec},
  post, Error, FeError, SolveError,
};

use common::{
  linalg::{faer::FaerLu, nalgebra::Vector},
  sparse::SparseMatrix,
};
use manifold::{
  gen::cartesian::CartesianMeshInfo,
  geometry::coord::{mesh::MeshCoords, CoordRef},
  topology::complex::Complex,
  Dim, MeshError,
};

use tracing::info;

/// Parameters of a mixed Poisson run on the unit cube.
#[derive(Debug, Clone)]
pub struct MixedPoissonConfig {
  pub dim: Dim,
  /// Target element size.
  pub maxh: f64,
  pub hdiv_order: usize,
  pub l2_order: usize,
  /// Constant source $f$.
  pub source: f64,
}
impl Default for MixedPoissonConfig {
  fn default() -> Self {
    Self {
      dim: 3,
      maxh: 0.2,
      hdiv_order: 2,
      l2_order: 1,
      source: -1.0,
    }
  }
}
impl MixedPoissonConfig {
  pub fn build_mesh(&self) -> Result<(Complex, MeshCoords), MeshError> {
    CartesianMeshInfo::new_unit_maxh(self.dim, self.maxh)?.compute_coord_complex()
  }
}

/// Galerkin system $mat(M, B^T; B, 0) vec(sigma, u) = vec(0, F)$.
#[derive(Debug, Clone)]
pub struct MixedPoissonSystem {
  pub space: MixedSpace,
  pub galmat: GalMat,
  pub galvec: GalVec,
}

pub fn assemble_mixed_poisson<F>(
  topology: &Complex,
  coords: &MeshCoords,
  space: MixedSpace,
  source: F,
) -> Result<MixedPoissonSystem, FeError>
where
  F: Fn(CoordRef) -> f64 + Sync,
{
  let hdiv = space.hdiv();
  let l2 = space.l2();

  let mass = assemble::assemble_galmat(topology, coords, &HDivMassElmat(hdiv))?;
  let div = assemble::assemble_galmat(topology, coords, &DivElmat::new(hdiv, l2))?;
  let zero = SparseMatrix::zeros(l2.ndofs(), l2.ndofs());
  let galmat = SparseMatrix::block(&[&[&mass, &div.transpose()], &[&div, &zero]]);

  let source = assemble::assemble_galvec(topology, coords, &SourceElvec::new(l2, source))?;
  let mut galvec = Vector::zeros(space.ndofs());
  galvec.rows_mut(hdiv.ndofs(), l2.ndofs()).copy_from(&source);

  info!(
    ndofs = space.ndofs(),
    nflux = hdiv.ndofs(),
    npotential = l2.ndofs(),
    nnz = galmat.nnz(),
    "assembled mixed poisson system"
  );

  Ok(MixedPoissonSystem {
    space,
    galmat,
    galvec,
  })
}

/// Solves the Galerkin system with a sparse LU factorization.
pub fn solve_mixed_poisson(system: &MixedPoissonSystem) -> Result<MixedSolution, SolveError> {
  let nrows = system.galmat.nrows();
  let nrhs = system.galvec.len();
  if nrows != nrhs {
    return Err(SolveError::DimensionMismatch { nrows, nrhs });
  }

  let lu = FaerLu::new(system.galmat.to_nalgebra_csr())?;
  let galsol = lu.solve(&system.galvec);
  if !galsol.iter().all(|v| v.is_finite()) {
    return Err(SolveError::NonFinite);
  }
  info!(n = nrows, "solved mixed poisson system");

  Ok(MixedSolution::from_galsol(&system.space, &galsol))
}

/// Builds the spaces, assembles and solves.
pub fn solve_mixed_poisson_source<F>(
  topology: &Complex,
  coords: &MeshCoords,
  hdiv_order: usize,
  l2_order: usize,
  source: F,
) -> Result<MixedSolution, SolveError>
where
  F: Fn(CoordRef) -> f64 + Sync,
{
  let space = MixedSpace::new(topology, coords, hdiv_order, l2_order)?;
  let system = assemble_mixed_poisson(topology, coords, space, source)?;
  solve_mixed_poisson(&system)
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct MixedPoissonRun {
  pub topology: Complex,
  pub coords: MeshCoords,
  pub solution: MixedSolution,
  /// $integral_(partial Omega) sigma_h dot n$
  pub boundary_flux: f64,
  /// $integral_Omega f$
  pub source_integral: f64,
}

/// Mesh, solve and integrate the boundary flux as described by `config`.
pub fn run(config: &MixedPoissonConfig) -> Result<MixedPoissonRun, Error> {
  let (topology, coords) = config.build_mesh()?;
  info!(
    ncells = topology.ncells(),
    nvertices = coords.nvertices(),
    maxh = config.maxh,
    "generated mesh"
  );

  let source = config.source;
  let solution = solve_mixed_poisson_source(
    &topology,
    &coords,
    config.hdiv_order,
    config.l2_order,
    |_| source,
  )?;

  let boundary_flux = post::boundary_flux(&topology, &coords, &solution.flux)?;
  let source_integral = post::integrate_scalar(&topology, &coords, |_| source, 0);
  info!(boundary_flux, source_integral, "computed boundary flux");

  Ok(MixedPoissonRun {
    topology,
    coords,
    solution,
    boundary_flux,
    source_integral,
  })
}

#[cfg(test)]
mod test {
  use super::*;
  use common::linalg::{faer::FactorizationError, nalgebra::symmetry_defect};

  use approx::assert_relative_eq;

  #[test]
  fn default_config() {
    let config = MixedPoissonConfig::default();
    assert_eq!(config.dim, 3);
    assert_eq!(config.maxh, 0.2);
    assert_eq!((config.hdiv_order, config.l2_order), (2, 1));
    assert_eq!(config.source, -1.0);
  }

  #[test]
  fn system_is_symmetric_with_zero_block() {
    let (topology, coords) = CartesianMeshInfo::new_unit(2, 2)
      .compute_coord_complex()
      .unwrap();
    let space = MixedSpace::new(&topology, &coords, 1, 0).unwrap();
    let nflux = space.hdiv().ndofs();
    let system = assemble_mixed_poisson(&topology, &coords, space, |_| 1.0).unwrap();

    assert!(symmetry_defect(&system.galmat.to_nalgebra_csr()) < 1e-12);
    assert!(system
      .galmat
      .triplets()
      .iter()
      .all(|&(r, c, _)| r < nflux || c < nflux));
    assert!(system.galvec.rows(0, nflux).iter().all(|&v| v == 0.0));
  }

  #[test]
  fn mismatched_rhs() {
    let (topology, coords) = CartesianMeshInfo::new_unit(1, 2)
      .compute_coord_complex()
      .unwrap();
    let space = MixedSpace::new(&topology, &coords, 0, 0).unwrap();
    let mut system = assemble_mixed_poisson(&topology, &coords, space, |_| 1.0).unwrap();
    system.galvec = Vector::zeros(1);
    assert!(matches!(
      solve_mixed_poisson(&system),
      Err(SolveError::DimensionMismatch { nrhs: 1, .. })
    ));
  }

  #[test]
  fn unstable_pair_is_an_error() {
    let (topology, coords) = CartesianMeshInfo::new_unit(2, 3)
      .compute_coord_complex()
      .unwrap();
    assert!(matches!(
      solve_mixed_poisson_source(&topology, &coords, 0, 1, |_| -1.0),
      Err(SolveError::Fe(FeError::UnstablePair {
        hdiv_order: 0,
        l2_order: 1
      }))
    ));
  }

  #[test]
  fn nan_source_is_an_error() {
    let (topology, coords) = CartesianMeshInfo::new_unit(2, 2)
      .compute_coord_complex()
      .unwrap();
    assert!(matches!(
      solve_mixed_poisson_source(&topology, &coords, 0, 0, |_| f64::NAN),
      Err(SolveError::NonFinite)
    ));
  }

  #[test]
  fn rectangular_system_is_an_error() {
    let (topology, coords) = CartesianMeshInfo::new_unit(1, 2)
      .compute_coord_complex()
      .unwrap();
    let space = MixedSpace::new(&topology, &coords, 0, 0).unwrap();
    let mut system = assemble_mixed_poisson(&topology, &coords, space, |_| 1.0).unwrap();
    let n = system.galvec.len();
    system.galmat = SparseMatrix::new(n, n + 1, (0..n).map(|i| (i, i, 1.0)).collect());
    assert!(matches!(
      solve_mixed_poisson(&system),
      Err(SolveError::Factorization(FactorizationError::NotSquare { .. }))
    ));
  }

  #[test]
  fn singular_system_is_an_error() {
    let (topology, coords) = CartesianMeshInfo::new_unit(1, 2)
      .compute_coord_complex()
      .unwrap();
    let space = MixedSpace::new(&topology, &coords, 0, 0).unwrap();
    let mut system = assemble_mixed_poisson(&topology, &coords, space, |_| 1.0).unwrap();
    let n = system.galvec.len();
    let ones = (0..n).flat_map(|i| (0..n).map(move |j| (i, j, 1.0)));
    system.galmat = SparseMatrix::new(n, n, ones.collect());
    assert!(matches!(
      solve_mixed_poisson(&system),
      Err(SolveError::Factorization(_) | SolveError::NonFinite)
    ));
  }

  #[test]
  fn one_dimensional_exact() {
    // u'' = -1 with u(0) = u(1) = 0 has u = x(1-x)/2, sigma = 1/2 - x,
    // which lies in the BDM2 x P1 space.
    let (topology, coords) = CartesianMeshInfo::new_unit(1, 4)
      .compute_coord_complex()
      .unwrap();
    let solution = solve_mixed_poisson_source(&topology, &coords, 2, 1, |_| -1.0).unwrap();
    let error = post::l2_error_flux(&topology, &coords, &solution.flux, |x| {
      Vector::from_element(1, 0.5 - x[0])
    })
    .unwrap();
    assert!(error < 1e-10);
    assert_relative_eq!(
      post::boundary_flux(&topology, &coords, &solution.flux).unwrap(),
      -1.0,
      epsilon = 1e-10
    );
  }
}
