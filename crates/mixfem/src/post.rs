//! Post-processing of mixed solutions: integrals, norms and errors.

use crate::{
  function::{HDivFunction, L2Function},
  FeError,
};

use common::linalg::nalgebra::Vector;
use manifold::{
  geometry::coord::{
    mesh::MeshCoords,
    quadrature::SimplexQuadRule,
    simplex::{facet_bary_to_cell_bary, SimplexHandleExt},
    CoordRef,
  },
  topology::complex::Complex,
};

use rayon::prelude::*;

/// $integral_(partial Omega) sigma dot n ds$ with the outward unit normal.
pub fn boundary_flux(
  topology: &Complex,
  coords: &MeshCoords,
  flux: &HDivFunction,
) -> Result<f64, FeError> {
  let dim = topology.dim();
  let facet_qr = SimplexQuadRule::grundmann_moeller(dim - 1, flux.space.poly_degree());

  let boundary = topology.boundary_facets();
  let fluxes = boundary
    .par_iter()
    .map(|facet| {
      let cell = facet
        .cocells()
        .next()
        .expect("Boundary facet has a cell.");
      let ifacet = cell
        .simplex()
        .opposite_vertex(facet.simplex())
        .expect("Facet is part of its cocell.");

      let element = flux.space.element(cell, coords)?;
      let local = flux.local_coeffs(cell);
      let normal = element.outward_normal(ifacet);
      let facet_coords = facet.coord_simplex(coords);

      Ok(facet_qr.integrate(
        |facet_bary| {
          let bary = facet_bary_to_cell_bary(ifacet, facet_bary);
          normal.dot(&flux.eval_local(&element, &local, bary.as_view()))
        },
        &facet_coords,
      ))
    })
    .collect::<Result<Vec<f64>, FeError>>()?;

  Ok(fluxes.into_iter().sum())
}

/// $integral_Omega f dx$ with a quadrature rule of degree `degree` per cell.
pub fn integrate_scalar<F>(topology: &Complex, coords: &MeshCoords, f: F, degree: usize) -> f64
where
  F: Fn(CoordRef) -> f64 + Sync,
{
  let qr = SimplexQuadRule::grundmann_moeller(topology.dim(), degree);
  let cells = topology.cells();
  (0..cells.len())
    .into_par_iter()
    .map(|icell| {
      let simp = cells.get_by_kidx(icell).coord_simplex(coords);
      qr.integrate(|bary| f(simp.bary2global(bary).as_view()), &simp)
    })
    .collect::<Vec<_>>()
    .into_iter()
    .sum()
}

/// $norm(u_h - u)_(L^2(Omega))$, pass `|_| 0.0` for the norm of $u_h$.
pub fn l2_error_potential<F>(
  topology: &Complex,
  coords: &MeshCoords,
  potential: &L2Function,
  exact: F,
) -> f64
where
  F: Fn(CoordRef) -> f64 + Sync,
{
  let qr = SimplexQuadRule::grundmann_moeller(topology.dim(), 2 * potential.space.order() + 4);
  let element = potential.space.element();
  let cells = topology.cells();
  let error_sqr: f64 = (0..cells.len())
    .into_par_iter()
    .map(|icell| {
      let cell = cells.get_by_kidx(icell);
      let simp = cell.coord_simplex(coords);
      let local = potential.local_coeffs(cell);
      qr.integrate(
        |bary| {
          let uh = element.eval(bary).dot(&local);
          let u = exact(simp.bary2global(bary).as_view());
          (uh - u).powi(2)
        },
        &simp,
      )
    })
    .collect::<Vec<_>>()
    .into_iter()
    .sum();
  error_sqr.sqrt()
}

/// $norm(sigma_h - sigma)_(L^2(Omega))$.
pub fn l2_error_flux<F>(
  topology: &Complex,
  coords: &MeshCoords,
  flux: &HDivFunction,
  exact: F,
) -> Result<f64, FeError>
where
  F: Fn(CoordRef) -> Vector + Sync,
{
  let qr = SimplexQuadRule::grundmann_moeller(topology.dim(), 2 * flux.space.poly_degree() + 4);
  let cells = topology.cells();
  let errors_sqr = (0..cells.len())
    .into_par_iter()
    .map(|icell| {
      let cell = cells.get_by_kidx(icell);
      let simp = cell.coord_simplex(coords);
      let element = flux.space.element(cell, coords)?;
      let local = flux.local_coeffs(cell);
      Ok(qr.integrate(
        |bary| {
          let sigmah = flux.eval_local(&element, &local, bary);
          let sigma = exact(simp.bary2global(bary).as_view());
          (sigmah - sigma).norm_squared()
        },
        &simp,
      ))
    })
    .collect::<Result<Vec<f64>, FeError>>()?;
  Ok(errors_sqr.into_iter().sum::<f64>().sqrt())
}

/// $norm(div sigma_h - f)_(L^2(Omega))$, vanishes for stable pairs and
/// sources in the potential space.
pub fn l2_error_div<F>(
  topology: &Complex,
  coords: &MeshCoords,
  flux: &HDivFunction,
  exact: F,
) -> Result<f64, FeError>
where
  F: Fn(CoordRef) -> f64 + Sync,
{
  let qr = SimplexQuadRule::grundmann_moeller(topology.dim(), 2 * flux.space.poly_degree() + 2);
  let cells = topology.cells();
  let errors_sqr = (0..cells.len())
    .into_par_iter()
    .map(|icell| {
      let cell = cells.get_by_kidx(icell);
      let simp = cell.coord_simplex(coords);
      let element = flux.space.element(cell, coords)?;
      let local = flux.local_coeffs(cell);
      Ok(qr.integrate(
        |bary| {
          let divh = element.eval_div(bary).dot(&local);
          let div = exact(simp.bary2global(bary).as_view());
          (divh - div).powi(2)
        },
        &simp,
      ))
    })
    .collect::<Result<Vec<f64>, FeError>>()?;
  Ok(errors_sqr.into_iter().sum::<f64>().sqrt())
}
