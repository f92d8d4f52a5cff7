//! Mixed Poisson problem with constant source on the unit cube.
//!
//! Solves $sigma = nabla u$, $div sigma = -1$ with BDM2 fluxes and
//! discontinuous P1 potentials, writes the solution as VTK and checks
//! the boundary flux against the divergence theorem.

use mixfem::{io::write_mixed_solution_vtk, problems::mixed_poisson};

fn main() -> Result<(), mixfem::Error> {
  tracing_subscriber::fmt::init();

  let config = mixed_poisson::MixedPoissonConfig::default();
  println!(
    "Solving mixed Poisson in {}d with maxh={}, H(div) order {}, L2 order {}.",
    config.dim, config.maxh, config.hdiv_order, config.l2_order
  );

  let run = mixed_poisson::run(&config)?;
  write_mixed_solution_vtk(
    "out/mixed_poisson.vtk",
    &run.topology,
    &run.coords,
    &run.solution,
  )?;

  println!("ncells={}", run.topology.ncells());
  println!("ndofs={}", run.solution.ndofs());
  println!("boundary flux = {:.12}", run.boundary_flux);
  println!("source integral = {:.12}", run.source_integral);
  println!(
    "defect = {:.3e}",
    (run.boundary_flux - run.source_integral).abs()
  );

  Ok(())
}
