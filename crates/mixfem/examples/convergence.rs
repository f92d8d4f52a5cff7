//! Solves a manufactored mixed poisson problem in d dimensions
//! and determines the algebraic convergence rates of potential and flux.

extern crate nalgebra as na;

use common::util::algebraic_convergence_rate;
use manifold::gen::cartesian::CartesianMeshInfo;
use mixfem::{post, problems::mixed_poisson};

use std::f64::consts::PI;

fn main() -> Result<(), mixfem::Error> {
  tracing_subscriber::fmt::init();

  let (hdiv_order, l2_order) = (2, 1);
  for dim in 1_usize..=3 {
    println!("Solving mixed Poisson in {dim}d.");
    let nrefinements = 12 / (2 * dim);

    // $u = prod_i sin(pi x_i)$, $sigma = nabla u$, $f = div sigma = -d pi^2 u$
    let u = |x: na::DVectorView<f64>| x.iter().map(|&xi| (PI * xi).sin()).product::<f64>();
    let sigma = |x: na::DVectorView<f64>| {
      na::DVector::from_fn(x.len(), |i, _| {
        x.iter()
          .enumerate()
          .map(|(j, &xj)| {
            if i == j {
              PI * (PI * xj).cos()
            } else {
              (PI * xj).sin()
            }
          })
          .product::<f64>()
      })
    };
    let f = |x: na::DVectorView<f64>| -(dim as f64) * PI * PI * u(x);

    print_seperator();
    println!(
      "| {:>2} | {:>10} | {:>10} | {:>9} | {:>5} | {:>9} | {:>5} |",
      "k", "mesh width", "regularity", "u error", "rate", "σ error", "rate"
    );
    print_seperator();

    let mut prev: Option<(f64, f64)> = None;
    for refinement in 0..nrefinements {
      let ncells_axis = 2usize.pow(refinement as u32 + 1);
      let (topology, coords) = CartesianMeshInfo::new_unit(dim, ncells_axis).compute_coord_complex()?;

      let solution =
        mixed_poisson::solve_mixed_poisson_source(&topology, &coords, hdiv_order, l2_order, f)?;

      let u_error = post::l2_error_potential(&topology, &coords, &solution.potential, u);
      let sigma_error = post::l2_error_flux(&topology, &coords, &solution.flux, sigma)?;
      let (u_rate, sigma_rate) = match prev {
        Some((u_prev, sigma_prev)) => (
          algebraic_convergence_rate(u_error, u_prev),
          algebraic_convergence_rate(sigma_error, sigma_prev),
        ),
        None => (f64::INFINITY, f64::INFINITY),
      };
      prev = Some((u_error, sigma_error));

      let mesh_width = coords.mesh_width_max(&topology);
      let shape_regularity = coords.shape_regularity(&topology);
      println!(
        "| {:>2} | {:>10.3e} | {:>10.3e} | {:>9.3e} | {:>5.2} | {:>9.3e} | {:>5.2} |",
        refinement, mesh_width, shape_regularity, u_error, u_rate, sigma_error, sigma_rate
      );
    }
    print_seperator();
  }

  Ok(())
}

fn print_seperator() {
  let nchar = 74;
  println!("{}", "-".repeat(nchar));
}
