//! Mixed finite elements for the Poisson problem in flux form.
//!
//! $sigma = nabla u$, $div sigma = f$ discretized with H(div) conforming
//! fluxes and discontinuous potentials on simplicial meshes.

extern crate nalgebra as na;

pub mod assemble;
pub mod error;
pub mod fe;
pub mod function;
pub mod io;
pub mod operators;
pub mod poly;
pub mod post;
pub mod problems;

pub use error::{Error, FeError, SolveError};
