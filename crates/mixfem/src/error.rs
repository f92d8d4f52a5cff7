use manifold::{Dim, MeshError};

use common::linalg::faer::FactorizationError;

#[derive(Debug, thiserror::Error)]
pub enum FeError {
  #[error("H(div) elements of order {0} are not supported (orders 0, 1 and 2 are)")]
  UnsupportedOrder(usize),
  #[error("cell of dimension {cell} is embedded in {ambient} dimensions, need a flat mesh")]
  DimensionMismatch { cell: Dim, ambient: Dim },
  #[error("cell {0} is degenerate")]
  DegenerateCell(usize),
  #[error("mesh has dimension {0}, only 1, 2 and 3 are supported")]
  UnsupportedDim(Dim),
  #[error("H(div) order {hdiv_order} with L2 order {l2_order} is not an inf-sup stable pair")]
  UnstablePair { hdiv_order: usize, l2_order: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum SolveError {
  #[error(transparent)]
  Fe(#[from] FeError),
  #[error(transparent)]
  Factorization(#[from] FactorizationError),
  #[error("system matrix has {nrows} rows but right-hand side has {nrhs} entries")]
  DimensionMismatch { nrows: usize, nrhs: usize },
  #[error("solution contains non-finite values")]
  NonFinite,
}

/// Any failure of the mixed Poisson pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error(transparent)]
  Mesh(#[from] MeshError),
  #[error(transparent)]
  Fe(#[from] FeError),
  #[error(transparent)]
  Solve(#[from] SolveError),
  #[error(transparent)]
  Export(#[from] crate::io::ExportError),
}
