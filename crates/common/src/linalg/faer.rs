use std::panic::{self, AssertUnwindSafe};

use faer::linalg::solvers::Solve;

use super::nalgebra::{CsrMatrix, Vector};

type SparseMatrixFaer = faer::sparse::SparseRowMat<usize, f64>;

#[derive(Debug, thiserror::Error)]
pub enum FactorizationError {
  #[error("cannot factorize non-square {nrows}x{ncols} matrix")]
  NotSquare { nrows: usize, ncols: usize },
  #[error("sparse LU factorization failed: {0}")]
  Lu(String),
  #[error("sparse LU factorization hit a zero pivot, matrix is singular")]
  ZeroPivot,
}

pub fn nalgebra2faer(m: CsrMatrix) -> SparseMatrixFaer {
  let nrows = m.nrows();
  let ncols = m.ncols();
  let (row_offsets, col_indices, values) = m.disassemble();

  let symbolic =
    faer::sparse::SymbolicSparseRowMat::new_checked(nrows, ncols, row_offsets, None, col_indices);
  faer::sparse::SparseRowMat::new(symbolic, values)
}

/// Sparse LU factorization with partial pivoting.
///
/// Suited for the indefinite saddle point systems of mixed formulations.
pub struct FaerLu {
  raw: faer::sparse::linalg::solvers::Lu<usize, f64>,
  n: usize,
}
impl FaerLu {
  pub fn new(a: CsrMatrix) -> Result<Self, FactorizationError> {
    let (nrows, ncols) = (a.nrows(), a.ncols());
    if nrows != ncols {
      return Err(FactorizationError::NotSquare { nrows, ncols });
    }
    let a = nalgebra2faer(a);
    // faer panics instead of erroring on a numerically zero pivot.
    let raw = panic::catch_unwind(AssertUnwindSafe(|| a.sp_lu()))
      .map_err(|_| FactorizationError::ZeroPivot)?
      .map_err(|err| FactorizationError::Lu(format!("{err:?}")))?;
    Ok(Self { raw, n: nrows })
  }

  pub fn solve(&self, b: &Vector) -> Vector {
    assert_eq!(b.len(), self.n, "Right-hand side has wrong length.");
    let b = faer::Col::from_fn(b.nrows(), |i| b[i]);
    let x = self.raw.solve(b);
    Vector::from_iterator(x.nrows(), x.iter().copied())
  }
}
