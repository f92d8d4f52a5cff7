use crate::{
  linalg::nalgebra::{CooMatrix, CsrMatrix, Matrix},
  util::{CumsumExt, IterAllEqExt},
};

/// Sparse matrix in triplet form, used as assembly target.
///
/// Duplicate entries are summed up on conversion.
#[derive(Default, Debug, Clone)]
pub struct SparseMatrix {
  nrows: usize,
  ncols: usize,
  triplets: Vec<(usize, usize, f64)>,
}

impl SparseMatrix {
  pub fn zeros(nrows: usize, ncols: usize) -> Self {
    Self::new(nrows, ncols, Vec::new())
  }
  pub fn new(nrows: usize, ncols: usize, triplets: Vec<(usize, usize, f64)>) -> Self {
    assert!(
      triplets.iter().all(|&(r, c, _)| r < nrows && c < ncols),
      "Triplet out of bounds."
    );
    Self {
      nrows,
      ncols,
      triplets,
    }
  }

  pub fn nrows(&self) -> usize {
    self.nrows
  }
  pub fn ncols(&self) -> usize {
    self.ncols
  }
  pub fn nnz(&self) -> usize {
    self.triplets.len()
  }
  pub fn triplets(&self) -> &[(usize, usize, f64)] {
    &self.triplets
  }

  pub fn push(&mut self, r: usize, c: usize, v: f64) {
    assert!(r < self.nrows && c < self.ncols, "Entry out of bounds.");
    if v != 0.0 {
      self.triplets.push((r, c, v));
    }
  }

  pub fn transpose(&self) -> Self {
    let triplets = self.triplets.iter().map(|&(r, c, v)| (c, r, v)).collect();
    Self::new(self.ncols, self.nrows, triplets)
  }

  /// Concatenates a block grid row-wise and column-wise, automatically computing offsets.
  pub fn block(block_grid: &[&[&Self]]) -> Self {
    block_grid
      .iter()
      .map(|row| row.len())
      .all_eq()
      .expect("Each block row must contain the same number of matrices.");

    let mut row_offsets: Vec<usize> = block_grid
      .iter()
      .map(|row| {
        let nrows = row.first().map_or(0, |m| m.nrows());
        assert!(
          row.iter().all(|m| nrows == m.nrows()),
          "Blocks of a row must have same number of rows."
        );
        nrows
      })
      .cumsum()
      .collect();
    let nrows_total = row_offsets.pop().unwrap_or(0);
    row_offsets.insert(0, 0);

    let mut col_offsets: Vec<usize> = block_grid
      .iter()
      .map(|row| row.iter().map(|mat| mat.ncols()).cumsum().collect::<Vec<_>>())
      .all_eq()
      .expect("Blocks of a column must have same number of columns.");
    let ncols_total = col_offsets.pop().unwrap_or(0);
    col_offsets.insert(0, 0);

    let mut result = Self::zeros(nrows_total, ncols_total);
    for (row, row_offset) in block_grid.iter().zip(&row_offsets) {
      for (block, col_offset) in row.iter().zip(&col_offsets) {
        for &(r, c, v) in block.triplets() {
          result.push(row_offset + r, col_offset + c, v);
        }
      }
    }
    result
  }

  pub fn to_nalgebra_coo(&self) -> CooMatrix {
    let rows = self.triplets.iter().map(|t| t.0).collect();
    let cols = self.triplets.iter().map(|t| t.1).collect();
    let vals = self.triplets.iter().map(|t| t.2).collect();
    CooMatrix::try_from_triplets(self.nrows, self.ncols, rows, cols, vals)
      .expect("Triplets are in bounds by construction.")
  }

  pub fn to_nalgebra_csr(&self) -> CsrMatrix {
    (&self.to_nalgebra_coo()).into()
  }

  pub fn to_nalgebra_dense(&self) -> Matrix {
    (&self.to_nalgebra_coo()).into()
  }
}
