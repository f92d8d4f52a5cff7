pub type Vector<T = f64> = na::DVector<T>;
pub type RowVector<T = f64> = na::RowDVector<T>;
pub type Matrix<T = f64> = na::DMatrix<T>;

pub type VectorView<'a, T = f64> = na::DVectorView<'a, T>;

pub type CooMatrix = nas::CooMatrix<f64>;
pub type CsrMatrix = nas::CsrMatrix<f64>;

/// Largest absolute entry of $A - A^T$.
pub fn symmetry_defect(mat: &CsrMatrix) -> f64 {
  assert_eq!(mat.nrows(), mat.ncols(), "Matrix must be square.");
  let diff = mat - &mat.transpose();
  diff.values().iter().fold(0.0, |max, v| max.max(v.abs()))
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn symmetric_csr() {
    let mut coo = CooMatrix::new(2, 2);
    coo.push(0, 1, 2.0);
    coo.push(1, 0, 2.0);
    coo.push(1, 1, 1.0);
    let csr = CsrMatrix::from(&coo);
    assert_eq!(symmetry_defect(&csr), 0.0);

    coo.push(0, 1, 0.5);
    let csr = CsrMatrix::from(&coo);
    assert_eq!(symmetry_defect(&csr), 0.5);
  }
}
