pub mod faer;
pub mod nalgebra;

use self::nalgebra::Matrix;

/// Asserts entry-wise equality of two dense matrices up to `eps`.
#[track_caller]
pub fn assert_mat_eq(a: &Matrix, b: &Matrix, eps: Option<f64>) {
  let eps = eps.unwrap_or(10e-12);
  assert_eq!(a.shape(), b.shape(), "Matrices must have same shape.");
  if a.is_empty() {
    return;
  }
  let diff = (a - b).abs().max();
  assert!(
    diff <= eps,
    "Matrices differ by {diff:e} > {eps:e}.\nleft:{a:.6}right:{b:.6}"
  );
}
