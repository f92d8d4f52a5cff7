//! Polynomials in barycentric coordinates.

use common::{
  combo::{compositions, factorialf},
  linalg::nalgebra::{Matrix, Vector},
};
use manifold::geometry::coord::BaryCoordRef;

/// The homogeneous barycentric monomials $lambda^alpha$, $|alpha| = "degree"$.
///
/// On a simplex these form a basis of all polynomials of total degree
/// at most `degree`, since $sum_i lambda_i = 1$.
#[derive(Debug, Clone)]
pub struct BaryMonomials {
  nvars: usize,
  degree: usize,
  exponents: Vec<Vec<usize>>,
}

impl BaryMonomials {
  pub fn new(nvars: usize, degree: usize) -> Self {
    let exponents = compositions(nvars, degree);
    Self {
      nvars,
      degree,
      exponents,
    }
  }

  pub fn len(&self) -> usize {
    self.exponents.len()
  }
  pub fn is_empty(&self) -> bool {
    self.exponents.is_empty()
  }
  pub fn index_of(&self, exponent: &[usize]) -> Option<usize> {
    self.exponents.iter().position(|e| e == exponent)
  }

  pub fn eval(&self, bary: BaryCoordRef) -> Vector {
    assert_eq!(bary.len(), self.nvars);
    Vector::from_iterator(
      self.len(),
      self.exponents.iter().map(|alpha| {
        alpha
          .iter()
          .zip(bary.iter())
          .map(|(&a, &l)| l.powi(a as i32))
          .product::<f64>()
      }),
    )
  }

  /// Partial derivatives w.r.t. the barycentric coordinates.
  ///
  /// Row `i` holds $partial_(lambda_i)$ of all monomials.
  pub fn eval_difs(&self, bary: BaryCoordRef) -> Matrix {
    assert_eq!(bary.len(), self.nvars);
    let mut difs = Matrix::zeros(self.nvars, self.len());
    for (imono, alpha) in self.exponents.iter().enumerate() {
      for ivar in 0..self.nvars {
        if alpha[ivar] == 0 {
          continue;
        }
        let mut value = alpha[ivar] as f64;
        for (jvar, (&a, &l)) in alpha.iter().zip(bary.iter()).enumerate() {
          let a = if jvar == ivar { a - 1 } else { a };
          value *= l.powi(a as i32);
        }
        difs[(ivar, imono)] = value;
      }
    }
    difs
  }

  /// Gradients w.r.t. the ambient coordinates in the columns.
  ///
  /// `difbarys` holds the gradients of the barycentric coordinates in the rows.
  pub fn eval_grads(&self, bary: BaryCoordRef, difbarys: &Matrix) -> Matrix {
    difbarys.transpose() * self.eval_difs(bary)
  }

  /// Coefficients of the constant one function, $1 = (sum_i lambda_i)^"degree"$.
  pub fn one(&self) -> Vector {
    let total = factorialf(self.degree);
    let coeffs = self.exponents.iter().map(|alpha| {
      let denom: f64 = alpha.iter().map(|&a| factorialf(a)).product();
      total / denom
    });
    Vector::from_iterator(self.len(), coeffs)
  }
}
