use super::{simplex::SimplexCoords, BaryCoordRef};
use crate::Dim;

use common::{
  combo::{compositions, factorialf},
  linalg::nalgebra::{Matrix, Vector},
};

/// A quadrature rule on the reference simplex in barycentric coordinates.
///
/// The weights are relative to the volume and sum up to one.
#[derive(Debug, Clone)]
pub struct SimplexQuadRule {
  points: Matrix,
  weights: Vector,
}

impl SimplexQuadRule {
  /// Grundmann-Möller rule exact for polynomials of total degree `degree`.
  ///
  /// Has negative weights for `degree >= 3`.
  pub fn grundmann_moeller(dim: Dim, degree: usize) -> Self {
    let s = degree / 2;
    let d = 2 * s + 1;
    let n = dim;

    let mut points = Vec::new();
    let mut weights = Vec::new();
    for i in 0..=s {
      let denom = (d + n - 2 * i) as f64;
      let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
      let weight = sign * 0.25f64.powi(s as i32) * denom.powi(d as i32)
        / (factorialf(i) * factorialf(d + n - i))
        * factorialf(n);
      for beta in compositions(n + 1, s - i) {
        let point: Vec<f64> = beta.iter().map(|&b| (2 * b + 1) as f64 / denom).collect();
        points.push(Vector::from_vec(point));
        weights.push(weight);
      }
    }

    let mut weights = Vector::from_vec(weights);
    let total = weights.sum();
    weights /= total;
    let points = Matrix::from_columns(&points);
    Self { points, weights }
  }

  pub fn dim(&self) -> Dim {
    self.points.nrows() - 1
  }
  pub fn npoints(&self) -> usize {
    self.weights.len()
  }
  pub fn weights(&self) -> &Vector {
    &self.weights
  }

  pub fn iter(&self) -> impl Iterator<Item = (BaryCoordRef<'_>, f64)> + '_ {
    self
      .points
      .column_iter()
      .zip(self.weights.iter().copied())
  }

  pub fn integrate<F>(&self, f: F, simplex: &SimplexCoords) -> f64
  where
    F: Fn(BaryCoordRef) -> f64,
  {
    assert_eq!(simplex.dim_intrinsic(), self.dim());
    let sum: f64 = self.iter().map(|(p, w)| w * f(p)).sum();
    simplex.vol() * sum
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use common::combo::graded_multi_indices;

  use approx::assert_relative_eq;

  fn exact_monomial_integral(dim: Dim, alpha: &[usize]) -> f64 {
    let total: usize = alpha.iter().sum();
    let alpha_fact: f64 = alpha.iter().map(|&a| factorialf(a)).product();
    factorialf(dim) * alpha_fact / factorialf(dim + total)
  }

  #[test]
  fn exact_for_barycentric_monomials() {
    for dim in 0..=3 {
      let simplex = SimplexCoords::standard(dim);
      let scale = factorialf(dim);
      for degree in 0..=6 {
        let rule = SimplexQuadRule::grundmann_moeller(dim, degree);
        for alpha in graded_multi_indices(dim + 1, degree) {
          let f = |bary: BaryCoordRef| {
            alpha
              .iter()
              .zip(bary.iter())
              .map(|(&a, &l)| l.powi(a as i32))
              .product::<f64>()
          };
          let computed = rule.integrate(f, &simplex) * scale;
          let expected = exact_monomial_integral(dim, &alpha);
          assert_relative_eq!(computed, expected, epsilon = 1e-12);
        }
      }
    }
  }

  #[test]
  fn points_are_barycentric() {
    let rule = SimplexQuadRule::grundmann_moeller(3, 4);
    assert_relative_eq!(rule.weights().sum(), 1.0, epsilon = 1e-14);
    for (p, _) in rule.iter() {
      assert_relative_eq!(p.sum(), 1.0, epsilon = 1e-14);
      assert!(p.iter().all(|&l| l > 0.0));
    }
  }

  #[test]
  fn midpoint_rule() {
    let rule = SimplexQuadRule::grundmann_moeller(2, 1);
    assert_eq!(rule.npoints(), 1);
    let simplex = SimplexCoords::standard(2);
    let f = |bary: BaryCoordRef| 3.0 * bary[1] + bary[2];
    assert_relative_eq!(rule.integrate(f, &simplex), 4.0 / 6.0);
  }
}
