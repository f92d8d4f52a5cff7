//! Combinatorics used for simplices, lattices and polynomial bases.

pub fn factorial(n: usize) -> usize {
  (1..=n).product()
}
pub fn factorialf(n: usize) -> f64 {
  (1..=n).map(|i| i as f64).product()
}

pub fn binomial(n: usize, k: usize) -> usize {
  if k > n {
    return 0;
  }
  let k = k.min(n - k);
  (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

/// All weak compositions of `total` into `nparts` parts.
///
/// These are the multi-indices $alpha in NN^n$ with $|alpha| = "total"$,
/// ordered lexicographically descending, e.g. for `(3, 1)`:
/// `[1,0,0], [0,1,0], [0,0,1]`.
pub fn compositions(nparts: usize, total: usize) -> Vec<Vec<usize>> {
  if nparts == 0 {
    return if total == 0 { vec![Vec::new()] } else { Vec::new() };
  }
  let mut result = Vec::new();
  for first in (0..=total).rev() {
    for mut rest in compositions(nparts - 1, total - first) {
      rest.insert(0, first);
      result.push(rest);
    }
  }
  result
}

/// All multi-indices $alpha in NN^n$ with $|alpha| <= "degree"$, graded by total degree.
pub fn graded_multi_indices(n: usize, degree: usize) -> Vec<Vec<usize>> {
  (0..=degree).flat_map(|d| compositions(n, d)).collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
  #[default]
  Pos,
  Neg,
}
impl Sign {
  /// `None` for zero and NaN.
  pub fn from_f64(f: f64) -> Option<Self> {
    if f > 0.0 {
      Some(Self::Pos)
    } else if f < 0.0 {
      Some(Self::Neg)
    } else {
      None
    }
  }
  pub fn from_parity(n: usize) -> Self {
    if n % 2 == 0 {
      Self::Pos
    } else {
      Self::Neg
    }
  }
  pub fn as_f64(self) -> f64 {
    match self {
      Self::Pos => 1.0,
      Self::Neg => -1.0,
    }
  }
}
impl std::ops::Neg for Sign {
  type Output = Self;
  fn neg(self) -> Self::Output {
    match self {
      Self::Pos => Self::Neg,
      Self::Neg => Self::Pos,
    }
  }
}
