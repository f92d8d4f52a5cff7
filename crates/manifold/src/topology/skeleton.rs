use super::simplex::Simplex;
use crate::Dim;

use indexmap::IndexSet;

/// A container for simplices of the same dimension.
#[derive(Default, Debug, Clone)]
pub struct Skeleton {
  simplices: IndexSet<Simplex>,
}
impl Skeleton {
  pub fn new(simplices: Vec<Simplex>) -> Self {
    assert!(!simplices.is_empty(), "Skeleton must not be empty.");
    let dim = simplices[0].dim();
    assert!(
      simplices.iter().all(|simp| simp.dim() == dim),
      "Skeleton simplices must have same dimension."
    );
    let simplices = IndexSet::from_iter(simplices);
    Self { simplices }
  }
  pub fn standard(dim: Dim) -> Self {
    Self::new(vec![Simplex::standard(dim)])
  }

  pub fn len(&self) -> usize {
    self.simplices.len()
  }
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
  pub fn dim(&self) -> Dim {
    self.simplices[0].dim()
  }
  pub fn iter(&self) -> indexmap::set::Iter<'_, Simplex> {
    self.simplices.iter()
  }
}

impl IntoIterator for Skeleton {
  type Item = Simplex;
  type IntoIter = indexmap::set::IntoIter<Self::Item>;
  fn into_iter(self) -> Self::IntoIter {
    self.simplices.into_iter()
  }
}
