use super::{Complex, ComplexSkeleton, SimplexData};
use crate::{topology::simplex::Simplex, Dim};

pub type KSimplexIdx = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimplexIdx {
  pub dim: Dim,
  pub kidx: KSimplexIdx,
}
impl SimplexIdx {
  pub fn new(dim: Dim, kidx: KSimplexIdx) -> Self {
    Self { dim, kidx }
  }
  pub fn is_valid(self, complex: &Complex) -> bool {
    self.dim <= complex.dim() && self.kidx < complex.nsimplicies(self.dim)
  }
  pub fn handle(self, complex: &Complex) -> SimplexHandle {
    SimplexHandle::new(complex, self)
  }
}

/// Fat pointer to a simplex of a complex.
#[derive(Copy, Clone)]
pub struct SimplexHandle<'c> {
  complex: &'c Complex,
  idx: SimplexIdx,
}
impl std::fmt::Debug for SimplexHandle<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SimplexHandle")
      .field("idx", &self.idx)
      .field("simplex", self.simplex())
      .finish()
  }
}

impl<'c> SimplexHandle<'c> {
  pub fn new(complex: &'c Complex, idx: SimplexIdx) -> Self {
    assert!(idx.is_valid(complex), "Not a valid simplex index.");
    Self { complex, idx }
  }

  pub fn idx(&self) -> SimplexIdx {
    self.idx
  }
  pub fn dim(&self) -> Dim {
    self.idx.dim
  }
  pub fn kidx(&self) -> KSimplexIdx {
    self.idx.kidx
  }
  pub fn complex(&self) -> &'c Complex {
    self.complex
  }

  fn entry(&self) -> (&'c Simplex, &'c SimplexData) {
    self
      .complex
      .raw_skeleton(self.dim())
      .get_index(self.kidx())
      .expect("Handle index is valid.")
  }
  pub fn simplex(&self) -> &'c Simplex {
    self.entry().0
  }
  pub fn nvertices(&self) -> usize {
    self.simplex().nvertices()
  }

  pub fn cocells(&self) -> impl ExactSizeIterator<Item = SimplexHandle<'c>> + 'c {
    let complex = self.complex;
    let dim = complex.dim();
    self
      .entry()
      .1
      .cocells
      .iter()
      .map(move |&icell| SimplexIdx::new(dim, icell).handle(complex))
  }

  /// Whether this facet lies on the boundary of the mesh.
  pub fn is_boundary(&self) -> bool {
    self.dim() + 1 == self.complex.dim() && self.entry().1.cocells.len() == 1
  }

  /// The dim-subsimplicies of this simplex.
  ///
  /// These are ordered lexicographically w.r.t. the local vertex indices.
  pub fn subsimps(&self, dim_sub: Dim) -> impl Iterator<Item = SimplexHandle<'c>> + 'c {
    let complex = self.complex;
    self
      .simplex()
      .subsimps(dim_sub)
      .map(move |sub| complex.skeleton(dim_sub).get_by_simplex(&sub))
  }

  /// The facet of this cell opposite to local vertex `ivertex`.
  pub fn opposite_facet(&self, ivertex: usize) -> SimplexHandle<'c> {
    let facet = self.simplex().opposite_facet(ivertex);
    self.complex.skeleton(self.dim() - 1).get_by_simplex(&facet)
  }
}

impl PartialEq for SimplexHandle<'_> {
  fn eq(&self, other: &Self) -> bool {
    std::ptr::eq(self.complex, other.complex) && self.idx == other.idx
  }
}
impl Eq for SimplexHandle<'_> {}

pub struct SkeletonHandle<'c> {
  complex: &'c Complex,
  dim: Dim,
}

impl<'c> SkeletonHandle<'c> {
  pub fn new(complex: &'c Complex, dim: Dim) -> Self {
    assert!(dim <= complex.dim(), "Skeleton dimension exceeds complex.");
    Self { complex, dim }
  }

  pub fn dim(&self) -> Dim {
    self.dim
  }
  pub fn raw(&self) -> &'c ComplexSkeleton {
    self.complex.raw_skeleton(self.dim)
  }
  pub fn len(&self) -> usize {
    self.raw().len()
  }
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn get_by_kidx(&self, kidx: KSimplexIdx) -> SimplexHandle<'c> {
    SimplexIdx::new(self.dim, kidx).handle(self.complex)
  }
  pub fn try_get_by_simplex(&self, key: &Simplex) -> Option<SimplexHandle<'c>> {
    let kidx = self.raw().get_index_of(key)?;
    Some(self.get_by_kidx(kidx))
  }
  /// Panics if the simplex is not part of the complex.
  pub fn get_by_simplex(&self, key: &Simplex) -> SimplexHandle<'c> {
    self
      .try_get_by_simplex(key)
      .expect("Simplex must be part of the complex.")
  }

  pub fn handle_iter(&self) -> impl ExactSizeIterator<Item = SimplexHandle<'c>> + 'c {
    let complex = self.complex;
    let dim = self.dim;
    (0..self.len()).map(move |kidx| SimplexIdx::new(dim, kidx).handle(complex))
  }
  pub fn simplex_iter(&self) -> impl ExactSizeIterator<Item = &'c Simplex> + 'c {
    self.raw().keys()
  }
}
