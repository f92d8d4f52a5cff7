use super::VertexIdx;
use crate::Dim;

use common::combo::binomial;
use itertools::Itertools;

/// A simplex as a set of vertex indices, stored in increasing order.
///
/// The increasing order is the global orientation convention of the mesh.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Simplex {
  vertices: Vec<VertexIdx>,
}
impl Simplex {
  pub fn new(mut vertices: Vec<VertexIdx>) -> Self {
    vertices.sort_unstable();
    assert!(
      vertices.windows(2).all(|w| w[0] < w[1]),
      "Simplex vertices must be distinct."
    );
    Self { vertices }
  }
  pub fn standard(dim: Dim) -> Self {
    Self::new((0..=dim).collect())
  }

  pub fn vertices(&self) -> &[VertexIdx] {
    &self.vertices
  }
  pub fn nvertices(&self) -> usize {
    self.vertices.len()
  }
  pub fn dim(&self) -> Dim {
    self.nvertices() - 1
  }
  pub fn iter(&self) -> impl ExactSizeIterator<Item = VertexIdx> + '_ {
    self.vertices.iter().copied()
  }

  /// The `dim_sub`-subsimplicies of this simplex.
  ///
  /// Ordered lexicographically w.r.t. the local vertex indices,
  /// e.g. tet.subsimps(1) = [(0,1),(0,2),(0,3),(1,2),(1,3),(2,3)]
  pub fn subsimps(&self, dim_sub: Dim) -> impl Iterator<Item = Simplex> + '_ {
    self
      .iter()
      .combinations(dim_sub + 1)
      .map(|vertices| Self { vertices })
  }

  /// The facet not containing the local vertex `ivertex`.
  pub fn opposite_facet(&self, ivertex: usize) -> Simplex {
    let mut vertices = self.vertices.clone();
    vertices.remove(ivertex);
    Self { vertices }
  }

  /// The local index of the one vertex that is not part of `facet`.
  pub fn opposite_vertex(&self, facet: &Simplex) -> Option<usize> {
    if facet.nvertices() + 1 != self.nvertices() || !facet.is_subsimp_of(self) {
      return None;
    }
    self.iter().position(|v| !facet.contains(v))
  }

  pub fn contains(&self, vertex: VertexIdx) -> bool {
    self.vertices.binary_search(&vertex).is_ok()
  }
  pub fn is_subsimp_of(&self, other: &Self) -> bool {
    self.iter().all(|v| other.contains(v))
  }
}
impl From<Vec<VertexIdx>> for Simplex {
  fn from(vertices: Vec<VertexIdx>) -> Self {
    Self::new(vertices)
  }
}
impl<const N: usize> From<[VertexIdx; N]> for Simplex {
  fn from(vertices: [VertexIdx; N]) -> Self {
    Self::new(vertices.to_vec())
  }
}

pub fn nsubsimplicies(dim_cell: Dim, dim_sub: Dim) -> usize {
  binomial(dim_cell + 1, dim_sub + 1)
}
pub fn nedges(dim_cell: Dim) -> usize {
  nsubsimplicies(dim_cell, 1)
}
