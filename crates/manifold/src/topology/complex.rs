pub mod handle;

use handle::{KSimplexIdx, SimplexHandle, SkeletonHandle};

use super::{simplex::Simplex, skeleton::Skeleton};
use crate::{Dim, MeshError};

use indexmap::IndexMap;

/// A simplicial manifold complex.
///
/// Holds all skeletons of the cells and the cell incidence of every simplex.
#[derive(Debug, Clone)]
pub struct Complex {
  skeletons: Vec<ComplexSkeleton>,
}
pub type ComplexSkeleton = IndexMap<Simplex, SimplexData>;

#[derive(Default, Debug, Clone)]
pub struct SimplexData {
  /// Indices of the cells containing this simplex.
  pub cocells: Vec<KSimplexIdx>,
}

impl Complex {
  pub fn standard(dim: Dim) -> Self {
    Self::from_cells(Skeleton::standard(dim)).expect("Standard simplex is a manifold.")
  }

  /// Computes all subsimplicies of the cells together with their incidence.
  ///
  /// The cell numbering is kept, vertices are sorted by their index.
  pub fn from_cells(cells: Skeleton) -> Result<Self, MeshError> {
    if cells.is_empty() {
      return Err(MeshError::NoCells);
    }
    let dim = cells.dim();

    let mut skeletons = vec![ComplexSkeleton::new(); dim + 1];
    for (icell, cell) in cells.iter().enumerate() {
      for (dim_sub, subs) in skeletons.iter_mut().enumerate() {
        for sub in cell.subsimps(dim_sub) {
          subs.entry(sub).or_default().cocells.push(icell);
        }
      }
    }
    skeletons[0].sort_by(|v0, _, v1, _| v0.cmp(v1));

    if dim > 0 {
      for (facet, data) in &skeletons[dim - 1] {
        let ncocells = data.cocells.len();
        if ncocells > 2 {
          return Err(MeshError::NonManifold {
            facet: facet.clone(),
            ncocells,
          });
        }
      }
    }

    Ok(Self { skeletons })
  }

  pub fn dim(&self) -> Dim {
    self.skeletons.len() - 1
  }

  pub fn skeleton(&self, dim: Dim) -> SkeletonHandle {
    SkeletonHandle::new(self, dim)
  }
  pub fn nsimplicies(&self, dim: Dim) -> usize {
    self.skeleton(dim).len()
  }
  pub fn vertices(&self) -> SkeletonHandle {
    self.skeleton(0)
  }
  pub fn edges(&self) -> SkeletonHandle {
    self.skeleton(1)
  }
  pub fn facets(&self) -> SkeletonHandle {
    self.skeleton(self.dim() - 1)
  }
  pub fn cells(&self) -> SkeletonHandle {
    self.skeleton(self.dim())
  }
  pub fn ncells(&self) -> usize {
    self.cells().len()
  }

  /// For a d-mesh computes the boundary, which consists of facets ((d-1)-subs).
  ///
  /// The boundary facets are characterized by the fact that they
  /// only have 1 cell as super entity.
  pub fn boundary_facets(&self) -> Vec<SimplexHandle> {
    self
      .facets()
      .handle_iter()
      .filter(|f| f.is_boundary())
      .collect()
  }

  pub(crate) fn raw_skeleton(&self, dim: Dim) -> &ComplexSkeleton {
    &self.skeletons[dim]
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::topology::simplex::nsubsimplicies;

  #[test]
  fn standard_incidence() {
    for dim in 1..=3 {
      let complex = Complex::standard(dim);
      let cell = complex.cells().get_by_kidx(0);
      for dim_sub in 0..=dim {
        assert_eq!(complex.nsimplicies(dim_sub), nsubsimplicies(dim, dim_sub));
        let subs: Vec<_> = cell.subsimps(dim_sub).collect();
        assert_eq!(subs.len(), nsubsimplicies(dim, dim_sub));
        for sub in subs {
          assert!(sub.simplex().is_subsimp_of(cell.simplex()));
          assert_eq!(sub.cocells().next(), Some(cell));
        }
      }
      assert_eq!(complex.boundary_facets().len(), dim + 1);
    }
  }

  #[test]
  fn two_triangles_share_edge() {
    let cells = Skeleton::new(vec![Simplex::from([0, 1, 2]), Simplex::from([1, 2, 3])]);
    let complex = Complex::from_cells(cells).unwrap();
    assert_eq!(complex.vertices().len(), 4);
    assert_eq!(complex.edges().len(), 5);
    assert_eq!(complex.boundary_facets().len(), 4);

    let shared = complex.edges().get_by_simplex(&Simplex::from([1, 2]));
    assert!(!shared.is_boundary());
    let cocells: Vec<_> = shared.cocells().map(|c| c.kidx()).collect();
    assert_eq!(cocells, vec![0, 1]);
  }

  #[test]
  fn non_manifold_is_rejected() {
    let cells = Skeleton::new(vec![
      Simplex::from([0, 1, 2]),
      Simplex::from([0, 1, 3]),
      Simplex::from([0, 1, 4]),
    ]);
    assert!(matches!(
      Complex::from_cells(cells),
      Err(MeshError::NonManifold { ncocells: 3, .. })
    ));
  }
}
