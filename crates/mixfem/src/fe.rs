//! Finite element spaces: H(div) fluxes, discontinuous potentials and their product.

pub mod hdiv;
pub mod l2;
pub mod mixed;

pub use hdiv::{HDivElement, HDivSpace};
pub use l2::{L2Element, L2Space};
pub use mixed::MixedSpace;

use manifold::topology::complex::handle::SimplexHandle;

pub type DofIdx = usize;

/// Global numbering of the degrees of freedom of a finite element space.
pub trait DofMap: Sync {
  /// Dimension of the global space.
  fn ndofs(&self) -> usize;
  /// Number of shape functions on a cell.
  fn ndofs_local(&self) -> usize;
  /// Global indices of the local shape functions of `cell`, in local order.
  fn local2global(&self, cell: SimplexHandle) -> Vec<DofIdx>;
}
