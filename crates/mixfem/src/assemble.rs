use crate::{
  operators::{ElMatProvider, ElVecProvider},
  FeError,
};

use common::{linalg::nalgebra::Vector, sparse::SparseMatrix};
use manifold::{geometry::coord::mesh::MeshCoords, topology::complex::Complex};

use rayon::prelude::*;

pub type GalMat = SparseMatrix;
pub type GalVec = Vector;

/// Assembly algorithm for the Galerkin Matrix.
///
/// Cells are processed in parallel, the triplets are gathered in cell order.
pub fn assemble_galmat(
  topology: &Complex,
  coords: &MeshCoords,
  elmat: &impl ElMatProvider,
) -> Result<GalMat, FeError> {
  let row_space = elmat.row_space();
  let col_space = elmat.col_space();

  let cells = topology.cells();
  let local_triplets = (0..cells.len())
    .into_par_iter()
    .map(|icell| {
      let cell = cells.get_by_kidx(icell);
      let mat = elmat.eval(cell, coords)?;

      let row_dofs = row_space.local2global(cell);
      let col_dofs = col_space.local2global(cell);
      debug_assert_eq!(mat.shape(), (row_dofs.len(), col_dofs.len()));

      let mut triplets = Vec::with_capacity(row_dofs.len() * col_dofs.len());
      for (ilocal, &iglobal) in row_dofs.iter().enumerate() {
        for (jlocal, &jglobal) in col_dofs.iter().enumerate() {
          let val = mat[(ilocal, jlocal)];
          if val != 0.0 {
            triplets.push((iglobal, jglobal, val));
          }
        }
      }
      Ok(triplets)
    })
    .collect::<Result<Vec<_>, FeError>>()?;

  let triplets = local_triplets.into_iter().flatten().collect();
  Ok(GalMat::new(row_space.ndofs(), col_space.ndofs(), triplets))
}

/// Assembly algorithm for the Galerkin Vector.
pub fn assemble_galvec(
  topology: &Complex,
  coords: &MeshCoords,
  elvec: &impl ElVecProvider,
) -> Result<GalVec, FeError> {
  let space = elvec.space();

  let cells = topology.cells();
  let entries = (0..cells.len())
    .into_par_iter()
    .map(|icell| {
      let cell = cells.get_by_kidx(icell);
      let vec = elvec.eval(cell, coords)?;
      let dofs = space.local2global(cell);
      debug_assert_eq!(vec.len(), dofs.len());
      Ok(dofs.into_iter().zip(vec.iter().copied()).collect::<Vec<_>>())
    })
    .collect::<Result<Vec<_>, FeError>>()?;

  let mut galvec = GalVec::zeros(space.ndofs());
  for (irow, val) in entries.into_iter().flatten() {
    galvec[irow] += val;
  }
  Ok(galvec)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    fe::{DofMap, HDivSpace, L2Space},
    operators::{DivElmat, HDivMassElmat, L2MassElmat, SourceElvec},
  };
  use common::linalg::nalgebra::symmetry_defect;
  use manifold::gen::cartesian::CartesianMeshInfo;

  use approx::assert_relative_eq;

  #[test]
  fn hdiv_mass_symmetric_positive() {
    let (topology, coords) = CartesianMeshInfo::new_unit(2, 3)
      .compute_coord_complex()
      .unwrap();
    for order in 0..=2 {
      let space = HDivSpace::new(&topology, &coords, order).unwrap();
      let galmat = assemble_galmat(&topology, &coords, &HDivMassElmat(&space)).unwrap();
      assert_eq!(galmat.nrows(), space.ndofs());
      assert!(symmetry_defect(&galmat.to_nalgebra_csr()) < 1e-12);
      assert!(galmat.to_nalgebra_dense().cholesky().is_some());
    }
  }

  #[test]
  fn potential_mass_is_total_volume() {
    let (topology, coords) = CartesianMeshInfo::new_unit(3, 2)
      .compute_coord_complex()
      .unwrap();
    let l2 = L2Space::new(&topology, 1).unwrap();
    let galmat = assemble_galmat(&topology, &coords, &L2MassElmat(&l2)).unwrap();
    let one = (0..topology.ncells()).fold(Vector::zeros(l2.ndofs()), |mut acc, icell| {
      let cell = topology.cells().get_by_kidx(icell);
      for (i, v) in l2.local2global(cell).into_iter().zip(l2.element().one().iter()) {
        acc[i] = *v;
      }
      acc
    });
    let vol = one.dot(&(galmat.to_nalgebra_csr() * &one));
    assert_relative_eq!(vol, 1.0, epsilon = 1e-12);

    let galvec = assemble_galvec(&topology, &coords, &SourceElvec::new(&l2, |_| 2.0)).unwrap();
    assert_relative_eq!(galvec.dot(&one), 2.0, epsilon = 1e-12);
  }

  #[test]
  fn div_matrix_dimensions() {
    let (topology, coords) = CartesianMeshInfo::new_unit(2, 2)
      .compute_coord_complex()
      .unwrap();
    let hdiv = HDivSpace::new(&topology, &coords, 1).unwrap();
    let l2 = L2Space::new(&topology, 0).unwrap();
    let galmat = assemble_galmat(&topology, &coords, &DivElmat::new(&hdiv, &l2)).unwrap();
    assert_eq!(galmat.nrows(), l2.ndofs());
    assert_eq!(galmat.ncols(), hdiv.ndofs());

    // Tested with the constant one, the flux of interior facet shape
    // functions cancels between the two neighbouring cells.
    let colsums = galmat.to_nalgebra_dense().row_sum();
    let nfacet = hdiv.ndofs_facet();
    for facet in topology.facets().handle_iter() {
      for j in 0..nfacet {
        let colsum = colsums[facet.kidx() * nfacet + j];
        if facet.is_boundary() {
          assert!(colsum.abs() > 1e-3);
        } else {
          assert!(colsum.abs() < 1e-12);
        }
      }
    }
  }
}
