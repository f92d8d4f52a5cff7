//! H(div) conforming elements: Raviart-Thomas (order 0) and
//! Brezzi-Douglas-Marini (orders 1 and 2).
//!
//! The shape functions are computed per cell in physical coordinates.
//! A prebasis of vector valued barycentric polynomials is transformed into the
//! nodal basis by inverting the matrix of the degrees of freedom applied to the
//! prebasis.
//!
//! Degrees of freedom:
//! - facet: $sigma dot n_F$ at the order k lattice points of the facet
//!   (the barycenter for k = 0),
//! - cell (k = 2): $1/|T| integral_T sigma dot w_e$ for the Whitney 1-forms
//!   $w_e = lambda_i nabla lambda_j - lambda_j nabla lambda_i$ of the edges.
//!
//! The facet normal $n_F$ is oriented by the increasing global vertex order of
//! the facet, so neighbouring cells share degrees of freedom and the normal
//! component is continuous.

use super::{DofIdx, DofMap};
use crate::{poly::BaryMonomials, FeError};

use common::{
  combo::{binomial, compositions, Sign},
  linalg::nalgebra::{Matrix, RowVector, Vector},
};
use itertools::Itertools;
use manifold::{
  geometry::coord::{
    mesh::MeshCoords,
    quadrature::SimplexQuadRule,
    simplex::{facet_bary_to_cell_bary, SimplexCoords, SimplexHandleExt},
    BaryCoordRef,
  },
  topology::{
    complex::{handle::SimplexHandle, Complex},
    simplex::nedges,
  },
  Dim,
};

pub const MAX_ORDER: usize = 2;

#[derive(Debug, Clone)]
pub struct HDivSpace {
  order: usize,
  dim: Dim,
  nfacets: usize,
  ncells: usize,
}

impl HDivSpace {
  pub fn new(topology: &Complex, coords: &MeshCoords, order: usize) -> Result<Self, FeError> {
    if order > MAX_ORDER {
      return Err(FeError::UnsupportedOrder(order));
    }
    let dim = topology.dim();
    if !(1..=3).contains(&dim) {
      return Err(FeError::UnsupportedDim(dim));
    }
    if coords.dim() != dim {
      return Err(FeError::DimensionMismatch {
        cell: dim,
        ambient: coords.dim(),
      });
    }
    Ok(Self {
      order,
      dim,
      nfacets: topology.facets().len(),
      ncells: topology.ncells(),
    })
  }

  pub fn order(&self) -> usize {
    self.order
  }
  pub fn dim(&self) -> Dim {
    self.dim
  }
  /// Total degree of the shape functions.
  pub fn poly_degree(&self) -> usize {
    poly_degree(self.order)
  }
  pub fn ndofs_facet(&self) -> usize {
    ndofs_facet(self.dim, self.order)
  }
  pub fn ndofs_interior(&self) -> usize {
    ndofs_interior(self.dim, self.order)
  }

  /// The shape functions on `cell`.
  pub fn element(&self, cell: SimplexHandle, coords: &MeshCoords) -> Result<HDivElement, FeError> {
    let simp = cell.coord_simplex(coords);
    HDivElement::new(self.order, &simp).ok_or(FeError::DegenerateCell(cell.kidx()))
  }
}

impl DofMap for HDivSpace {
  fn ndofs(&self) -> usize {
    self.nfacets * self.ndofs_facet() + self.ncells * self.ndofs_interior()
  }
  fn ndofs_local(&self) -> usize {
    (self.dim + 1) * self.ndofs_facet() + self.ndofs_interior()
  }
  fn local2global(&self, cell: SimplexHandle) -> Vec<DofIdx> {
    let nfacet = self.ndofs_facet();
    let ninterior = self.ndofs_interior();

    let mut dofs = Vec::with_capacity(self.ndofs_local());
    for ifacet in 0..=self.dim {
      let facet = cell.opposite_facet(ifacet);
      dofs.extend((0..nfacet).map(|j| facet.kidx() * nfacet + j));
    }
    let offset = self.nfacets * nfacet + cell.kidx() * ninterior;
    dofs.extend(offset..offset + ninterior);
    dofs
  }
}

fn poly_degree(order: usize) -> usize {
  order.max(1)
}
fn ndofs_facet(dim: Dim, order: usize) -> usize {
  binomial(dim - 1 + order, order)
}
fn ndofs_interior(dim: Dim, order: usize) -> usize {
  if order == 2 {
    nedges(dim)
  } else {
    0
  }
}

/// Barycentric coordinates of the facet points carrying the facet degrees of freedom.
pub fn facet_lattice(nvertices: usize, order: usize) -> Vec<Vector> {
  if order == 0 {
    return vec![Vector::from_element(nvertices, 1.0 / nvertices as f64)];
  }
  compositions(nvertices, order)
    .into_iter()
    .map(|beta| Vector::from_iterator(nvertices, beta.into_iter().map(|b| b as f64 / order as f64)))
    .collect()
}

/// Shape functions of an H(div) element on a cell.
///
/// Component `c` of shape function `j` is $sum_alpha C_c[alpha, j] lambda^alpha$.
#[derive(Debug, Clone)]
pub struct HDivElement {
  order: usize,
  monomials: BaryMonomials,
  coeffs: Vec<Matrix>,
  difbarys: Matrix,
  outward_normals: Vec<Vector>,
  facet_signs: Vec<Sign>,
  vol: f64,
}

impl HDivElement {
  /// `None` for degenerate cells.
  pub fn new(order: usize, simp: &SimplexCoords) -> Option<Self> {
    assert!(order <= MAX_ORDER, "Unsupported H(div) order.");
    assert!(simp.is_same_dim(), "H(div) elements need a full dimensional cell.");
    let dim = simp.dim_intrinsic();

    let difbarys = simp.difbarys()?;
    let outward_normals = (0..=dim)
      .map(|i| simp.outward_normal(i))
      .collect::<Option<Vec<_>>>()?;
    let facet_signs = (0..=dim)
      .map(|i| simp.facet_orientation(i))
      .collect::<Option<Vec<_>>>()?;

    let monomials = BaryMonomials::new(dim + 1, poly_degree(order));
    let prebasis = prebasis(order, simp, &monomials);

    let mut element = Self {
      order,
      monomials,
      coeffs: prebasis,
      difbarys,
      outward_normals,
      facet_signs,
      vol: simp.vol(),
    };

    let dofmat = element.dof_matrix();
    let transform = dofmat.try_inverse()?;
    element.coeffs = element.coeffs.iter().map(|c| c * &transform).collect();
    Some(element)
  }

  pub fn order(&self) -> usize {
    self.order
  }
  pub fn dim(&self) -> Dim {
    self.difbarys.ncols()
  }
  pub fn nbasis(&self) -> usize {
    self.coeffs[0].ncols()
  }
  pub fn vol(&self) -> f64 {
    self.vol
  }
  pub fn difbarys(&self) -> &Matrix {
    &self.difbarys
  }
  pub fn outward_normal(&self, ifacet: usize) -> &Vector {
    &self.outward_normals[ifacet]
  }
  pub fn facet_sign(&self, ifacet: usize) -> Sign {
    self.facet_signs[ifacet]
  }
  /// The globally oriented unit normal of facet `ifacet`.
  pub fn facet_normal(&self, ifacet: usize) -> Vector {
    self.facet_signs[ifacet].as_f64() * &self.outward_normals[ifacet]
  }

  /// Values of all shape functions in the columns.
  pub fn eval(&self, bary: BaryCoordRef) -> Matrix {
    let mono = self.monomials.eval(bary);
    let mut values = Matrix::zeros(self.dim(), self.nbasis());
    for (icomp, coeffs) in self.coeffs.iter().enumerate() {
      values.set_row(icomp, &(mono.transpose() * coeffs));
    }
    values
  }

  /// Divergence of all shape functions.
  pub fn eval_div(&self, bary: BaryCoordRef) -> Vector {
    let grads = self.monomials.eval_grads(bary, &self.difbarys);
    let mut div = Vector::zeros(self.nbasis());
    for (icomp, coeffs) in self.coeffs.iter().enumerate() {
      div += (grads.row(icomp) * coeffs).transpose();
    }
    div
  }

  /// The degrees of freedom applied to the current shape functions.
  ///
  /// Row `i` is functional `i`, column `j` shape function `j`.
  pub fn dof_matrix(&self) -> Matrix {
    let dim = self.dim();
    let ndofs = (dim + 1) * ndofs_facet(dim, self.order) + ndofs_interior(dim, self.order);
    let mut dofmat = Matrix::zeros(ndofs, self.nbasis());

    let mut idof = 0;
    for ifacet in 0..=dim {
      let normal = self.facet_normal(ifacet);
      for facet_bary in facet_lattice(dim, self.order) {
        let bary = facet_bary_to_cell_bary(ifacet, &facet_bary);
        let row = normal.transpose() * self.eval(bary.as_view());
        dofmat.set_row(idof, &row);
        idof += 1;
      }
    }

    if ndofs_interior(dim, self.order) > 0 {
      let qr = SimplexQuadRule::grundmann_moeller(dim, poly_degree(self.order) + 1);
      for (a, b) in (0..=dim).tuple_combinations() {
        let mut row = RowVector::zeros(self.nbasis());
        for (bary, weight) in qr.iter() {
          let whitney = bary[a] * self.difbarys.row(b) - bary[b] * self.difbarys.row(a);
          row += weight * whitney * self.eval(bary);
        }
        dofmat.set_row(idof, &row);
        idof += 1;
      }
    }

    dofmat
  }
}

/// Vector valued prebasis in per-component monomial coefficients.
fn prebasis(order: usize, simp: &SimplexCoords, monomials: &BaryMonomials) -> Vec<Matrix> {
  let dim = simp.dim_intrinsic();
  let nmono = monomials.len();

  if order == 0 {
    // e_c = sum_i lambda_i e_c and x - x_0 = sum_i lambda_i (x_i - x_0)
    let mut coeffs = vec![Matrix::zeros(nmono, dim + 1); dim];
    for (icomp, coeff) in coeffs.iter_mut().enumerate() {
      for ivertex in 0..=dim {
        let mut exponent = vec![0; dim + 1];
        exponent[ivertex] = 1;
        let imono = monomials
          .index_of(&exponent)
          .expect("Linear monomials are complete.");
        coeff[(imono, icomp)] = 1.0;
        coeff[(imono, dim)] = simp.coord(ivertex)[icomp] - simp.base_vertex()[icomp];
      }
    }
    coeffs
  } else {
    // full P_k^n
    let mut coeffs = vec![Matrix::zeros(nmono, dim * nmono); dim];
    for (icomp, coeff) in coeffs.iter_mut().enumerate() {
      for imono in 0..nmono {
        coeff[(imono, icomp * nmono + imono)] = 1.0;
      }
    }
    coeffs
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use manifold::gen::cartesian::CartesianMeshInfo;

  use approx::assert_relative_eq;

  fn skewed_tet() -> SimplexCoords {
    SimplexCoords::new(Matrix::from_column_slice(
      3,
      4,
      &[0.1, 0.0, 0.2, 1.3, 0.1, 0.0, 0.2, 0.9, 0.1, 0.3, 0.4, 1.1],
    ))
  }

  #[test]
  fn local_dimensions() {
    let expected = [
      // dim 1: RT0, BDM1, BDM2
      [2, 2, 3],
      [3, 6, 12],
      [4, 12, 30],
    ];
    for dim in 1..=3 {
      for order in 0..=2 {
        let simp = SimplexCoords::standard(dim);
        let element = HDivElement::new(order, &simp).unwrap();
        assert_eq!(element.nbasis(), expected[dim - 1][order]);
        let nlocal = (dim + 1) * ndofs_facet(dim, order) + ndofs_interior(dim, order);
        assert_eq!(nlocal, element.nbasis());
      }
    }
  }

  #[test]
  fn dof_duality() {
    let simps = [
      SimplexCoords::standard(1),
      SimplexCoords::new(Matrix::from_column_slice(2, 3, &[0.2, 0.1, 1.0, 0.3, 0.4, 0.8])),
      skewed_tet(),
    ];
    for simp in &simps {
      for order in 0..=2 {
        let element = HDivElement::new(order, simp).unwrap();
        let dofmat = element.dof_matrix();
        let identity = Matrix::identity(element.nbasis(), element.nbasis());
        common::linalg::assert_mat_eq(&dofmat, &identity, Some(1e-9));
      }
    }
  }

  #[test]
  fn rt0_divergence() {
    let simp = skewed_tet();
    let element = HDivElement::new(0, &simp).unwrap();
    let bary = Vector::from_element(4, 0.25);
    let div = element.eval_div(bary.as_view());
    for ifacet in 0..4 {
      let expected = element.facet_sign(ifacet).as_f64() * simp.facet(ifacet).vol() / simp.vol();
      assert_relative_eq!(div[ifacet], expected, epsilon = 1e-10);
    }
  }

  #[test]
  fn divergence_theorem_per_element() {
    let simp = skewed_tet();
    for order in 0..=2 {
      let element = HDivElement::new(order, &simp).unwrap();
      let degree = poly_degree(order);
      let cell_qr = SimplexQuadRule::grundmann_moeller(3, degree);
      let facet_qr = SimplexQuadRule::grundmann_moeller(2, degree);

      let div_integral = cell_qr.integrate(|b| element.eval_div(b).sum(), &simp);
      let mut flux = 0.0;
      for ifacet in 0..4 {
        let facet = simp.facet(ifacet);
        let normal = element.outward_normal(ifacet);
        flux += facet_qr.integrate(
          |b| {
            let bary = facet_bary_to_cell_bary(ifacet, b);
            (normal.transpose() * element.eval(bary.as_view())).sum()
          },
          &facet,
        );
      }
      assert_relative_eq!(div_integral, flux, epsilon = 1e-9);
    }
  }

  #[test]
  fn normal_continuity_across_interior_facets() {
    let (topology, coords) = CartesianMeshInfo::new_unit(3, 2)
      .compute_coord_complex()
      .unwrap();
    for order in 0..=2 {
      let space = HDivSpace::new(&topology, &coords, order).unwrap();
      for facet in topology.facets().handle_iter().filter(|f| !f.is_boundary()) {
        let cells: Vec<_> = facet.cocells().collect();
        let traces: Vec<Matrix> = cells
          .iter()
          .map(|cell| {
            let element = space.element(*cell, &coords).unwrap();
            let ifacet = cell.simplex().opposite_vertex(facet.simplex()).unwrap();
            let normal = element.facet_normal(ifacet);
            let global = space.local2global(*cell);

            // normal trace of all global shape functions touching the facet
            let facet_qr = SimplexQuadRule::grundmann_moeller(2, 2);
            let mut traces = Matrix::zeros(facet_qr.npoints(), space.ndofs());
            for (iqp, (b, _)) in facet_qr.iter().enumerate() {
              let bary = facet_bary_to_cell_bary(ifacet, b);
              let values = normal.transpose() * element.eval(bary.as_view());
              for (ilocal, &iglobal) in global.iter().enumerate() {
                traces[(iqp, iglobal)] += values[ilocal];
              }
            }
            traces
          })
          .collect();
        common::linalg::assert_mat_eq(&traces[0], &traces[1], Some(1e-9));
      }
    }
  }

  #[test]
  fn global_numbering() {
    let (topology, coords) = CartesianMeshInfo::new_unit(2, 2)
      .compute_coord_complex()
      .unwrap();
    let space = HDivSpace::new(&topology, &coords, 2).unwrap();
    let nfacets = topology.facets().len();
    assert_eq!(space.ndofs(), 3 * nfacets + 3 * topology.ncells());

    let mut hits = vec![0; space.ndofs()];
    for cell in topology.cells().handle_iter() {
      let dofs = space.local2global(cell);
      assert_eq!(dofs.len(), space.ndofs_local());
      dofs.iter().for_each(|&d| hits[d] += 1);
    }
    assert!(hits.iter().all(|&h| h == 1 || h == 2));
  }

  #[test]
  fn unsupported_order() {
    let (topology, coords) = CartesianMeshInfo::new_unit(2, 1)
      .compute_coord_complex()
      .unwrap();
    assert!(matches!(
      HDivSpace::new(&topology, &coords, 3),
      Err(FeError::UnsupportedOrder(3))
    ));
  }
}
