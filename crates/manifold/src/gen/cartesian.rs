use common::{
  combo::factorial,
  linalg::nalgebra::{Matrix, Vector},
};
use itertools::Itertools;

use crate::{
  geometry::coord::mesh::MeshCoords,
  topology::{complex::Complex, simplex::Simplex, skeleton::Skeleton},
  Dim, MeshError,
};

/// converts linear index to cartesian index
///
/// converts linear index in 0..dim_len^d to cartesian index in (0)^d..(dim_len)^d
pub fn linear_index2cartesian_index(
  mut lin_idx: usize,
  dim_len: usize,
  dim: usize,
) -> Vector<usize> {
  let mut cart_idx = Vector::zeros(dim);
  for icomp in 0..dim {
    cart_idx[icomp] = lin_idx % dim_len;
    lin_idx /= dim_len;
  }
  cart_idx
}

/// converts cartesian index to linear index
pub fn cartesian_index2linear_index(cart_idx: &Vector<usize>, dim_len: usize) -> usize {
  cart_idx
    .iter()
    .rev()
    .fold(0, |lin_idx, &icomp| lin_idx * dim_len + icomp)
}

#[derive(Debug, Clone)]
pub struct Rect {
  min: Vector,
  max: Vector,
}

impl Rect {
  pub fn new_min_max(min: Vector, max: Vector) -> Self {
    assert!(min.len() == max.len());
    Self { min, max }
  }
  pub fn new_unit_cube(dim: Dim) -> Self {
    let min = Vector::zeros(dim);
    let max = Vector::from_element(dim, 1.0);
    Self { min, max }
  }

  pub fn dim(&self) -> usize {
    self.min.len()
  }
  pub fn min(&self) -> &Vector {
    &self.min
  }
  pub fn max(&self) -> &Vector {
    &self.max
  }
  pub fn side_lengths(&self) -> Vector {
    &self.max - &self.min
  }
}

/// A box subdivided into congruent subboxes, each split into $d!$ simplicies
/// (Kuhn triangulation).
#[derive(Debug, Clone)]
pub struct CartesianMeshInfo {
  rect: Rect,
  ncells_axis: usize,
}
// constructors
impl CartesianMeshInfo {
  pub fn new(rect: Rect, ncells_axis: usize) -> Self {
    assert!(ncells_axis > 0, "Need at least one cell per axis.");
    Self { rect, ncells_axis }
  }
  pub fn new_unit(dim: Dim, ncells_axis: usize) -> Self {
    Self::new(Rect::new_unit_cube(dim), ncells_axis)
  }

  /// Chooses the number of subboxes per axis such that no simplex has a
  /// diameter above `maxh`.
  ///
  /// The longest edge of every Kuhn simplex is the diagonal of its subbox.
  pub fn new_maxh(rect: Rect, maxh: f64) -> Result<Self, MeshError> {
    if !(maxh.is_finite() && maxh > 0.0) {
      return Err(MeshError::InvalidMeshSize(maxh));
    }
    let diagonal = rect.side_lengths().norm();
    // relative tolerance, such that e.g. 1/0.2 gives 5 and not 6
    let ncells_axis = ((diagonal / maxh) * (1.0 - 1e-10)).ceil().max(1.0) as usize;
    Ok(Self::new(rect, ncells_axis))
  }
  pub fn new_unit_maxh(dim: Dim, maxh: f64) -> Result<Self, MeshError> {
    Self::new_maxh(Rect::new_unit_cube(dim), maxh)
  }
}
// getters
impl CartesianMeshInfo {
  pub fn dim(&self) -> usize {
    self.rect.dim()
  }
  pub fn min(&self) -> &Vector {
    self.rect.min()
  }
  pub fn side_lengths(&self) -> Vector {
    self.rect.side_lengths()
  }
  pub fn ncells_axis(&self) -> usize {
    self.ncells_axis
  }
  pub fn nvertices_axis(&self) -> usize {
    self.ncells_axis + 1
  }
  pub fn nboxes(&self) -> usize {
    self.ncells_axis.pow(self.dim() as u32)
  }
  pub fn ncells(&self) -> usize {
    factorial(self.dim()) * self.nboxes()
  }
  pub fn nvertices(&self) -> usize {
    self.nvertices_axis().pow(self.dim() as u32)
  }
  pub fn vertex_cart_idx(&self, ivertex: usize) -> Vector<usize> {
    linear_index2cartesian_index(ivertex, self.nvertices_axis(), self.dim())
  }
  pub fn vertex_pos(&self, ivertex: usize) -> Vector {
    (self.vertex_cart_idx(ivertex).cast::<f64>() / self.ncells_axis as f64)
      .component_mul(&self.side_lengths())
      + self.min()
  }
}

impl CartesianMeshInfo {
  pub fn compute_coord_complex(&self) -> Result<(Complex, MeshCoords), MeshError> {
    let (skeleton, coords) = self.compute_coord_cells();
    let complex = Complex::from_cells(skeleton)?;
    tracing::debug!(
      ncells = complex.ncells(),
      nvertices = coords.nvertices(),
      "generated cartesian mesh"
    );
    Ok((complex, coords))
  }
  pub fn compute_coord_cells(&self) -> (Skeleton, MeshCoords) {
    let skeleton = self.compute_cell_skeleton();
    let coords = self.compute_vertex_coords();
    (skeleton, coords)
  }
  pub fn compute_vertex_coords(&self) -> MeshCoords {
    let mut coords = Matrix::zeros(self.dim(), self.nvertices());
    for (ivertex, mut coord) in coords.column_iter_mut().enumerate() {
      coord.copy_from(&self.vertex_pos(ivertex));
    }
    MeshCoords::new(coords)
  }

  pub fn compute_cell_skeleton(&self) -> Skeleton {
    let nboxes_axis = self.ncells_axis();
    let dim = self.dim();
    let mut simplicies: Vec<Simplex> = Vec::with_capacity(self.ncells());

    for ibox in 0..self.nboxes() {
      let vertex_icart_origin = linear_index2cartesian_index(ibox, nboxes_axis, dim);
      let ivertex_origin = cartesian_index2linear_index(&vertex_icart_origin, self.nvertices_axis());

      // Each permutation of the basis directions gives rise to one simplex,
      // by walking from the box origin along the directions in this order.
      let box_simplicies = (0..dim).permutations(dim).map(|basisdirs| {
        let mut simplex = vec![ivertex_origin];
        let mut vertex_icart = vertex_icart_origin.clone();
        for &basisdir in basisdirs.iter() {
          vertex_icart[basisdir] += 1;
          let ivertex = cartesian_index2linear_index(&vertex_icart, self.nvertices_axis());
          simplex.push(ivertex);
        }
        Simplex::from(simplex)
      });

      simplicies.extend(box_simplicies);
    }

    Skeleton::new(simplicies)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::geometry::coord::simplex::SimplexHandleExt;

  use approx::assert_relative_eq;

  #[test]
  fn unit_cube_mesh() {
    let (mesh, coords) = CartesianMeshInfo::new_unit(3, 1).compute_coord_cells();

    #[rustfmt::skip]
    let expected_coords = Matrix::from_column_slice(3, 8, &[
      0., 0., 0.,
      1., 0., 0.,
      0., 1., 0.,
      1., 1., 0.,
      0., 0., 1.,
      1., 0., 1.,
      0., 1., 1.,
      1., 1., 1.,
    ]);
    assert_eq!(*coords.matrix(), expected_coords);

    let expected_cells = vec![
      vec![0, 1, 3, 7],
      vec![0, 1, 5, 7],
      vec![0, 2, 3, 7],
      vec![0, 2, 6, 7],
      vec![0, 4, 5, 7],
      vec![0, 4, 6, 7],
    ];
    let cells: Vec<_> = mesh.into_iter().map(|s| s.vertices().to_vec()).collect();
    assert_eq!(cells, expected_cells);
  }

  #[test]
  fn unit_square_mesh() {
    let (mesh, coords) = CartesianMeshInfo::new_unit(2, 2).compute_coord_cells();

    #[rustfmt::skip]
    let expected_coords = Matrix::from_column_slice(2, 9, &[
      0.0, 0.0,
      0.5, 0.0,
      1.0, 0.0,
      0.0, 0.5,
      0.5, 0.5,
      1.0, 0.5,
      0.0, 1.0,
      0.5, 1.0,
      1.0, 1.0,
    ]);
    assert_eq!(*coords.matrix(), expected_coords);

    let expected_simplicies = vec![
      vec![0, 1, 4],
      vec![0, 3, 4],
      vec![1, 2, 5],
      vec![1, 4, 5],
      vec![3, 4, 7],
      vec![3, 6, 7],
      vec![4, 5, 8],
      vec![4, 7, 8],
    ];
    let cells: Vec<_> = mesh.into_iter().map(|s| s.vertices().to_vec()).collect();
    assert_eq!(cells, expected_simplicies);
  }

  #[test]
  fn maxh_resolution() {
    // sqrt(3) / 0.2 = 8.66
    let info = CartesianMeshInfo::new_unit_maxh(3, 0.2).unwrap();
    assert_eq!(info.ncells_axis(), 9);
    assert_eq!(info.ncells(), 6 * 9usize.pow(3));
    assert_eq!(CartesianMeshInfo::new_unit_maxh(2, 0.3).unwrap().ncells_axis(), 5);
    assert_eq!(CartesianMeshInfo::new_unit_maxh(1, 0.2).unwrap().ncells_axis(), 5);
    assert_eq!(CartesianMeshInfo::new_unit_maxh(3, 7.0).unwrap().ncells_axis(), 1);

    assert!(matches!(
      CartesianMeshInfo::new_unit_maxh(3, 0.0),
      Err(MeshError::InvalidMeshSize(_))
    ));
    assert!(CartesianMeshInfo::new_unit_maxh(3, f64::NAN).is_err());
  }

  #[test]
  fn maxh_bounds_mesh_width() {
    for (dim, maxh) in [(1, 0.3), (2, 0.3), (2, 0.25), (3, 0.5), (3, 0.2)] {
      let (complex, coords) = CartesianMeshInfo::new_unit_maxh(dim, maxh)
        .unwrap()
        .compute_coord_complex()
        .unwrap();
      let width = coords.mesh_width_max(&complex);
      assert!(width <= maxh * (1.0 + 1e-12), "dim={dim} maxh={maxh} width={width}");
    }
  }

  #[test]
  fn cube_is_tiled() {
    for dim in 1..=3 {
      let (complex, coords) = CartesianMeshInfo::new_unit(dim, 3)
        .compute_coord_complex()
        .unwrap();
      let vol: f64 = complex
        .cells()
        .handle_iter()
        .map(|cell| cell.coord_simplex(&coords).vol())
        .sum();
      assert_relative_eq!(vol, 1.0, epsilon = 1e-12);

      let nboundary = complex.boundary_facets().len();
      let expected = 2 * dim * 3usize.pow(dim as u32 - 1) * common::combo::factorial(dim - 1);
      assert_eq!(nboundary, expected);
    }
  }

  #[test]
  fn shifted_box() {
    let rect = Rect::new_min_max(na::dvector![-1.0, 0.0], na::dvector![1.0, 0.5]);
    // diagonal sqrt(4.25) = 2.06
    let info = CartesianMeshInfo::new_maxh(rect, 0.5).unwrap();
    assert_eq!(info.ncells_axis(), 5);
    let (complex, coords) = info.compute_coord_complex().unwrap();
    let vol: f64 = complex
      .cells()
      .handle_iter()
      .map(|cell| cell.coord_simplex(&coords).vol())
      .sum();
    assert_relative_eq!(vol, 1.0, epsilon = 1e-12);
    assert_eq!(coords.coord(0), na::dvector![-1.0, 0.0]);
    assert_eq!(coords.coord(coords.nvertices() - 1), na::dvector![1.0, 0.5]);
  }
}
