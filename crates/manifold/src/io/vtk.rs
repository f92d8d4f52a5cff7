use crate::{geometry::coord::mesh::MeshCoords, topology::complex::Complex, MeshError};

use vtkio::{
  model::{
    Attribute, Attributes, ByteOrder, CellType, Cells, DataArray, DataSet, ElementType, Piece,
    UnstructuredGridPiece, Version, VertexNumbers, Vtk,
  },
  IOBuffer,
};

/// Scalar data with one value per cell.
pub fn cell_scalars(name: &str, values: Vec<f64>) -> Attribute {
  Attribute::DataArray(DataArray {
    name: name.to_string(),
    elem: ElementType::Scalars {
      num_comp: 1,
      lookup_table: None,
    },
    data: IOBuffer::F64(values),
  })
}

/// Vector data with one 3-component vector per cell, stored flat.
pub fn cell_vectors(name: &str, values: Vec<f64>) -> Attribute {
  Attribute::DataArray(DataArray {
    name: name.to_string(),
    elem: ElementType::Vectors,
    data: IOBuffer::F64(values),
  })
}

/// Legacy VTK unstructured grid of the cells of the mesh.
///
/// Coordinates are padded to 3 components.
pub fn mesh_to_vtk(
  title: &str,
  topology: &Complex,
  coords: &MeshCoords,
  cell_attributes: Vec<Attribute>,
) -> Result<Vtk, MeshError> {
  let cells = topology.cells();
  let cell_type = match cells.dim() {
    1 => CellType::Line,
    2 => CellType::Triangle,
    3 => CellType::Tetra,
    dim => return Err(MeshError::UnsupportedVtkDim(dim)),
  };
  if coords.dim() > 3 {
    return Err(MeshError::UnsupportedVtkDim(coords.dim()));
  }

  let mut points = Vec::with_capacity(3 * coords.nvertices());
  for coord in coords.coord_iter() {
    points.extend(coord.iter().copied());
    points.extend(std::iter::repeat(0.0).take(3 - coord.len()));
  }

  // Each cell is laid out as: N, i_1, ..., i_N
  let mut vertices = Vec::new();
  for simp in cells.simplex_iter() {
    vertices.push(simp.nvertices() as u32);
    vertices.extend(simp.iter().map(|v| v as u32));
  }
  let cell_verts = VertexNumbers::Legacy {
    num_cells: cells.len() as u32,
    vertices,
  };
  let types = vec![cell_type; cells.len()];

  let piece = UnstructuredGridPiece {
    points: IOBuffer::F64(points),
    cells: Cells { cell_verts, types },
    data: Attributes {
      point: Vec::new(),
      cell: cell_attributes,
    },
  };

  Ok(Vtk {
    version: Version { major: 4, minor: 1 },
    title: title.to_string(),
    byte_order: ByteOrder::BigEndian,
    data: DataSet::UnstructuredGrid {
      meta: None,
      pieces: vec![Piece::Inline(Box::new(piece))],
    },
    file_path: None,
  })
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::gen::cartesian::CartesianMeshInfo;
  use common::linalg::nalgebra::Matrix;

  #[test]
  fn square_grid() {
    let (topology, coords) = CartesianMeshInfo::new_unit(2, 2)
      .compute_coord_complex()
      .unwrap();
    let ncells = topology.ncells();
    let attrs = vec![cell_scalars("index", (0..ncells).map(|i| i as f64).collect())];
    let vtk = mesh_to_vtk("square", &topology, &coords, attrs).unwrap();

    let DataSet::UnstructuredGrid { pieces, .. } = vtk.data else {
      panic!("expected unstructured grid");
    };
    let Piece::Inline(piece) = &pieces[0] else {
      panic!("expected inline piece");
    };
    assert_eq!(piece.points.len(), 3 * 9);
    assert_eq!(piece.cells.types.len(), ncells);
    let VertexNumbers::Legacy { num_cells, vertices } = &piece.cells.cell_verts else {
      panic!("expected legacy connectivity");
    };
    assert_eq!(*num_cells as usize, ncells);
    assert_eq!(vertices.len(), 4 * ncells);
    assert_eq!(piece.data.cell.len(), 1);
  }

  #[test]
  fn unsupported_dimensions_are_rejected() {
    let points = Complex::standard(0);
    let coords = MeshCoords::new(Matrix::zeros(1, 1));
    assert!(matches!(
      mesh_to_vtk("point", &points, &coords, Vec::new()),
      Err(MeshError::UnsupportedVtkDim(0))
    ));

    let pentachoron = Complex::standard(4);
    let coords = MeshCoords::new(Matrix::zeros(4, 5));
    assert!(matches!(
      mesh_to_vtk("pentachoron", &pentachoron, &coords, Vec::new()),
      Err(MeshError::UnsupportedVtkDim(4))
    ));
  }
}
