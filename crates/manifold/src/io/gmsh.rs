use std::collections::HashMap;

use common::linalg::nalgebra::Matrix;

use crate::{
  geometry::coord::mesh::MeshCoords,
  topology::{complex::Complex, simplex::Simplex, skeleton::Skeleton},
  MeshError,
};

pub fn gmsh2coord_complex(bytes: &[u8]) -> Result<(Complex, MeshCoords), MeshError> {
  let (cells, coords) = gmsh2coord_cells(bytes)?;
  let complex = Complex::from_cells(cells)?;
  Ok((complex, coords))
}

/// Load Gmsh `.msh` file (version 4.1).
///
/// The cells are the elements of the highest simplex dimension present.
/// Planar meshes (all z = 0) get 2D coordinates.
pub fn gmsh2coord_cells(bytes: &[u8]) -> Result<(Skeleton, MeshCoords), MeshError> {
  let msh = mshio::parse_msh_bytes(bytes).map_err(|e| MeshError::Gmsh(e.to_string()))?;

  let nodes = msh.data.nodes.ok_or(MeshError::MissingGmshSection("Nodes"))?;

  // Node tags are only stored if they are sparse, otherwise they count up
  // from the smallest tag.
  let mut tag2vertex = HashMap::new();
  let mut mesh_vertices = Vec::new();
  for block in &nodes.node_blocks {
    let offset = mesh_vertices.len();
    match &block.node_tags {
      Some(tags) => tag2vertex.extend(tags.iter().map(|(&tag, &i)| (tag, offset + i))),
      None => {
        let ivertices = offset..offset + block.nodes.len();
        tag2vertex.extend(ivertices.map(|ivertex| (nodes.min_node_tag + ivertex as u64, ivertex)));
      }
    }
    mesh_vertices.extend(
      block
        .nodes
        .iter()
        .map(|node| na::dvector![node.x, node.y, node.z]),
    );
  }

  let coords = MeshCoords::new(Matrix::from_columns(&mesh_vertices));
  let coords = if coords.matrix().row(2).iter().all(|&z| z == 0.0) {
    coords.truncate_dim(2)
  } else {
    coords
  };

  let mut edges = Vec::new();
  let mut trias = Vec::new();
  let mut tets = Vec::new();

  let elements = msh
    .data
    .elements
    .ok_or(MeshError::MissingGmshSection("Elements"))?;
  for block in elements.element_blocks {
    type ElType = mshio::ElementType;
    let simplex_acc = match block.element_type {
      ElType::Lin2 => &mut edges,
      ElType::Tri3 => &mut trias,
      ElType::Tet4 => &mut tets,
      ElType::Pnt => continue,
      _ => {
        tracing::warn!("unsupported gmsh ElementType: {:?}", block.element_type);
        continue;
      }
    };
    for e in block.elements {
      let simplex = e
        .nodes
        .iter()
        .map(|tag| tag2vertex.get(tag).copied().ok_or(MeshError::UnknownNodeTag(*tag)))
        .collect::<Result<Vec<_>, _>>()?;
      simplex_acc.push(Simplex::from(simplex));
    }
  }

  let cells = [tets, trias, edges]
    .into_iter()
    .find(|cells| !cells.is_empty())
    .ok_or(MeshError::NoCells)?;

  Ok((Skeleton::new(cells), coords))
}
