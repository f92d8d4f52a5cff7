pub mod gmsh;
pub mod vtk;
