pub mod complex;
pub mod simplex;
pub mod skeleton;

pub type VertexIdx = usize;
