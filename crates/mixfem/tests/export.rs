use mixfem::{
  io::write_mixed_solution_vtk,
  problems::mixed_poisson::{self, MixedPoissonConfig},
};

#[test]
fn writes_cell_data() {
  let config = MixedPoissonConfig {
    maxh: 0.5,
    ..Default::default()
  };
  let run = mixed_poisson::run(&config).unwrap();

  let dir = std::env::temp_dir().join(format!("mixfem-export-{}", std::process::id()));
  let path = dir.join("nested").join("mixed_poisson.vtk");
  write_mixed_solution_vtk(&path, &run.topology, &run.coords, &run.solution).unwrap();

  let content = std::fs::read_to_string(&path).unwrap();
  assert!(content.contains("CELL_DATA"));
  assert!(content.contains("flux"));
  assert!(content.contains(&format!("CELLS {}", run.topology.ncells())));
  std::fs::remove_dir_all(dir).unwrap();
}
