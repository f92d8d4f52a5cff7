pub mod mixed_poisson;
