pub mod linear;
pub mod neural;
pub mod tree_ensemble;
