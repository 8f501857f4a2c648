pub mod artifact;
pub mod paper;
