pub mod gallery;
pub mod look;
