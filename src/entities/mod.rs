pub mod gallery;
pub mod gallery_look;
pub mod look;
pub mod look_product;
pub mod prelude;
