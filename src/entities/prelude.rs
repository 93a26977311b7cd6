pub use super::gallery::Entity as Gallery;
pub use super::gallery_look::Entity as GalleryLook;
pub use super::look::Entity as Look;
pub use super::look_product::Entity as LookProduct;
