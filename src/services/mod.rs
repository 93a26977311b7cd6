pub mod database;
pub mod gallery;
pub mod gallery_look;
pub mod look;
pub mod look_product;
pub mod ordering;
pub mod session;
pub mod utils;

// 重新导出常用类型
pub use gallery::GalleryService;
pub use gallery_look::{GalleryLookService, SyncReport};
pub use look::LookService;
pub use look_product::LookProductService;
pub use session::ShopSession;
