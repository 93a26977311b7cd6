#![allow(dead_code)]

use lookbook_api_rt::config::DatabaseConfig;
use lookbook_api_rt::entities::gallery_look;
use lookbook_api_rt::schemas::gallery::{GalleryLookSnapshot, GalleryRequest, LookAssociation};
use lookbook_api_rt::schemas::look::NewLook;
use lookbook_api_rt::services::database::{ensure_schema, establish_connection, DatabaseConnection};
use lookbook_api_rt::services::{GalleryLookService, GalleryService, LookService, ShopSession};

/// 新建内存 SQLite 并创建全部数据表
pub async fn setup() -> DatabaseConnection {
    let db = establish_connection(&DatabaseConfig::in_memory())
        .await
        .expect("connect to in-memory sqlite");
    ensure_schema(db.as_ref()).await.expect("create tables");
    db
}

pub fn session() -> ShopSession {
    ShopSession::new("lookbook-test.myshopify.com")
}

/// 创建 `count` 个 look，按 id 升序返回
pub async fn create_looks(db: &DatabaseConnection, count: usize) -> Vec<i32> {
    let medias = (0..count)
        .map(|i| NewLook {
            media_key: format!("assets/look-{i}.jpg"),
            media_url: Some(format!("https://cdn.example.com/look-{i}.jpg")),
        })
        .collect();

    let mut ids: Vec<i32> = LookService::create(db, &session(), medias)
        .await
        .expect("create looks")
        .into_iter()
        .map(|look| look.id)
        .collect();
    ids.sort_unstable();
    ids
}

pub async fn create_gallery(db: &DatabaseConnection, title: &str, looks: &[(i32, bool)]) -> i32 {
    let request = GalleryRequest {
        title: title.to_string(),
        looks: snapshot(looks),
    };
    GalleryService::create(db, &session(), request)
        .await
        .expect("create gallery")
        .id
}

pub fn snapshot(looks: &[(i32, bool)]) -> GalleryLookSnapshot {
    GalleryLookSnapshot::new(
        looks
            .iter()
            .map(|(look_id, featured)| LookAssociation::new(*look_id, *featured))
            .collect(),
    )
}

/// gallery 中按顺序排列的 `(look_id, is_featured)`
pub async fn gallery_pairs(db: &DatabaseConnection, gallery_id: i32) -> Vec<(i32, bool)> {
    GalleryLookService::list_for_gallery(db.as_ref(), gallery_id)
        .await
        .expect("list gallery associations")
        .into_iter()
        .map(|row| (row.look_id, row.is_featured))
        .collect()
}

pub async fn look_rows(db: &DatabaseConnection, look_id: i32) -> Vec<gallery_look::Model> {
    GalleryLookService::list_for_look(db.as_ref(), look_id)
        .await
        .expect("list look associations")
}
