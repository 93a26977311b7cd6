use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::*;
use validator::Validate;

use crate::{
    entities::{
        gallery, gallery_look, look,
        prelude::{Gallery, GalleryLook, Look},
    },
    errors::{AppError, AppResult},
    schemas::{
        gallery::{
            GalleryLookEntry, GalleryLookSnapshot, GalleryRequest, GalleryResponse,
            LookAssociation, UpdateGalleryRequest,
        },
        look::ProductTag,
    },
    services::{
        database::{begin_transaction, commit_transaction, DatabaseConnection},
        gallery_look::{ensure_galleries_exist, GalleryLookService},
        look_product::LookProductService,
        ordering::replace_order_by_id,
        session::ShopSession,
        utils::media_url,
    },
};

pub struct GalleryService;

impl GalleryService {
    /// 新建 gallery（默认未启用）并写入初始 look 列表
    pub async fn create(
        db: &DatabaseConnection,
        session: &ShopSession,
        request: GalleryRequest,
    ) -> AppResult<GalleryResponse> {
        request.validate()?;

        let now = Utc::now();
        let txn = begin_transaction(db).await?;
        let created = gallery::ActiveModel {
            title: Set(request.title.clone()),
            is_active: Set(false),
            registered_at: Set(now),
            modified_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        GalleryLookService::replace_in(&txn, created.id, &request.looks).await?;
        commit_transaction(txn).await?;

        tracing::info!(
            "gallery 已创建: shop={}, gallery_id={}, looks={}",
            session,
            created.id,
            request.looks.len()
        );

        Self::get_by_id(db, created.id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("新建的 gallery {} 读取失败", created.id)))
    }

    pub async fn get_all(db: &DatabaseConnection) -> AppResult<Vec<GalleryResponse>> {
        let galleries = Gallery::find()
            .order_by_desc(gallery::Column::Id)
            .all(db.as_ref())
            .await?;

        let gallery_ids: Vec<i32> = galleries.iter().map(|g| g.id).collect();
        let mut entries = Self::load_entries(db.as_ref(), &gallery_ids, None).await?;

        Ok(galleries
            .into_iter()
            .map(|gallery| {
                let looks = entries.remove(&gallery.id).unwrap_or_default();
                build_response(gallery, looks)
            })
            .collect())
    }

    pub async fn get_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> AppResult<Option<GalleryResponse>> {
        Self::find_with_entries(db, id, None).await
    }

    /// 店铺前台读取：只包含启用且处于发布窗口内的 look，并带上商品标记
    pub async fn get_public(
        db: &DatabaseConnection,
        id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<Option<GalleryResponse>> {
        Self::find_with_entries(db, id, Some(now)).await
    }

    async fn find_with_entries(
        db: &DatabaseConnection,
        id: i32,
        visible_at: Option<DateTime<Utc>>,
    ) -> AppResult<Option<GalleryResponse>> {
        let Some(gallery) = Gallery::find_by_id(id).one(db.as_ref()).await? else {
            return Ok(None);
        };

        let looks = Self::load_entries(db.as_ref(), &[gallery.id], visible_at)
            .await?
            .remove(&gallery.id)
            .unwrap_or_default();
        Ok(Some(build_response(gallery, looks)))
    }

    /// 更新 gallery 并用提交的完整列表整体替换 look
    pub async fn update(
        db: &DatabaseConnection,
        session: &ShopSession,
        id: i32,
        request: UpdateGalleryRequest,
    ) -> AppResult<GalleryResponse> {
        request.validate()?;

        let txn = begin_transaction(db).await?;
        let existing = Gallery::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("gallery {id} 不存在")))?;

        let mut active: gallery::ActiveModel = existing.into();
        active.title = Set(request.title.clone());
        active.is_active = Set(request.is_active);
        active.modified_at = Set(Some(Utc::now()));
        active.update(&txn).await?;

        GalleryLookService::replace_in(&txn, id, &request.looks).await?;
        commit_transaction(txn).await?;

        tracing::info!(
            "gallery 已更新: shop={}, gallery_id={}, is_active={}, looks={}",
            session,
            id,
            request.is_active,
            request.looks.len()
        );

        Self::get_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("gallery {id} 不存在")))
    }

    /// 拖拽：把 `from_look_id` 移到 `to_look_id` 当前的位置，再整体替换
    ///
    /// 任一 look 不在该 gallery 中时不做任何写入。
    pub async fn move_look(
        db: &DatabaseConnection,
        session: &ShopSession,
        gallery_id: i32,
        from_look_id: i32,
        to_look_id: i32,
    ) -> AppResult<Vec<LookAssociation>> {
        let txn = begin_transaction(db).await?;
        ensure_galleries_exist(&txn, &[gallery_id]).await?;

        let current: Vec<LookAssociation> =
            GalleryLookService::list_for_gallery(&txn, gallery_id)
                .await?
                .into_iter()
                .map(|row| LookAssociation::new(row.look_id, row.is_featured))
                .collect();

        let from = from_look_id.to_string();
        let to = to_look_id.to_string();
        let reordered = replace_order_by_id(&current, Some(from.as_str()), Some(to.as_str()));

        if reordered == current {
            tracing::debug!(
                "顺序未变化: gallery_id={}, from={}, to={}",
                gallery_id,
                from_look_id,
                to_look_id
            );
            return Ok(current);
        }

        let snapshot = GalleryLookSnapshot::new(reordered.clone());
        GalleryLookService::replace_in(&txn, gallery_id, &snapshot).await?;
        commit_transaction(txn).await?;

        tracing::info!(
            "gallery 顺序已调整: shop={}, gallery_id={}, from={}, to={}",
            session,
            gallery_id,
            from_look_id,
            to_look_id
        );
        Ok(reordered)
    }

    /// 删除 gallery 及其全部关联；有任何一条被删除时返回 true
    pub async fn remove(
        db: &DatabaseConnection,
        session: &ShopSession,
        ids: &[i32],
    ) -> AppResult<bool> {
        if ids.is_empty() {
            return Ok(false);
        }

        let txn = begin_transaction(db).await?;
        let associations = GalleryLookService::remove_for_galleries(&txn, ids).await?;
        let deleted = Gallery::delete_many()
            .filter(gallery::Column::Id.is_in(ids.iter().copied()))
            .exec(&txn)
            .await?;
        commit_transaction(txn).await?;

        tracing::info!(
            "gallery 已删除: shop={}, ids={:?}, galleries={}, associations={}",
            session,
            ids,
            deleted.rows_affected,
            associations
        );
        Ok(deleted.rows_affected > 0)
    }

    /// 批量读取多个 gallery 的 look，各自按 `position` 排列
    ///
    /// 给定 `visible_at` 时只保留可见的 look 并附带商品标记。
    async fn load_entries<C: ConnectionTrait>(
        conn: &C,
        gallery_ids: &[i32],
        visible_at: Option<DateTime<Utc>>,
    ) -> AppResult<HashMap<i32, Vec<GalleryLookEntry>>> {
        if gallery_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let associations = GalleryLook::find()
            .filter(gallery_look::Column::GalleryId.is_in(gallery_ids.iter().copied()))
            .order_by_asc(gallery_look::Column::Position)
            .order_by_asc(gallery_look::Column::Id)
            .all(conn)
            .await?;
        if associations.is_empty() {
            return Ok(HashMap::new());
        }

        let mut look_ids: Vec<i32> = associations.iter().map(|a| a.look_id).collect();
        look_ids.sort_unstable();
        look_ids.dedup();

        let looks: HashMap<i32, look::Model> = Look::find()
            .filter(look::Column::Id.is_in(look_ids.clone()))
            .all(conn)
            .await?
            .into_iter()
            .map(|l| (l.id, l))
            .collect();

        let mut products_by_look: HashMap<i32, Vec<ProductTag>> = HashMap::new();
        if visible_at.is_some() {
            for product in LookProductService::list_for_looks(conn, &look_ids).await? {
                products_by_look
                    .entry(product.look_id)
                    .or_default()
                    .push(product.into());
            }
        }

        let mut entries: HashMap<i32, Vec<GalleryLookEntry>> = HashMap::new();
        let mut dangling = Vec::new();
        for association in associations {
            let Some(look) = looks.get(&association.look_id) else {
                dangling.push((association.gallery_id, association.look_id));
                continue;
            };
            if let Some(now) = visible_at {
                if !look.is_visible_at(now) {
                    continue;
                }
            }
            let products = products_by_look
                .get(&association.look_id)
                .cloned()
                .unwrap_or_default();
            entries
                .entry(association.gallery_id)
                .or_default()
                .push(build_entry(look, &association, products));
        }

        if !dangling.is_empty() {
            tracing::warn!(
                "gallery 关联指向不存在的 look: (gallery_id, look_id)={:?}",
                dangling
            );
        }

        Ok(entries)
    }

    /// 统计 gallery 数量，启动时汇报用
    pub async fn count(db: &DatabaseConnection) -> AppResult<u64> {
        Ok(Gallery::find().count(db.as_ref()).await?)
    }
}

fn build_entry(
    look: &look::Model,
    association: &gallery_look::Model,
    products: Vec<ProductTag>,
) -> GalleryLookEntry {
    GalleryLookEntry {
        id: look.id,
        media_key: look.media_key.clone(),
        media_url: media_url(look.media_url.as_deref()),
        is_active: look.is_active,
        should_display_product: look.should_display_product,
        model_description: look.model_description.clone(),
        published_at: look.published_at,
        unpublished_at: look.unpublished_at,
        is_featured: association.is_featured,
        position: association.position,
        products,
    }
}

fn build_response(gallery: gallery::Model, looks: Vec<GalleryLookEntry>) -> GalleryResponse {
    GalleryResponse {
        id: gallery.id,
        title: gallery.title,
        is_active: gallery.is_active,
        registered_at: gallery.registered_at,
        modified_at: gallery.modified_at,
        looks,
    }
}
