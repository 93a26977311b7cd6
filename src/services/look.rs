use std::collections::HashMap;

use chrono::Utc;
use sea_orm::*;
use validator::Validate;

use crate::{
    entities::{
        gallery, gallery_look, look,
        prelude::{Gallery, GalleryLook, Look},
    },
    errors::{AppError, AppResult},
    schemas::look::{LookGallery, LookResponse, NewLook, ProductTag, UpdateLookRequest},
    services::{
        database::{begin_transaction, commit_transaction, DatabaseConnection},
        gallery_look::GalleryLookService,
        look_product::LookProductService,
        session::ShopSession,
        utils::media_url,
    },
};

pub struct LookService;

impl LookService {
    /// 以已上传的媒体创建 look，按 id 倒序返回（与列表顺序一致）
    pub async fn create(
        db: &DatabaseConnection,
        session: &ShopSession,
        medias: Vec<NewLook>,
    ) -> AppResult<Vec<LookResponse>> {
        for media in &medias {
            media.validate()?;
        }
        if medias.is_empty() {
            return Ok(vec![]);
        }

        let now = Utc::now();
        let txn = begin_transaction(db).await?;
        let mut created = Vec::with_capacity(medias.len());
        for media in medias {
            let model = look::ActiveModel {
                media_key: Set(media.media_key),
                media_url: Set(media.media_url),
                is_active: Set(true),
                should_display_product: Set(false),
                model_description: Set(None),
                published_at: Set(None),
                unpublished_at: Set(None),
                registered_at: Set(now),
                modified_at: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            created.push(model);
        }
        commit_transaction(txn).await?;

        tracing::info!("look 已创建: shop={}, count={}", session, created.len());

        Ok(created
            .into_iter()
            .rev()
            .map(|model| build_response(model, vec![], vec![]))
            .collect())
    }

    pub async fn get_all(db: &DatabaseConnection) -> AppResult<Vec<LookResponse>> {
        let looks = Look::find()
            .order_by_desc(look::Column::Id)
            .all(db.as_ref())
            .await?;

        Self::attach_relations(db.as_ref(), looks).await
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> AppResult<Option<LookResponse>> {
        let Some(look) = Look::find_by_id(id).one(db.as_ref()).await? else {
            return Ok(None);
        };

        Ok(Self::attach_relations(db.as_ref(), vec![look])
            .await?
            .into_iter()
            .next())
    }

    /// 更新 look 本身、增量同步所属 gallery、整体替换商品标记，全部在一个事务内
    pub async fn update(
        db: &DatabaseConnection,
        session: &ShopSession,
        id: i32,
        request: UpdateLookRequest,
    ) -> AppResult<LookResponse> {
        request.validate()?;

        let txn = begin_transaction(db).await?;

        let existing = Look::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("look {id} 不存在")))?;

        let mut active: look::ActiveModel = existing.into();
        active.is_active = Set(request.is_active);
        active.should_display_product = Set(request.should_display_product);
        active.model_description = Set(request.model_description.clone());
        active.published_at = Set(request.published_at);
        active.unpublished_at = Set(request.unpublished_at);
        active.modified_at = Set(Some(Utc::now()));
        active.update(&txn).await?;

        let report = GalleryLookService::sync_in(&txn, id, &request.gallery_ids).await?;
        LookProductService::replace_in(&txn, id, &request.products).await?;

        commit_transaction(txn).await?;

        tracing::info!(
            "look 已更新: shop={}, look_id={}, galleries_added={:?}, galleries_removed={:?}, products={}",
            session,
            id,
            report.added,
            report.removed,
            request.products.len()
        );

        Self::get_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("look {id} 不存在")))
    }

    /// 删除 look 及其关联与商品标记；有任何一条被删除时返回 true
    pub async fn remove(
        db: &DatabaseConnection,
        session: &ShopSession,
        ids: &[i32],
    ) -> AppResult<bool> {
        if ids.is_empty() {
            return Ok(false);
        }

        let txn = begin_transaction(db).await?;
        let associations = GalleryLookService::remove_for_looks(&txn, ids).await?;
        let products = LookProductService::remove_for_looks(&txn, ids).await?;
        let deleted = Look::delete_many()
            .filter(look::Column::Id.is_in(ids.iter().copied()))
            .exec(&txn)
            .await?;
        commit_transaction(txn).await?;

        tracing::info!(
            "look 已删除: shop={}, ids={:?}, looks={}, associations={}, products={}",
            session,
            ids,
            deleted.rows_affected,
            associations,
            products
        );
        Ok(deleted.rows_affected > 0)
    }

    /// 统计 look 数量，启动时汇报用
    pub async fn count(db: &DatabaseConnection) -> AppResult<u64> {
        Ok(Look::find().count(db.as_ref()).await?)
    }

    async fn attach_relations<C: ConnectionTrait>(
        conn: &C,
        looks: Vec<look::Model>,
    ) -> AppResult<Vec<LookResponse>> {
        if looks.is_empty() {
            return Ok(vec![]);
        }

        let look_ids: Vec<i32> = looks.iter().map(|l| l.id).collect();

        let associations = GalleryLook::find()
            .filter(gallery_look::Column::LookId.is_in(look_ids.clone()))
            .order_by_asc(gallery_look::Column::Id)
            .all(conn)
            .await?;

        let gallery_ids: Vec<i32> = associations.iter().map(|a| a.gallery_id).collect();
        let galleries: HashMap<i32, gallery::Model> = if gallery_ids.is_empty() {
            HashMap::new()
        } else {
            Gallery::find()
                .filter(gallery::Column::Id.is_in(gallery_ids))
                .all(conn)
                .await?
                .into_iter()
                .map(|g| (g.id, g))
                .collect()
        };

        let mut galleries_by_look: HashMap<i32, Vec<LookGallery>> = HashMap::new();
        for association in associations {
            if let Some(gallery) = galleries.get(&association.gallery_id) {
                galleries_by_look
                    .entry(association.look_id)
                    .or_default()
                    .push(LookGallery {
                        id: gallery.id,
                        title: gallery.title.clone(),
                        is_active: gallery.is_active,
                        is_featured: association.is_featured,
                    });
            }
        }

        let mut products_by_look: HashMap<i32, Vec<ProductTag>> = HashMap::new();
        for product in LookProductService::list_for_looks(conn, &look_ids).await? {
            products_by_look
                .entry(product.look_id)
                .or_default()
                .push(product.into());
        }

        Ok(looks
            .into_iter()
            .map(|model| {
                let galleries = galleries_by_look.remove(&model.id).unwrap_or_default();
                let products = products_by_look.remove(&model.id).unwrap_or_default();
                build_response(model, galleries, products)
            })
            .collect())
    }
}

fn build_response(
    model: look::Model,
    galleries: Vec<LookGallery>,
    products: Vec<ProductTag>,
) -> LookResponse {
    LookResponse {
        id: model.id,
        media_url: media_url(model.media_url.as_deref()),
        media_key: model.media_key,
        is_active: model.is_active,
        should_display_product: model.should_display_product,
        model_description: model.model_description,
        published_at: model.published_at,
        unpublished_at: model.unpublished_at,
        registered_at: model.registered_at,
        modified_at: model.modified_at,
        galleries,
        products,
    }
}
