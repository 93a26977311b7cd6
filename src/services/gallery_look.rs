use std::collections::HashSet;

use sea_orm::{sea_query::OnConflict, *};

use crate::{
    entities::{
        gallery, gallery_look, look,
        prelude::{Gallery, GalleryLook, Look},
    },
    errors::{AppError, AppResult},
    schemas::gallery::GalleryLookSnapshot,
    services::{
        database::{begin_transaction, commit_transaction, DatabaseConnection},
        session::ShopSession,
    },
};

/// 增量同步的结果，列出变动的 gallery id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: Vec<i32>,
    pub removed: Vec<i32>,
}

impl SyncReport {
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// 去重并保留首次出现的顺序
fn dedup_ids(ids: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

fn missing_ids(requested: &[i32], found: &HashSet<i32>) -> Vec<i32> {
    dedup_ids(requested)
        .into_iter()
        .filter(|id| !found.contains(id))
        .collect()
}

/// 列表下标转为 `position` 列的值
fn position_at(index: usize) -> AppResult<i32> {
    i32::try_from(index)
        .map_err(|_| AppError::Validation(format!("gallery 中的 look 数量超出上限: {index}")))
}

pub async fn ensure_looks_exist<C: ConnectionTrait>(conn: &C, ids: &[i32]) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let found: HashSet<i32> = Look::find()
        .select_only()
        .column(look::Column::Id)
        .filter(look::Column::Id.is_in(ids.iter().copied()))
        .into_tuple::<i32>()
        .all(conn)
        .await?
        .into_iter()
        .collect();

    let missing = missing_ids(ids, &found);
    if missing.is_empty() {
        Ok(())
    } else {
        tracing::warn!("引用的 look 不存在: missing={:?}", missing);
        Err(AppError::missing_looks(missing))
    }
}

pub async fn ensure_galleries_exist<C: ConnectionTrait>(conn: &C, ids: &[i32]) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let found: HashSet<i32> = Gallery::find()
        .select_only()
        .column(gallery::Column::Id)
        .filter(gallery::Column::Id.is_in(ids.iter().copied()))
        .into_tuple::<i32>()
        .all(conn)
        .await?
        .into_iter()
        .collect();

    let missing = missing_ids(ids, &found);
    if missing.is_empty() {
        Ok(())
    } else {
        tracing::warn!("引用的 gallery 不存在: missing={:?}", missing);
        Err(AppError::missing_galleries(missing))
    }
}

pub struct GalleryLookService;

impl GalleryLookService {
    /// 用完整列表整体替换 gallery 的关联（gallery 编辑页）
    ///
    /// 旧关联全部删除后按给定顺序重建，`position` 即下标。
    /// 任一 id 不存在时整个事务回滚，原有关联保持不变。
    pub async fn replace_gallery_associations(
        db: &DatabaseConnection,
        session: &ShopSession,
        gallery_id: i32,
        looks: &GalleryLookSnapshot,
    ) -> AppResult<()> {
        let txn = begin_transaction(db).await?;
        Self::replace_in(&txn, gallery_id, looks).await?;
        commit_transaction(txn).await?;

        tracing::info!(
            "gallery 关联已整体替换: shop={}, gallery_id={}, looks={}",
            session,
            gallery_id,
            looks.len()
        );
        Ok(())
    }

    /// 在调用方的事务内执行整体替换
    pub async fn replace_in<C: ConnectionTrait>(
        conn: &C,
        gallery_id: i32,
        looks: &GalleryLookSnapshot,
    ) -> AppResult<()> {
        looks.check_unique()?;
        ensure_galleries_exist(conn, &[gallery_id]).await?;
        ensure_looks_exist(conn, &looks.look_ids()).await?;

        let deleted = GalleryLook::delete_many()
            .filter(gallery_look::Column::GalleryId.eq(gallery_id))
            .exec(conn)
            .await?;

        tracing::debug!(
            "删除旧的 gallery 关联: gallery_id={}, count={}",
            gallery_id,
            deleted.rows_affected
        );

        if looks.is_empty() {
            return Ok(());
        }

        let rows = looks
            .looks()
            .iter()
            .enumerate()
            .map(|(index, association)| {
                Ok(gallery_look::ActiveModel {
                    gallery_id: Set(gallery_id),
                    look_id: Set(association.look_id),
                    is_featured: Set(association.is_featured),
                    position: Set(position_at(index)?),
                    ..Default::default()
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        GalleryLook::insert_many(rows)
            .exec_without_returning(conn)
            .await?;

        Ok(())
    }

    /// 从 look 一侧增量同步所属 gallery（look 编辑页）
    ///
    /// 只删除不再需要的关联、只追加新的关联；保留下来的关联
    /// 不做任何写入，featured 与顺序都不受影响。重复调用不会再产生变更。
    pub async fn sync_look_associations(
        db: &DatabaseConnection,
        session: &ShopSession,
        look_id: i32,
        desired_gallery_ids: &[i32],
    ) -> AppResult<SyncReport> {
        let txn = begin_transaction(db).await?;
        let report = Self::sync_in(&txn, look_id, desired_gallery_ids).await?;
        commit_transaction(txn).await?;

        tracing::info!(
            "look 关联已同步: shop={}, look_id={}, added={:?}, removed={:?}",
            session,
            look_id,
            report.added,
            report.removed
        );
        Ok(report)
    }

    /// 在调用方的事务内执行增量同步
    pub async fn sync_in<C: ConnectionTrait>(
        conn: &C,
        look_id: i32,
        desired_gallery_ids: &[i32],
    ) -> AppResult<SyncReport> {
        let desired = dedup_ids(desired_gallery_ids);

        ensure_looks_exist(conn, &[look_id]).await?;
        ensure_galleries_exist(conn, &desired).await?;

        let current = Self::list_for_look(conn, look_id).await?;
        let desired_set: HashSet<i32> = desired.iter().copied().collect();
        let current_set: HashSet<i32> = current.iter().map(|row| row.gallery_id).collect();

        let (stale_rows, stale_galleries): (Vec<i32>, Vec<i32>) = current
            .iter()
            .filter(|row| !desired_set.contains(&row.gallery_id))
            .map(|row| (row.id, row.gallery_id))
            .unzip();

        if !stale_rows.is_empty() {
            GalleryLook::delete_many()
                .filter(gallery_look::Column::Id.is_in(stale_rows))
                .exec(conn)
                .await?;
        }

        let added: Vec<i32> = desired
            .into_iter()
            .filter(|gallery_id| !current_set.contains(gallery_id))
            .collect();

        Self::append_associations(conn, look_id, &added).await?;

        Ok(SyncReport {
            added,
            removed: stale_galleries,
        })
    }

    /// 把 look 追加到各 gallery 末尾，featured 为 false
    ///
    /// 已存在的 `(gallery_id, look_id)` 组合直接跳过，不报错也不改动原有行。
    async fn append_associations<C: ConnectionTrait>(
        conn: &C,
        look_id: i32,
        gallery_ids: &[i32],
    ) -> AppResult<u64> {
        if gallery_ids.is_empty() {
            return Ok(0);
        }

        let mut rows = Vec::with_capacity(gallery_ids.len());
        for gallery_id in gallery_ids {
            let position = Self::next_position(conn, *gallery_id).await?;
            rows.push(gallery_look::ActiveModel {
                gallery_id: Set(*gallery_id),
                look_id: Set(look_id),
                is_featured: Set(false),
                position: Set(position),
                ..Default::default()
            });
        }

        let inserted = GalleryLook::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    gallery_look::Column::GalleryId,
                    gallery_look::Column::LookId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;

        if inserted < gallery_ids.len() as u64 {
            tracing::debug!(
                "跳过已存在的关联: look_id={}, requested={}, inserted={}",
                look_id,
                gallery_ids.len(),
                inserted
            );
        }
        Ok(inserted)
    }

    /// gallery 末尾的下一个位置
    async fn next_position<C: ConnectionTrait>(conn: &C, gallery_id: i32) -> AppResult<i32> {
        let last = GalleryLook::find()
            .filter(gallery_look::Column::GalleryId.eq(gallery_id))
            .order_by_desc(gallery_look::Column::Position)
            .one(conn)
            .await?;

        Ok(last.map_or(0, |row| row.position + 1))
    }

    pub async fn set_featured(
        db: &DatabaseConnection,
        session: &ShopSession,
        gallery_id: i32,
        look_id: i32,
        featured: bool,
    ) -> AppResult<gallery_look::Model> {
        let row = GalleryLook::find()
            .filter(gallery_look::Column::GalleryId.eq(gallery_id))
            .filter(gallery_look::Column::LookId.eq(look_id))
            .one(db.as_ref())
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "gallery {gallery_id} 中没有 look {look_id}"
                ))
            })?;

        if row.is_featured == featured {
            return Ok(row);
        }

        let mut active: gallery_look::ActiveModel = row.into();
        active.is_featured = Set(featured);
        let updated = active.update(db.as_ref()).await?;

        tracing::info!(
            "featured 已更新: shop={}, gallery_id={}, look_id={}, featured={}",
            session,
            gallery_id,
            look_id,
            featured
        );
        Ok(updated)
    }

    /// gallery 内的关联，按 `position` 排列
    pub async fn list_for_gallery<C: ConnectionTrait>(
        conn: &C,
        gallery_id: i32,
    ) -> AppResult<Vec<gallery_look::Model>> {
        Ok(GalleryLook::find()
            .filter(gallery_look::Column::GalleryId.eq(gallery_id))
            .order_by_asc(gallery_look::Column::Position)
            .order_by_asc(gallery_look::Column::Id)
            .all(conn)
            .await?)
    }

    /// look 的关联，按创建顺序排列
    pub async fn list_for_look<C: ConnectionTrait>(
        conn: &C,
        look_id: i32,
    ) -> AppResult<Vec<gallery_look::Model>> {
        Ok(GalleryLook::find()
            .filter(gallery_look::Column::LookId.eq(look_id))
            .order_by_asc(gallery_look::Column::Id)
            .all(conn)
            .await?)
    }

    pub async fn remove_for_looks<C: ConnectionTrait>(conn: &C, look_ids: &[i32]) -> AppResult<u64> {
        if look_ids.is_empty() {
            return Ok(0);
        }
        let result = GalleryLook::delete_many()
            .filter(gallery_look::Column::LookId.is_in(look_ids.iter().copied()))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn remove_for_galleries<C: ConnectionTrait>(
        conn: &C,
        gallery_ids: &[i32],
    ) -> AppResult<u64> {
        if gallery_ids.is_empty() {
            return Ok(0);
        }
        let result = GalleryLook::delete_many()
            .filter(gallery_look::Column::GalleryId.is_in(gallery_ids.iter().copied()))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::schemas::{
        gallery::{GalleryRequest, LookAssociation},
        look::NewLook,
    };
    use crate::services::database::{ensure_schema, establish_connection};
    use crate::services::{GalleryService, LookService};

    #[test]
    fn dedup_keeps_first_occurrence() {
        assert_eq!(dedup_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn missing_ids_reported_once_in_request_order() {
        let found: HashSet<i32> = [1, 2].into_iter().collect();
        assert_eq!(missing_ids(&[9, 1, 9, 2, 7], &found), vec![9, 7]);
    }

    #[test]
    fn position_overflow_is_validation_error() {
        assert_eq!(position_at(7), Ok(7));
        assert!(matches!(
            position_at(usize::MAX),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn appending_existing_pair_is_skipped() {
        let db = establish_connection(&DatabaseConfig::in_memory())
            .await
            .unwrap();
        ensure_schema(db.as_ref()).await.unwrap();
        let session = ShopSession::new("lookbook-test.myshopify.com");

        let look = LookService::create(
            &db,
            &session,
            vec![NewLook {
                media_key: "assets/look.jpg".to_string(),
                media_url: None,
            }],
        )
        .await
        .unwrap()[0]
            .id;
        let featured_in = GalleryService::create(
            &db,
            &session,
            GalleryRequest {
                title: "Featured".to_string(),
                looks: vec![LookAssociation::new(look, true)].into(),
            },
        )
        .await
        .unwrap()
        .id;
        let other = GalleryService::create(
            &db,
            &session,
            GalleryRequest {
                title: "Other".to_string(),
                looks: GalleryLookSnapshot::default(),
            },
        )
        .await
        .unwrap()
        .id;

        // 模拟并发：另一个事务已写入 (featured_in, look)
        let inserted =
            GalleryLookService::append_associations(db.as_ref(), look, &[featured_in, other])
                .await
                .unwrap();
        assert_eq!(inserted, 1);

        let rows = GalleryLookService::list_for_look(db.as_ref(), look)
            .await
            .unwrap();
        let pairs: Vec<(i32, bool, i32)> = rows
            .iter()
            .map(|row| (row.gallery_id, row.is_featured, row.position))
            .collect();
        assert_eq!(pairs, vec![(featured_in, true, 0), (other, false, 0)]);
    }

    #[test]
    fn empty_report_is_unchanged() {
        assert!(SyncReport::default().is_unchanged());
        assert!(!SyncReport {
            added: vec![1],
            removed: vec![]
        }
        .is_unchanged());
    }
}
