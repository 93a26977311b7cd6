use sea_orm::{
    sea_query::Index, ConnectOptions, ConnectionTrait, Database,
    DatabaseConnection as SeaOrmDatabaseConnection, DatabaseTransaction, DbErr, Schema, Statement,
    TransactionTrait,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::entities::{gallery_look, prelude::*};
use crate::errors::{AppError, AppResult};

pub type DatabaseConnection = Arc<SeaOrmDatabaseConnection>;

pub const GALLERY_LOOK_PAIR_INDEX: &str = "uq_gallery_look_pair";

pub async fn establish_connection(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(&config.url);

    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout))
        .idle_timeout(Duration::from_secs(config.idle_timeout))
        .max_lifetime(Duration::from_secs(28800))
        .sqlx_logging(false);

    info!(
        "配置数据库连接池: 最小连接数={}, 最大连接数={}",
        config.min_connections, config.max_connections
    );

    let db = Database::connect(opt).await?;
    let connection = Arc::new(db);

    if let Err(e) = warm_up_connection_pool(&connection).await {
        tracing::warn!("⚠️  连接池预热失败: {}", e);
    } else {
        info!("数据库连接池预热成功");
    }

    Ok(connection)
}

async fn warm_up_connection_pool(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Statement::from_string(db.get_database_backend(), "SELECT 1".to_owned());

    for i in 1..=3 {
        match db.execute(stmt.clone()).await {
            Ok(_) => {
                tracing::debug!("连接池预热查询 {} 完成", i);
            }
            Err(e) => {
                tracing::warn!("⚠️  连接池预热查询 {} 失败: {}", i, e);
                return Err(e);
            }
        }
    }

    Ok(())
}

/// 按实体定义建表（已存在则跳过）
///
/// 父表先建；`gallery_look` 带 `(gallery_id, look_id)` 唯一约束。
pub async fn ensure_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let statements = [
        schema
            .create_table_from_entity(Look)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(Gallery)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(GalleryLook)
            .if_not_exists()
            .index(
                Index::create()
                    .name(GALLERY_LOOK_PAIR_INDEX)
                    .col(gallery_look::Column::GalleryId)
                    .col(gallery_look::Column::LookId)
                    .unique(),
            )
            .to_owned(),
        schema
            .create_table_from_entity(LookProduct)
            .if_not_exists()
            .to_owned(),
    ];

    for statement in statements.iter() {
        db.execute(backend.build(statement)).await?;
    }

    info!("数据表检查完成: backend={:?}", backend);
    Ok(())
}

/// 开启事务；失败视为存储不可用
pub async fn begin_transaction(db: &DatabaseConnection) -> AppResult<DatabaseTransaction> {
    db.begin().await.map_err(|e| {
        tracing::error!("开启事务失败: {}", e);
        AppError::StoreUnavailable(format!("无法开启事务: {e}"))
    })
}

/// 提交事务；提交失败时整个操作都没有生效
pub async fn commit_transaction(txn: DatabaseTransaction) -> AppResult<()> {
    txn.commit().await.map_err(|e| {
        tracing::error!("提交事务失败: {}", e);
        AppError::StoreUnavailable(format!("无法提交事务: {e}"))
    })
}
