use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    /// 引用的 look / gallery 不存在，整个操作已回滚
    #[error("Referential integrity error: {entity} {missing:?} not found")]
    ReferentialIntegrity {
        entity: String,
        missing: Vec<i32>,
    },

    /// 存储不可达或事务无法提交
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn missing_looks(missing: Vec<i32>) -> Self {
        AppError::ReferentialIntegrity {
            entity: "look".to_string(),
            missing,
        }
    }

    pub fn missing_galleries(missing: Vec<i32>) -> Self {
        AppError::ReferentialIntegrity {
            entity: "gallery".to_string(),
            missing,
        }
    }

    /// 调用方是否应当重试整个操作（不是从中途继续）
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_))
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
                AppError::StoreUnavailable(err.to_string())
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
