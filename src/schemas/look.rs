use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 已上传到店铺主题的媒体，用来创建 look
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewLook {
    #[validate(length(min = 1, max = 255))]
    pub media_key: String,
    pub media_url: Option<String>,
}

/// 商品标记，挂在 look 图片上的坐标点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProductTag {
    #[validate(length(min = 1, max = 255))]
    pub product_id: String,
    #[validate(length(min = 1, max = 255))]
    pub product_handle: String,
    #[serde(default)]
    pub spot_x: i32,
    #[serde(default)]
    pub spot_y: i32,
}

/// look 编辑页提交的完整内容
///
/// `gallery_ids` 只做增量同步：已存在的关联保持原样（包括 featured 和顺序）。
/// `products` 则整体替换。
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_publish_window"))]
pub struct UpdateLookRequest {
    pub is_active: bool,
    pub should_display_product: bool,
    #[validate(length(max = 2000))]
    pub model_description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub unpublished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub gallery_ids: Vec<i32>,
    #[serde(default)]
    #[validate(nested)]
    pub products: Vec<ProductTag>,
}

fn validate_publish_window(request: &UpdateLookRequest) -> Result<(), ValidationError> {
    if let (Some(published), Some(unpublished)) = (request.published_at, request.unpublished_at) {
        if published >= unpublished {
            return Err(ValidationError::new("publish_window")
                .with_message("published_at 必须早于 unpublished_at".into()));
        }
    }
    Ok(())
}

/// look 所属的 gallery，按关联创建顺序排列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookGallery {
    pub id: i32,
    pub title: String,
    pub is_active: bool,
    pub is_featured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookResponse {
    pub id: i32,
    pub media_key: String,
    pub media_url: Option<String>,
    pub is_active: bool,
    pub should_display_product: bool,
    pub model_description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub unpublished_at: Option<DateTime<Utc>>,
    pub registered_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub galleries: Vec<LookGallery>,
    pub products: Vec<ProductTag>,
}
