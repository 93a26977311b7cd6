use serde::{Deserialize, Serialize};

/// 发起写操作的店铺身份
///
/// 由上层（认证之后）显式传入每个写操作，只用于日志归属。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSession {
    pub shop: String,
}

impl ShopSession {
    pub fn new(shop: impl Into<String>) -> Self {
        Self { shop: shop.into() }
    }
}

impl std::fmt::Display for ShopSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.shop)
    }
}
