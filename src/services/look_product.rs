use sea_orm::*;

use crate::{
    entities::{look_product, prelude::LookProduct},
    errors::AppResult,
    schemas::look::ProductTag,
};

pub struct LookProductService;

impl LookProductService {
    /// 整体替换 look 的商品标记
    pub async fn replace_in<C: ConnectionTrait>(
        conn: &C,
        look_id: i32,
        products: &[ProductTag],
    ) -> AppResult<()> {
        LookProduct::delete_many()
            .filter(look_product::Column::LookId.eq(look_id))
            .exec(conn)
            .await?;

        if products.is_empty() {
            return Ok(());
        }

        let rows = products.iter().map(|product| look_product::ActiveModel {
            look_id: Set(look_id),
            product_id: Set(product.product_id.clone()),
            product_handle: Set(product.product_handle.clone()),
            spot_x: Set(product.spot_x),
            spot_y: Set(product.spot_y),
            ..Default::default()
        });

        LookProduct::insert_many(rows)
            .exec_without_returning(conn)
            .await?;

        tracing::debug!(
            "商品标记已替换: look_id={}, count={}",
            look_id,
            products.len()
        );
        Ok(())
    }

    pub async fn list_for_looks<C: ConnectionTrait>(
        conn: &C,
        look_ids: &[i32],
    ) -> AppResult<Vec<look_product::Model>> {
        if look_ids.is_empty() {
            return Ok(vec![]);
        }

        Ok(LookProduct::find()
            .filter(look_product::Column::LookId.is_in(look_ids.iter().copied()))
            .order_by_asc(look_product::Column::Id)
            .all(conn)
            .await?)
    }

    pub async fn remove_for_looks<C: ConnectionTrait>(conn: &C, look_ids: &[i32]) -> AppResult<u64> {
        if look_ids.is_empty() {
            return Ok(0);
        }
        let result = LookProduct::delete_many()
            .filter(look_product::Column::LookId.is_in(look_ids.iter().copied()))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}

impl From<look_product::Model> for ProductTag {
    fn from(model: look_product::Model) -> Self {
        ProductTag {
            product_id: model.product_id,
            product_handle: model.product_handle,
            spot_x: model.spot_x,
            spot_y: model.spot_y,
        }
    }
}
