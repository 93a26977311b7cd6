use url::Url;

/// 店铺 CDN 默认输出宽度
pub const DEFAULT_IMAGE_WIDTH: &str = "800";

/// 给媒体 URL 加上（或覆盖）`width` 查询参数
///
/// 空值返回 `None`；无法解析的 URL 原样返回，只记一条警告。
pub fn add_width_query(url: Option<&str>, width: &str) -> Option<String> {
    let raw = url.filter(|s| !s.is_empty())?;

    let mut parsed = match Url::parse(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("媒体 URL 无法解析: url={}, error={}", raw, e);
            return Some(raw.to_string());
        }
    };

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| key != "width")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    parsed
        .query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("width", width);

    Some(parsed.to_string())
}

pub fn media_url(url: Option<&str>) -> Option<String> {
    add_width_query(url, DEFAULT_IMAGE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_width() {
        assert_eq!(
            media_url(Some("https://cdn.shopify.com/s/files/look.jpg")).as_deref(),
            Some("https://cdn.shopify.com/s/files/look.jpg?width=800")
        );
    }

    #[test]
    fn keeps_other_params_and_overrides_width() {
        assert_eq!(
            add_width_query(Some("https://cdn.example.com/a.jpg?v=12&width=100"), "400")
                .as_deref(),
            Some("https://cdn.example.com/a.jpg?v=12&width=400")
        );
    }

    #[test]
    fn empty_values_pass_through() {
        assert_eq!(media_url(None), None);
        assert_eq!(media_url(Some("")), None);
    }

    #[test]
    fn unparsable_url_is_returned_as_is() {
        assert_eq!(
            media_url(Some("assets/look.jpg")).as_deref(),
            Some("assets/look.jpg")
        );
    }
}
