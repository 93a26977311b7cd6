//! 拖拽排序用的纯函数
//!
//! 每次都返回新的列表；id 不存在（或未给出）时原样返回。

use std::borrow::Cow;

pub trait HasStringId {
    fn string_id(&self) -> Cow<'_, str>;
}

impl HasStringId for String {
    fn string_id(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

pub fn index_by_id<T: HasStringId>(items: &[T], target_id: &str) -> Option<usize> {
    items.iter().position(|item| item.string_id() == target_id)
}

/// 把 `from_id` 所在的元素移动到 `to_id` 当前所在的位置
pub fn replace_order_by_id<T: HasStringId + Clone>(
    items: &[T],
    from_id: Option<&str>,
    to_id: Option<&str>,
) -> Vec<T> {
    let mut result = items.to_vec();
    let (Some(from_id), Some(to_id)) = (from_id, to_id) else {
        return result;
    };
    let (Some(from_index), Some(to_index)) =
        (index_by_id(items, from_id), index_by_id(items, to_id))
    else {
        return result;
    };

    let removed = result.remove(from_index);
    result.insert(to_index, removed);
    result
}

pub fn drop_order_by_id<T: HasStringId + Clone>(items: &[T], target_id: Option<&str>) -> Vec<T> {
    let mut result = items.to_vec();
    if let Some(index) = target_id.and_then(|id| index_by_id(items, id)) {
        result.remove(index);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn moves_item_forward() {
        let items = ids(&["a", "b", "c", "d"]);
        let moved = replace_order_by_id(&items, Some("a"), Some("c"));
        assert_eq!(moved, ids(&["b", "c", "a", "d"]));
    }

    #[test]
    fn moves_item_backward() {
        let items = ids(&["a", "b", "c", "d"]);
        let moved = replace_order_by_id(&items, Some("d"), Some("b"));
        assert_eq!(moved, ids(&["a", "d", "b", "c"]));
    }

    #[test]
    fn move_to_last_slot() {
        let items = ids(&["a", "b", "c"]);
        assert_eq!(
            replace_order_by_id(&items, Some("a"), Some("c")),
            ids(&["b", "c", "a"])
        );
    }

    #[test]
    fn unknown_or_missing_ids_leave_list_unchanged() {
        let items = ids(&["a", "b", "c"]);
        assert_eq!(replace_order_by_id(&items, Some("x"), Some("b")), items);
        assert_eq!(replace_order_by_id(&items, Some("a"), Some("x")), items);
        assert_eq!(replace_order_by_id(&items, None, Some("b")), items);
        assert_eq!(drop_order_by_id(&items, Some("x")), items);
        assert_eq!(drop_order_by_id(&items, None), items);
    }

    #[test]
    fn drops_item() {
        let items = ids(&["a", "b", "c"]);
        assert_eq!(drop_order_by_id(&items, Some("b")), ids(&["a", "c"]));
    }

    #[test]
    fn index_lookup() {
        let items = ids(&["a", "b"]);
        assert_eq!(index_by_id(&items, "b"), Some(1));
        assert_eq!(index_by_id(&items, "z"), None);
    }
}
