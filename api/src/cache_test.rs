use super::*;
use serde_json::json;

#[test]
fn fresh_entry_is_returned() {
    let cache = QueryCache::new();
    let now = Instant::now();
    cache.insert_at("product/category".into(), REFERENCE_TTL, json!([1, 2]), now);
    assert_eq!(cache.get_at("product/category", now + Duration::from_secs(60)), Some(json!([1, 2])));
}

#[test]
fn stale_entry_is_evicted_on_read() {
    let cache = QueryCache::new();
    let now = Instant::now();
    cache.insert_at("product/get/1".into(), DETAIL_TTL, json!({"id": 1}), now);
    assert_eq!(cache.get_at("product/get/1", now + DETAIL_TTL), None);
    assert!(cache.is_empty());
}

#[test]
fn missing_key_is_none() {
    assert_eq!(QueryCache::new().get("nope"), None);
}

#[test]
fn invalidate_prefix_keeps_other_keys() {
    let cache = QueryCache::new();
    cache.insert("product/get/1".into(), DETAIL_TTL, json!(1));
    cache.insert("product/get/2".into(), DETAIL_TTL, json!(2));
    cache.insert("product/category".into(), REFERENCE_TTL, json!([]));
    cache.invalidate_prefix("product/get/");
    assert_eq!(cache.len(), 1);
    assert!(cache.get("product/category").is_some());
}

#[test]
fn clear_empties_everything() {
    let cache = QueryCache::new();
    cache.insert("a".into(), LIST_TTL, json!(null));
    cache.insert("b".into(), LIST_TTL, json!(null));
    cache.clear();
    assert!(cache.is_empty());
}
