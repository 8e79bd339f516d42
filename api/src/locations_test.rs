use super::*;
use serde_json::json;

#[test]
fn accepts_every_envelope_shape() {
    let expected = vec![Place { id: "1".into(), name: "Bali".into() }];
    for body in [
        json!([{"id": 1, "name": "Bali"}]),
        json!({"content": [{"id": 1, "name": "Bali"}]}),
        json!({"content": {"result": [{"province_id": "1", "province": "Bali"}]}}),
        json!({"data": [{"id": "1", "name": "Bali"}]}),
    ] {
        assert_eq!(place_list("provinces", body).unwrap(), expected);
    }
}

#[test]
fn missing_list_is_empty() {
    assert!(place_list("cities", json!({"content": {"result": null}})).unwrap().is_empty());
    assert!(place_list("cities", Value::Null).unwrap().is_empty());
}
