//! Invalidation notice parsing tests

use gatehouse_domain::InvalidationNotice;

#[test]
fn test_parse_json_object() {
    let notice = InvalidationNotice::parse(r#"{"keys": ["products_feed", "other"]}"#).unwrap();
    assert_eq!(notice.keys, vec!["products_feed", "other"]);
}

#[test]
fn test_parse_json_array() {
    let notice = InvalidationNotice::parse(r#"["a", "b"]"#).unwrap();
    assert_eq!(notice.keys, vec!["a", "b"]);
}

#[test]
fn test_parse_bare_key() {
    let notice = InvalidationNotice::parse("  products_feed\n").unwrap();
    assert_eq!(notice.keys, vec!["products_feed"]);
}

#[test]
fn test_parse_empty_payload() {
    let notice = InvalidationNotice::parse("").unwrap();
    assert!(notice.is_empty());
}

#[test]
fn test_parse_broken_json_is_rejected() {
    assert!(InvalidationNotice::parse("{keys: nope").is_err());
}

#[test]
fn test_payload_is_parseable() {
    let notice = InvalidationNotice::for_keys(["products_feed"]);
    let payload = notice.to_payload().unwrap();
    assert_eq!(InvalidationNotice::parse(&payload).unwrap(), notice);
}
