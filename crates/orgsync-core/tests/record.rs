use orgsync_core::ResourceRecord;

#[test]
fn topic_comparison_ignores_order_and_duplicates() {
    let a = ResourceRecord::new("a", "").with_topics(["x", "y"]);
    let b = ResourceRecord::new("a", "").with_topics(["y", "x", "x"]);
    let c = ResourceRecord::new("a", "").with_topics(["x"]);
    assert!(a.topics_match(&b));
    assert!(!a.topics_match(&c));
}

#[test]
fn absent_fields_deserialize_to_defaults() {
    let record: ResourceRecord = serde_json::from_str(r#"{"name":"bare"}"#).unwrap();
    assert_eq!(record.description, "");
    assert!(record.topics.is_empty());
    assert!(record.origin.is_none());
}
