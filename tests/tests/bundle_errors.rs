use serde_json::json;
use tests::{DbTest, EntityJson, SaveBundle};

#[tokio::test]
async fn malformed_json() {
    let test = DbTest::blog().await;

    let err = test
        .persist_manager()
        .save_changes_str("{ \"entities\": [")
        .await
        .unwrap_err();

    assert!(err.is_invalid_save_bundle());
    assert!(test.log.is_empty());
}

#[tokio::test]
async fn bundle_without_entities() {
    let test = DbTest::blog().await;

    let err = test
        .persist_manager()
        .save_changes_str(r#"{ "saveOptions": {} }"#)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid save bundle: save bundle must contain an array of entities"
    );
}

#[tokio::test]
async fn unknown_entity_types_reject_the_whole_bundle() {
    let test = DbTest::blog().await;

    let mut bundle = SaveBundle::new()
        .entity(EntityJson::added("Blog", json!({ "id": -1, "url": "b" })).identity("id"))
        .to_json();
    bundle["entities"].as_array_mut().unwrap().push(json!({
        "name": "rust",
        "entityAspect": { "entityTypeName": "Tag:#Gust.Tests", "entityState": "Added" },
    }));

    let err = test
        .persist_manager()
        .save_changes(&bundle)
        .await
        .unwrap_err();

    assert!(err.is_unknown_entity_type());
    assert!(err.to_string().starts_with("failed to decode entity at index 1: "));

    // Nothing reached the store
    assert!(test.log.is_empty());
}

#[tokio::test]
async fn duplicate_temporary_keys() {
    let test = DbTest::blog().await;

    let bundle = SaveBundle::new()
        .entity(EntityJson::added("Blog", json!({ "id": -1, "url": "a" })).identity("id"))
        .entity(EntityJson::added("Blog", json!({ "id": -1, "url": "b" })).identity("id"))
        .to_json();

    let err = test
        .persist_manager()
        .save_changes(&bundle)
        .await
        .unwrap_err();

    assert!(err.is_duplicate_temp_key());
    assert!(test.log.is_empty());
}

#[tokio::test]
async fn same_temporary_key_on_different_types() {
    let test = DbTest::blog().await;

    let bundle = SaveBundle::new()
        .entity(EntityJson::added("Blog", json!({ "id": -1, "url": "a" })).identity("id"))
        .entity(EntityJson::added("User", json!({ "id": -1, "name": "b" })).identity("id"))
        .to_json();

    let result = test.persist_manager().save_changes(&bundle).await.unwrap();
    assert_eq!(result.key_mappings.len(), 2);
}

#[tokio::test]
async fn conflicting_states_for_one_entity() {
    let test = DbTest::blog().await;

    let bundle = SaveBundle::new()
        .entity(EntityJson::modified("Blog", json!({ "id": 3, "url": "a" })))
        .entity(EntityJson::deleted("Blog", json!({ "id": 3, "url": "a" })))
        .to_json();

    let err = test
        .persist_manager()
        .save_changes(&bundle)
        .await
        .unwrap_err();

    assert!(err.is_conflicting_entity_state());
    assert!(test.log.is_empty());
}

#[tokio::test]
async fn invalid_property_values() {
    let test = DbTest::blog().await;

    let bundle = SaveBundle::new()
        .entity(EntityJson::added("Blog", json!({ "id": "first", "url": "a" })))
        .to_json();

    let err = test
        .persist_manager()
        .save_changes(&bundle)
        .await
        .unwrap_err();

    assert!(err.is_type_conversion());
    assert!(err
        .to_string()
        .contains("invalid value for property `id`"));
}

#[tokio::test]
async fn integers_beyond_the_key_range() {
    let test = DbTest::blog().await;

    let bundle = SaveBundle::new()
        .entity(EntityJson::added("Blog", json!({ "id": 1e20, "url": "a" })))
        .to_json();

    let err = test
        .persist_manager()
        .save_changes(&bundle)
        .await
        .unwrap_err();

    assert!(err.is_type_conversion());
    assert!(test.log.is_empty());
    assert!(test.db.all(tests::fixture::BLOG).await.unwrap().is_empty());
}

#[tokio::test]
async fn identity_keys_must_be_key_properties() {
    let test = DbTest::blog().await;

    let bundle = SaveBundle::new()
        .entity(EntityJson::added("Blog", json!({ "id": -1, "url": "a" })).identity("url"))
        .to_json();

    let err = test
        .persist_manager()
        .save_changes(&bundle)
        .await
        .unwrap_err();

    assert!(err.is_invalid_save_bundle());
    assert!(err.to_string().contains("`url` is not a key of `Blog:#Gust.Tests`"));
}
