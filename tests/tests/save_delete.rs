use gust::{stmt::Value, EntityKey, SaveStage};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{
    fixture::{BLOG, POST, POST_VOTE, USER},
    DbTest, EntityJson, SaveBundle,
};

/// Blog 1, post 1 in blog 1, user 1 and their vote on post 1
async fn seed(test: &DbTest) {
    let bundle = SaveBundle::new()
        .entity(EntityJson::added("Blog", json!({ "id": -1, "url": "b" })).identity("id"))
        .entity(
            EntityJson::added("Post", json!({ "id": -1, "blogId": -1, "title": "p" }))
                .identity("id"),
        )
        .entity(EntityJson::added("User", json!({ "id": -1, "name": "carl" })).identity("id"))
        .entity(EntityJson::added(
            "PostVote",
            json!({ "postId": -1, "userId": -1, "up": true }),
        ))
        .to_json();

    test.persist_manager().save_changes(&bundle).await.unwrap();
}

#[tokio::test]
async fn foreign_keys_of_composite_keyed_entities_are_rewritten() {
    let test = DbTest::blog().await;
    seed(&test).await;

    let votes = test.db.all(POST_VOTE).await.unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(
        votes[0].record[..3],
        [Value::I64(1), Value::I32(1), Value::Bool(true)]
    );
}

#[tokio::test]
async fn dependents_are_deleted_first() {
    let mut test = DbTest::blog().await;
    seed(&test).await;
    test.log.clear();

    // Listed principal first; the store rejects that order
    let bundle = SaveBundle::new()
        .entity(EntityJson::deleted("Blog", json!({ "id": 1, "url": "b" })))
        .entity(EntityJson::deleted("User", json!({ "id": 1, "name": "carl" })))
        .entity(EntityJson::deleted("Post", json!({ "id": 1, "blogId": 1, "title": "p" })))
        .entity(EntityJson::deleted(
            "PostVote",
            json!({ "postId": 1, "userId": 1, "up": true }),
        ))
        .to_json();

    let result = test.persist_manager().save_changes(&bundle).await.unwrap();

    assert_eq!(
        test.log.writes(),
        [
            ("delete", POST_VOTE),
            ("delete", USER),
            ("delete", POST),
            ("delete", BLOG),
        ]
    );

    assert_eq!(
        result.deleted_keys,
        [
            EntityKey {
                entity_type_name: "PostVote:#Gust.Tests".to_string(),
                key_value: Value::record_from_vec(vec![Value::I64(1), Value::I32(1)]),
            },
            EntityKey {
                entity_type_name: "User:#Gust.Tests".to_string(),
                key_value: Value::I32(1),
            },
            EntityKey {
                entity_type_name: "Post:#Gust.Tests".to_string(),
                key_value: Value::I64(1),
            },
            EntityKey {
                entity_type_name: "Blog:#Gust.Tests".to_string(),
                key_value: Value::I64(1),
            },
        ]
    );
    assert!(result.entities.is_empty());

    assert_eq!(
        result.to_json().unwrap()["deletedKeys"][0],
        json!({ "entityTypeName": "PostVote:#Gust.Tests", "keyValue": [1, 1] })
    );

    for model in [BLOG, POST, USER, POST_VOTE] {
        assert!(test.db.all(model).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn upserts_run_before_deletes() {
    let mut test = DbTest::blog().await;
    seed(&test).await;
    test.log.clear();

    // Move the post to a new blog, then drop the old one
    let bundle = SaveBundle::new()
        .entity(EntityJson::deleted("Blog", json!({ "id": 1, "url": "b" })))
        .entity(EntityJson::added("Blog", json!({ "id": -1, "url": "new" })).identity("id"))
        .entity(EntityJson::modified(
            "Post",
            json!({ "id": 1, "blogId": -1, "title": "moved" }),
        ))
        .to_json();

    let result = test.persist_manager().save_changes(&bundle).await.unwrap();

    assert_eq!(
        test.log.writes(),
        [("insert", BLOG), ("update", POST), ("delete", BLOG)]
    );
    assert_eq!(result.deleted_keys.len(), 1);
    assert_eq!(result.entities.len(), 2);

    let post = test.db.get_by_key(POST, 1i64).await.unwrap().unwrap();
    assert_eq!(post.record[1], Value::I32(2));
}

#[tokio::test]
async fn deleting_a_referenced_row_rolls_back() {
    let test = DbTest::blog().await;
    seed(&test).await;

    let bundle = SaveBundle::new()
        .entity(EntityJson::deleted("User", json!({ "id": 1, "name": "carl" })))
        .to_json();

    let err = test
        .persist_manager()
        .save_changes(&bundle)
        .await
        .unwrap_err();

    assert!(err.is_driver_operation_failed());
    assert!(test.log.has_rollback());
    assert_eq!(test.db.all(USER).await.unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_a_missing_row_fails() {
    let test = DbTest::blog().await;

    let bundle = SaveBundle::new()
        .entity(EntityJson::deleted("Blog", json!({ "id": 7, "url": "gone" })))
        .to_json();

    let mut manager = test.persist_manager();
    let err = manager.save_changes(&bundle).await.unwrap_err();

    assert!(err.is_record_not_found());

    let state = manager.save_work_state().unwrap();
    assert_eq!(state.stage, SaveStage::Failed);
    assert_eq!(state.failed_stage, Some(SaveStage::CommittingDeletes));
    assert!(state.deleted_keys.is_empty());
}
