use gust::{
    err,
    stmt::Value,
    AutoGeneratedKeyType, Entity, EntityError, EntityState, Error, Hooks, SaveStage,
};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};
use tests::{
    fixture::{BLOG, POST},
    DbTest, EntityJson, SaveBundle,
};

fn two_blogs() -> serde_json::Value {
    SaveBundle::new()
        .entity(EntityJson::added("Blog", json!({ "id": -1, "url": "keep" })).identity("id"))
        .entity(EntityJson::added("Blog", json!({ "id": -2, "url": "veto" })).identity("id"))
        .to_json()
}

#[tokio::test]
async fn vetoed_entities_are_skipped() {
    let test = DbTest::blog().await;
    let url = BLOG.field(1);

    let hooks = Hooks::new()
        .before_save_entity(move |record| Ok(record.entity.get(url) != &Value::from("veto")));

    let result = test
        .persist_manager()
        .with_hooks(hooks)
        .save_changes(&two_blogs())
        .await
        .unwrap();

    assert_eq!(result.entities, [json!({ "$type": "Gust.Tests.Blog", "id": 1, "url": "keep" })]);
    assert_eq!(result.key_mappings.len(), 1);
    assert_eq!(result.key_mappings[0].temp_value, Value::I64(-1));

    let blogs = test.db.all(BLOG).await.unwrap();
    assert_eq!(blogs.len(), 1);
}

#[tokio::test]
async fn vetoed_deletes_are_skipped() {
    let test = DbTest::blog().await;
    test.persist_manager()
        .save_changes(&two_blogs())
        .await
        .unwrap();

    let bundle = SaveBundle::new()
        .entity(EntityJson::deleted("Blog", json!({ "id": 1, "url": "keep" })))
        .entity(EntityJson::deleted("Blog", json!({ "id": 2, "url": "veto" })))
        .to_json();

    let seen = Arc::new(AtomicUsize::new(0));
    let hooks = Hooks::new().before_save_entity({
        let seen = seen.clone();
        move |record| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(!(record.state.is_deleted() && record.entity.get(BLOG.field(0)) == &Value::I64(2)))
        }
    });

    let result = test
        .persist_manager()
        .with_hooks(hooks)
        .save_changes(&bundle)
        .await
        .unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 2);
    assert_eq!(result.deleted_keys.len(), 1);
    assert_eq!(result.deleted_keys[0].key_value, Value::I64(1));

    let blogs = test.db.all(BLOG).await.unwrap();
    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0].key(test.db.schema().model(BLOG)), Value::I64(2));
}

#[tokio::test]
async fn before_save_entities_can_add_records() {
    let test = DbTest::blog().await;
    let manager = test.persist_manager();

    let schema = test.db.schema().clone();
    let mut entity = Entity::new(schema.model(BLOG));
    entity.set(BLOG.field(0), -10i64);
    entity.set(BLOG.field(1), "added by hook");

    let added = manager
        .create_entity_info(
            entity,
            EntityState::Added,
            Some(AutoGeneratedKeyType::Identity),
            IndexMap::new(),
            IndexMap::new(),
        )
        .unwrap();

    let hooks = Hooks::new().before_save_entities(move |map, _| {
        map.push(added.clone());
        Ok(())
    });

    let bundle = SaveBundle::new()
        .entity(
            EntityJson::added("Post", json!({ "id": -1, "blogId": -10, "title": "p" }))
                .identity("id"),
        )
        .to_json();

    let result = manager.with_hooks(hooks).save_changes(&bundle).await.unwrap();

    assert_eq!(result.key_mappings.len(), 2);
    assert!(result
        .key_mappings
        .iter()
        .any(|mapping| mapping.temp_value == Value::I64(-10)
            && mapping.real_value == Value::I64(1)));

    let posts = test.db.all(POST).await.unwrap();
    assert_eq!(posts[0].record[1], Value::I32(1));
}

#[tokio::test]
async fn before_save_entities_can_remove_records() {
    let test = DbTest::blog().await;

    let hooks = Hooks::new().before_save_entities(|map, _| {
        map.remove(BLOG);
        Ok(())
    });

    let result = test
        .persist_manager()
        .with_hooks(hooks)
        .save_changes(&two_blogs())
        .await
        .unwrap();

    // Registered temporary keys that were never saved are not reported
    assert!(result.key_mappings.is_empty());
    assert!(result.entities.is_empty());
    assert!(test.log.writes().is_empty());
}

#[tokio::test]
async fn before_save_entities_sees_save_options() {
    let test = DbTest::blog().await;
    let tag = Arc::new(Mutex::new(None));

    let hooks = Hooks::new().before_save_entities({
        let tag = tag.clone();
        move |_, options| {
            *tag.lock().unwrap() = options.tag.clone();
            Ok(())
        }
    });

    let bundle = SaveBundle::new()
        .entity(EntityJson::added("Blog", json!({ "id": -1, "url": "x" })).identity("id"))
        .save_options(json!({ "tag": { "source": "editor" }, "allowConcurrentSaves": true }))
        .to_json();

    let mut manager = test.persist_manager().with_hooks(hooks);
    manager.save_changes(&bundle).await.unwrap();

    assert_eq!(*tag.lock().unwrap(), Some(json!({ "source": "editor" })));
    assert!(manager.save_options().allow_concurrent_saves);
}

#[tokio::test]
async fn after_save_entities_failure_rolls_back() {
    let test = DbTest::blog().await;
    let mappings = Arc::new(AtomicUsize::new(0));

    let hooks = Hooks::new().after_save_entities({
        let mappings = mappings.clone();
        move |map, key_mappings, deleted| {
            assert_eq!(map.len(), 2);
            assert!(deleted.is_empty());
            mappings.store(key_mappings.len(), Ordering::SeqCst);
            Err(err!("audit log unavailable"))
        }
    });

    let mut manager = test.persist_manager().with_hooks(hooks);
    let err = manager.save_changes(&two_blogs()).await.unwrap_err();

    assert_eq!(err.to_string(), "audit log unavailable");
    assert_eq!(mappings.load(Ordering::SeqCst), 2);
    assert!(test.log.has_rollback());
    assert!(!test.log.has_commit());
    assert!(test.db.all(BLOG).await.unwrap().is_empty());

    let state = manager.save_work_state().unwrap();
    assert_eq!(state.failed_stage, Some(SaveStage::Finalizing));
}

#[tokio::test]
async fn handled_failures_become_errors_in_the_result() {
    let test = DbTest::blog().await;
    let failed_stage = Arc::new(Mutex::new(None));

    let hooks = Hooks::new().handle_save_exception({
        let failed_stage = failed_stage.clone();
        move |err, state| {
            *failed_stage.lock().unwrap() = state.failed_stage;
            err.is_record_not_found()
        }
    });

    let bundle = SaveBundle::new()
        .entity(EntityJson::added("Blog", json!({ "id": -1, "url": "new" })).identity("id"))
        .entity(EntityJson::modified("Blog", json!({ "id": 99, "url": "missing" })))
        .to_json();

    let result = test
        .persist_manager()
        .with_hooks(hooks)
        .save_changes(&bundle)
        .await
        .unwrap();

    assert!(result.has_errors());
    assert!(result.entities.is_empty());
    assert!(result.key_mappings.is_empty());
    assert!(result.errors[0].message.contains("record not found"));
    assert_eq!(*failed_stage.lock().unwrap(), Some(SaveStage::CommittingUpserts));

    // The insert that ran before the failure was rolled back
    assert!(test.db.all(BLOG).await.unwrap().is_empty());
}

#[tokio::test]
async fn unhandled_failures_propagate() {
    let test = DbTest::blog().await;
    let hooks = Hooks::new().handle_save_exception(|err, _| err.is_duplicate_temp_key());

    let bundle = SaveBundle::new()
        .entity(EntityJson::modified("Blog", json!({ "id": 99, "url": "missing" })))
        .to_json();

    let err = test
        .persist_manager()
        .with_hooks(hooks)
        .save_changes(&bundle)
        .await
        .unwrap_err();

    assert!(err.is_record_not_found());
}

#[tokio::test]
async fn entity_errors_are_never_converted() {
    let test = DbTest::blog().await;
    let handler_called = Arc::new(AtomicBool::new(false));

    let hooks = Hooks::new()
        .before_save_entity(|record| {
            Err(Error::entity_errors(
                "blog rejected",
                vec![EntityError {
                    error_name: "Forbidden".to_string(),
                    entity_type_name: "Blog:#Gust.Tests".to_string(),
                    key_values: vec![record.entity.get(BLOG.field(0)).clone()],
                    property_name: Some("url".to_string()),
                    error_message: "urls are moderated".to_string(),
                }],
            ))
        })
        .handle_save_exception({
            let handler_called = handler_called.clone();
            move |_, _| {
                handler_called.store(true, Ordering::SeqCst);
                true
            }
        });

    let bundle = SaveBundle::new()
        .entity(EntityJson::added("Blog", json!({ "id": 5, "url": "spam" })))
        .to_json();

    let mut manager = test.persist_manager().with_hooks(hooks);
    let err = manager.save_changes(&bundle).await.unwrap_err();

    assert!(err.is_entity_errors());
    assert!(!handler_called.load(Ordering::SeqCst));

    let errors = err.as_entity_errors().unwrap();
    assert_eq!(errors[0].key_values, [Value::I64(5)]);

    let state = manager.save_work_state().unwrap();
    assert_eq!(state.stage, SaveStage::Failed);
    assert_eq!(state.entity_errors, errors);
    assert!(test.db.all(BLOG).await.unwrap().is_empty());
}
