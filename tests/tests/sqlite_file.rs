use gust::{Db, PersistManager};
use serde_json::json;
use tests::{
    fixture::{self, BLOG, POST},
    DbTest, EntityJson, SaveBundle, SetupSqlite,
};

#[tokio::test]
async fn file_backed_save() {
    let test = DbTest::new(SetupSqlite::file(), fixture::schema()).await;

    let bundle = SaveBundle::new()
        .entity(EntityJson::added("Blog", json!({ "id": -1, "url": "b" })).identity("id"))
        .entity(
            EntityJson::added("Post", json!({ "id": -1, "blogId": -1, "title": "p" }))
                .identity("id"),
        )
        .to_json();

    let result = test.persist_manager().save_changes(&bundle).await.unwrap();

    assert_eq!(result.key_mappings.len(), 2);
    assert_eq!(test.db.all(POST).await.unwrap().len(), 1);
    assert!(test.db.driver().url().starts_with("sqlite:"));

    let capability = test.db.capability();
    assert!(capability.sql && capability.returning);
    assert!(!capability.isolation_levels);
}

#[tokio::test]
async fn saved_changes_survive_reconnecting() {
    tests::init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("blog.db").display());

    {
        let db = Db::builder()
            .schema(fixture::schema())
            .connect(&url)
            .await
            .unwrap();
        db.push_schema().await.unwrap();

        let bundle = SaveBundle::new()
            .entity(EntityJson::added("Blog", json!({ "id": -1, "url": "kept" })).identity("id"))
            .to_json();

        PersistManager::new(db)
            .unwrap()
            .save_changes(&bundle)
            .await
            .unwrap();
    }

    let db = Db::builder()
        .schema(fixture::schema())
        .connect(&url)
        .await
        .unwrap();

    let blogs = db.all(BLOG).await.unwrap();
    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0].record[1], gust::stmt::Value::from("kept"));
}
