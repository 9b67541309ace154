use gust::{
    schema::{app::AutoStrategy, ModelBuilder},
    stmt::Type,
    Db, PersistManager, Schema,
};
use serde_json::json;

#[tokio::main]
async fn main() -> gust::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let schema = Schema::builder()
        .namespace("Hello.Gust")
        .model(
            ModelBuilder::new("User")
                .field("id", Type::I64)
                .primary_key()
                .auto(AutoStrategy::Increment)
                .field("name", Type::String)
                .has_many("todos", "Todo"),
        )
        .model(
            ModelBuilder::new("Todo")
                .field("id", Type::I64)
                .primary_key()
                .auto(AutoStrategy::Increment)
                .field("user_id", Type::I64)
                .field("title", Type::String)
                .belongs_to("user", "User", &["user_id"]),
        )
        .build()?;

    let db = Db::builder()
        .schema(schema)
        .connect("sqlite::memory:")
        .await?;
    db.push_schema().await?;

    let mut manager = PersistManager::new(db)?;

    println!("==> metadata");
    println!("{}", manager.metadata_json()?);

    // The client does not know the user's key yet; the todo refers to it by
    // the same temporary key.
    let bundle = json!({
        "entities": [
            {
                "id": -1,
                "userId": -1,
                "title": "finish the demo",
                "entityAspect": {
                    "entityTypeName": "Todo:#Hello.Gust",
                    "entityState": "Added",
                    "autoGeneratedKey": { "propertyName": "id", "autoGeneratedKeyType": "Identity" },
                },
            },
            {
                "id": -1,
                "name": "John Doe",
                "entityAspect": {
                    "entityTypeName": "User:#Hello.Gust",
                    "entityState": "Added",
                    "autoGeneratedKey": { "propertyName": "id", "autoGeneratedKeyType": "Identity" },
                },
            },
        ],
    });

    println!("==> save_changes");
    let result = manager.save_changes(&bundle).await?;
    println!("{:#}", result.to_json()?);

    Ok(())
}
