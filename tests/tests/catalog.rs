use gust::{
    schema::{app::AutoStrategy, ModelBuilder},
    stmt::Type,
    Catalog, Db, PersistManager, Schema,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tests::{
    fixture::{self, BLOG, POST, POST_VOTE},
    DbTest,
};

fn full_names(catalog: &Catalog) -> Vec<&str> {
    catalog
        .types()
        .iter()
        .map(|descriptor| &descriptor.full_name[..])
        .collect()
}

#[tokio::test]
async fn fixture_dependency_order() {
    let test = DbTest::blog().await;
    let manager = test.persist_manager();
    let catalog = manager.catalog();

    assert_eq!(
        full_names(catalog),
        [
            "Gust.Tests.Blog",
            "Gust.Tests.Post",
            "Gust.Tests.User",
            "Gust.Tests.Comment",
            "Gust.Tests.PostVote",
        ]
    );

    // Every principal comes before its dependents
    for (position, descriptor) in catalog.types().iter().enumerate() {
        for dependency in &descriptor.dependencies {
            assert!(catalog.position(*dependency).unwrap() < position);
        }
    }

    let post = catalog.get(POST);
    assert_eq!(post.wire_name, "Post:#Gust.Tests");
    assert_eq!(post.dependencies, [BLOG]);
    assert_eq!(post.foreign_keys.len(), 1);
    assert_eq!(post.foreign_keys[0].principal, BLOG);

    let vote = catalog.get(POST_VOTE);
    assert_eq!(vote.primary_key.len(), 2);
    assert_eq!(vote.foreign_keys.len(), 2);
}

#[test]
fn order_is_stable_across_declaration_order() {
    let reversed = Schema::builder()
        .namespace(fixture::NAMESPACE)
        .model(fixture::post_vote())
        .model(fixture::comment())
        .model(fixture::post())
        .model(fixture::blog())
        .model(fixture::user())
        .build()
        .unwrap();

    let forward = Catalog::describe_types(&Arc::new(fixture::schema())).unwrap();
    let reversed = Catalog::describe_types(&Arc::new(reversed)).unwrap();

    assert_eq!(full_names(&forward), full_names(&reversed));
}

fn cyclic_schema() -> Schema {
    Schema::builder()
        .namespace("Gust.Tests")
        .model(
            ModelBuilder::new("Author")
                .field("id", Type::I64)
                .primary_key()
                .auto(AutoStrategy::Increment)
                .field("favorite_book_id", Type::I64)
                .nullable()
                .belongs_to("favorite_book", "Book", &["favorite_book_id"]),
        )
        .model(
            ModelBuilder::new("Book")
                .field("id", Type::I64)
                .primary_key()
                .auto(AutoStrategy::Increment)
                .field("author_id", Type::I64)
                .belongs_to("author", "Author", &["author_id"]),
        )
        .model(
            ModelBuilder::new("Shelf")
                .field("id", Type::I64)
                .primary_key(),
        )
        .build()
        .unwrap()
}

#[tokio::test]
async fn cycles_are_rejected_up_front() {
    let db = Db::builder()
        .schema(cyclic_schema())
        .build(gust_driver_sqlite::Sqlite::in_memory())
        .await
        .unwrap();

    let err = PersistManager::new(db).unwrap_err();

    assert!(err.is_dependency_cycle());
    assert_eq!(
        err.to_string(),
        "entity type dependency cycle; no progress possible ordering: \
         Gust.Tests.Author, Gust.Tests.Book"
    );
}

#[tokio::test]
async fn self_references_are_rejected_up_front() {
    let schema = Schema::builder()
        .namespace("Gust.Tests")
        .model(
            ModelBuilder::new("Category")
                .field("id", Type::I64)
                .primary_key()
                .auto(AutoStrategy::Increment)
                .field("parent_id", Type::I64)
                .nullable()
                .belongs_to("parent", "Category", &["parent_id"]),
        )
        .build()
        .unwrap();

    let db = Db::builder()
        .schema(schema)
        .build(gust_driver_sqlite::Sqlite::in_memory())
        .await
        .unwrap();

    // A parent and its child of one type would land in the same layer
    let err = PersistManager::new(db).unwrap_err();
    assert!(err.is_dependency_cycle());
    assert_eq!(
        err.to_string(),
        "entity type dependency cycle; no progress possible ordering: Gust.Tests.Category"
    );
}

#[tokio::test]
async fn unknown_wire_names() {
    let test = DbTest::blog().await;
    let manager = test.persist_manager();

    let err = manager.catalog().by_wire_name("Tag:#Gust.Tests").unwrap_err();
    assert!(err.is_unknown_entity_type());

    let blog = manager.catalog().by_wire_name("Blog:#Gust.Tests").unwrap();
    assert_eq!(blog.model, BLOG);
}
