use gust::{GustConfig, MetadataOptions};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tests::DbTest;

fn structural_type<'a>(metadata: &'a Value, short_name: &str) -> &'a Value {
    metadata["structuralTypes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|ty| ty["shortName"] == short_name)
        .unwrap_or_else(|| panic!("no structural type `{short_name}`"))
}

#[tokio::test]
async fn describes_the_fixture_schema() {
    let test = DbTest::blog().await;
    let metadata: Value =
        serde_json::from_str(&test.persist_manager().metadata_json().unwrap()).unwrap();

    assert_eq!(
        metadata["resourceEntityTypeMap"],
        json!({
            "blogs": "Blog:#Gust.Tests",
            "comments": "Comment:#Gust.Tests",
            "post_votes": "PostVote:#Gust.Tests",
            "posts": "Post:#Gust.Tests",
            "users": "User:#Gust.Tests",
        })
    );
    assert_eq!(metadata["structuralTypes"].as_array().unwrap().len(), 5);

    let post = structural_type(&metadata, "Post");
    assert_eq!(post["namespace"], "Gust.Tests");
    assert_eq!(post["autoGeneratedKeyType"], "Identity");
    assert_eq!(post["defaultResourceName"], "posts");
    assert_eq!(
        post["dataProperties"][1],
        json!({
            "name": "blogId",
            "dataType": "Int32",
            "defaultValue": 0,
            "validators": [{ "name": "required" }, { "name": "int32" }],
        })
    );
    assert_eq!(
        post["dataProperties"][3],
        json!({
            "name": "rating",
            "dataType": "Double",
            "isNullable": true,
            "validators": [{ "name": "number" }],
        })
    );
    assert_eq!(
        post["navigationProperties"][0],
        json!({
            "name": "blog",
            "entityTypeName": "Blog:#Gust.Tests",
            "isScalar": true,
            "associationName": "Post_Blog",
            "foreignKeyNames": ["blogId"],
        })
    );

    let blog = structural_type(&metadata, "Blog");
    assert_eq!(
        blog["dataProperties"][1]["validators"],
        json!([
            { "name": "required" },
            { "name": "maxLength", "maxLength": 200 },
            { "name": "string" },
        ])
    );
    assert_eq!(
        blog["navigationProperties"][0],
        json!({
            "name": "posts",
            "entityTypeName": "Post:#Gust.Tests",
            "isScalar": false,
            "associationName": "Post_Blog",
            "invForeignKeyNames": ["blogId"],
        })
    );

    // Keys made of foreign keys are assigned by the client
    let vote = structural_type(&metadata, "PostVote");
    assert_eq!(vote["autoGeneratedKeyType"], "None");

    let comment = structural_type(&metadata, "Comment");
    assert_eq!(comment["dataProperties"][0]["dataType"], "Guid");
    assert_eq!(comment["dataProperties"][0]["isPartOfKey"], true);
}

#[tokio::test]
async fn pretty_metadata() {
    let test = DbTest::blog().await;

    let compact = test.persist_manager().metadata_json().unwrap();
    let pretty = test
        .persist_manager()
        .with_config(GustConfig {
            metadata: MetadataOptions { pretty: true },
            ..GustConfig::default()
        })
        .metadata_json()
        .unwrap();

    assert!(!compact.contains('\n'));
    assert!(pretty.contains("\n  \"resourceEntityTypeMap\""));
    assert_eq!(
        serde_json::from_str::<Value>(&compact).unwrap(),
        serde_json::from_str::<Value>(&pretty).unwrap()
    );
}
