//! The blogging schema most tests run against.
//!
//! Dependency order by full name: `Blog`, `Post`, `User`, `Comment`,
//! `PostVote`.

use gust::{
    schema::{
        app::{AutoStrategy, ModelId},
        ModelBuilder,
    },
    stmt::Type,
    Schema,
};

pub const NAMESPACE: &str = "Gust.Tests";

pub const USER: ModelId = ModelId(0);
pub const BLOG: ModelId = ModelId(1);
pub const POST: ModelId = ModelId(2);
pub const COMMENT: ModelId = ModelId(3);
pub const POST_VOTE: ModelId = ModelId(4);

pub fn schema() -> Schema {
    Schema::builder()
        .namespace(NAMESPACE)
        .model(user())
        .model(blog())
        .model(post())
        .model(comment())
        .model(post_vote())
        .build()
        .expect("invalid fixture schema")
}

pub fn user() -> ModelBuilder {
    ModelBuilder::new("User")
        .field("id", Type::I32)
        .primary_key()
        .auto(AutoStrategy::Increment)
        .field("name", Type::String)
        .max_length(100)
        .has_many("comments", "Comment")
        .has_many("votes", "PostVote")
}

pub fn blog() -> ModelBuilder {
    ModelBuilder::new("Blog")
        .field("id", Type::I64)
        .primary_key()
        .auto(AutoStrategy::Increment)
        .field("url", Type::String)
        .max_length(200)
        .has_many("posts", "Post")
}

/// `blog_id` is narrower than `Blog::id`
pub fn post() -> ModelBuilder {
    ModelBuilder::new("Post")
        .field("id", Type::I64)
        .primary_key()
        .auto(AutoStrategy::Increment)
        .field("blog_id", Type::I32)
        .field("title", Type::String)
        .field("rating", Type::F64)
        .nullable()
        .belongs_to("blog", "Blog", &["blog_id"])
        .has_many("comments", "Comment")
        .has_many("votes", "PostVote")
}

pub fn comment() -> ModelBuilder {
    ModelBuilder::new("Comment")
        .field("id", Type::Uuid)
        .primary_key()
        .auto(AutoStrategy::Uuid)
        .field("post_id", Type::I64)
        .field("user_id", Type::I32)
        .nullable()
        .field("body", Type::String)
        .field("created_at", Type::Timestamp)
        .nullable()
        .belongs_to("post", "Post", &["post_id"])
        .belongs_to("user", "User", &["user_id"])
}

/// Keyed by its two foreign keys
pub fn post_vote() -> ModelBuilder {
    ModelBuilder::new("PostVote")
        .field("post_id", Type::I64)
        .primary_key()
        .field("user_id", Type::I32)
        .primary_key()
        .field("up", Type::Bool)
        .belongs_to("post", "Post", &["post_id"])
        .belongs_to("user", "User", &["user_id"])
}

/// Wire name of a fixture type, e.g. `Blog:#Gust.Tests`
pub fn wire_name(short_name: &str) -> String {
    format!("{short_name}:#{NAMESPACE}")
}
