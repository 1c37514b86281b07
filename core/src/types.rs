//! Resource entities for the placeholder API.
//!
//! # Design
//! Entities mirror the upstream JSON (camelCase on the wire) and each one
//! declares its path, schema and filterable fields through `Resource`, which
//! is all the generic client needs. Patch types have every field optional and
//! omit absent fields, so one type serves both create and partial update.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// An entity served by the API under its own base path.
pub trait Resource: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Base path, e.g. `/posts`.
    const PATH: &'static str;
    /// Singular name used in logs and errors.
    const NAME: &'static str;
    const SCHEMA: Schema;
    /// Fields accepted by `get_by_field`, as named on the wire.
    const FILTER_FIELDS: &'static [&'static str];

    fn id(&self) -> u64;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

impl Resource for Post {
    const PATH: &'static str = "/posts";
    const NAME: &'static str = "post";
    const SCHEMA: Schema = Schema::Object(&[
        ("id", Schema::Integer),
        ("title", Schema::String),
        ("body", Schema::String),
        ("userId", Schema::Integer),
    ]);
    const FILTER_FIELDS: &'static [&'static str] = &["userId"];

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub post_id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
}

impl Resource for Comment {
    const PATH: &'static str = "/comments";
    const NAME: &'static str = "comment";
    const SCHEMA: Schema = Schema::Object(&[
        ("id", Schema::Integer),
        ("postId", Schema::Integer),
        ("name", Schema::String),
        ("email", Schema::Email),
        ("body", Schema::String),
    ]);
    const FILTER_FIELDS: &'static [&'static str] = &["postId"];

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
}

impl Resource for Album {
    const PATH: &'static str = "/albums";
    const NAME: &'static str = "album";
    const SCHEMA: Schema = Schema::Object(&[
        ("id", Schema::Integer),
        ("userId", Schema::Integer),
        ("title", Schema::String),
    ]);
    const FILTER_FIELDS: &'static [&'static str] = &["userId"];

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: u64,
    pub album_id: u64,
    pub title: String,
    pub url: String,
    pub thumbnail_url: String,
}

impl Resource for Photo {
    const PATH: &'static str = "/photos";
    const NAME: &'static str = "photo";
    const SCHEMA: Schema = Schema::Object(&[
        ("id", Schema::Integer),
        ("albumId", Schema::Integer),
        ("title", Schema::String),
        ("url", Schema::Url),
        ("thumbnailUrl", Schema::Url),
    ]);
    const FILTER_FIELDS: &'static [&'static str] = &["albumId"];

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub completed: bool,
}

impl Resource for Todo {
    const PATH: &'static str = "/todos";
    const NAME: &'static str = "todo";
    const SCHEMA: Schema = Schema::Object(&[
        ("id", Schema::Integer),
        ("userId", Schema::Integer),
        ("title", Schema::String),
        ("completed", Schema::Boolean),
    ]);
    const FILTER_FIELDS: &'static [&'static str] = &["userId"];

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    pub phone: String,
    pub website: String,
    pub company: Company,
}

const GEO: Schema = Schema::Object(&[("lat", Schema::String), ("lng", Schema::String)]);

const ADDRESS: Schema = Schema::Object(&[
    ("street", Schema::String),
    ("suite", Schema::String),
    ("city", Schema::String),
    ("zipcode", Schema::String),
    ("geo", GEO),
]);

const COMPANY: Schema = Schema::Object(&[
    ("name", Schema::String),
    ("catchPhrase", Schema::String),
    ("bs", Schema::String),
]);

impl Resource for User {
    const PATH: &'static str = "/users";
    const NAME: &'static str = "user";
    const SCHEMA: Schema = Schema::Object(&[
        ("id", Schema::Integer),
        ("name", Schema::String),
        ("username", Schema::String),
        ("email", Schema::Email),
        ("address", ADDRESS),
        ("phone", Schema::String),
        ("website", Schema::String),
        ("company", COMPANY),
    ]);
    const FILTER_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> u64 {
        self.id
    }
}

// ---------------------------------------------------------------------------
// Partial payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}
