//! Deterministic fixture data shaped like the public placeholder API.
//!
//! Three users; each user owns two posts, two albums and three todos. Each
//! post carries two comments and each album two photos.

use serde_json::{json, Value};

pub const USERS: u64 = 3;
pub const POSTS_PER_USER: u64 = 2;
pub const COMMENTS_PER_POST: u64 = 2;
pub const ALBUMS_PER_USER: u64 = 2;
pub const PHOTOS_PER_ALBUM: u64 = 2;
pub const TODOS_PER_USER: u64 = 3;

/// Seed records for the named collection. Unknown names yield nothing.
pub fn records(resource: &str) -> Vec<Value> {
    match resource {
        "users" => users(),
        "posts" => children(USERS, POSTS_PER_USER, |id, user_id| {
            json!({
                "id": id,
                "userId": user_id,
                "title": format!("post {id} by user {user_id}"),
                "body": format!("body of post {id}"),
            })
        }),
        "comments" => children(USERS * POSTS_PER_USER, COMMENTS_PER_POST, |id, post_id| {
            json!({
                "id": id,
                "postId": post_id,
                "name": format!("comment {id}"),
                "email": format!("commenter{id}@example.com"),
                "body": format!("comment {id} on post {post_id}"),
            })
        }),
        "albums" => children(USERS, ALBUMS_PER_USER, |id, user_id| {
            json!({
                "id": id,
                "userId": user_id,
                "title": format!("album {id}"),
            })
        }),
        "photos" => children(USERS * ALBUMS_PER_USER, PHOTOS_PER_ALBUM, |id, album_id| {
            json!({
                "id": id,
                "albumId": album_id,
                "title": format!("photo {id}"),
                "url": format!("https://via.placeholder.com/600/{id:06x}"),
                "thumbnailUrl": format!("https://via.placeholder.com/150/{id:06x}"),
            })
        }),
        "todos" => children(USERS, TODOS_PER_USER, |id, user_id| {
            json!({
                "id": id,
                "userId": user_id,
                "title": format!("todo {id}"),
                "completed": id % 2 == 0,
            })
        }),
        _ => Vec::new(),
    }
}

/// `per_parent` records for each parent id in `1..=parents`, numbered from 1.
fn children(parents: u64, per_parent: u64, make: impl Fn(u64, u64) -> Value) -> Vec<Value> {
    (1..=parents)
        .flat_map(|parent| {
            (0..per_parent).map(move |n| (parent, (parent - 1) * per_parent + n + 1))
        })
        .map(|(parent, id)| make(id, parent))
        .collect()
}

fn users() -> Vec<Value> {
    (1..=USERS)
        .map(|id| {
            json!({
                "id": id,
                "name": format!("User {id}"),
                "username": format!("user{id}"),
                "email": format!("user{id}@example.com"),
                "address": {
                    "street": format!("{id} Main Street"),
                    "suite": format!("Apt. {id}"),
                    "city": "Gwenborough",
                    "zipcode": format!("9299{id}-3874"),
                    "geo": { "lat": "-37.3159", "lng": "81.1496" },
                },
                "phone": format!("1-770-736-803{id}"),
                "website": format!("user{id}.example.org"),
                "company": {
                    "name": format!("Company {id}"),
                    "catchPhrase": "Multi-layered client-server neural-net",
                    "bs": "harness real-time e-markets",
                },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_ids_are_contiguous() {
        let posts = records("posts");
        let ids: Vec<u64> = posts.iter().map(|p| p["id"].as_u64().unwrap()).collect();
        assert_eq!(ids, (1..=USERS * POSTS_PER_USER).collect::<Vec<_>>());
    }

    #[test]
    fn children_are_grouped_by_parent() {
        let todos = records("todos");
        let for_user_1 = todos.iter().filter(|t| t["userId"] == 1).count() as u64;
        assert_eq!(for_user_1, TODOS_PER_USER);
        assert_eq!(todos[0]["userId"], 1);
        assert_eq!(todos.last().unwrap()["userId"], USERS);
    }

    #[test]
    fn unknown_resource_is_empty() {
        assert!(records("widgets").is_empty());
    }

    #[test]
    fn users_carry_nested_address() {
        let users = records("users");
        assert_eq!(users.len() as u64, USERS);
        assert_eq!(users[0]["address"]["geo"]["lat"], "-37.3159");
        assert_eq!(users[0]["company"]["catchPhrase"], "Multi-layered client-server neural-net");
    }
}
