//! Fixed-name clients for the six placeholder resources.
//!
//! # Design
//! Each wrapper is a `ResourceClient<R>` plus a default `RequestConfig`. The
//! named methods (`get_post_by_id`, `get_comments_by_post_id`, ...) run with
//! those defaults; `resource()` exposes the generic client for calls that need
//! a per-call config.
//!
//! `ApiClients` builds all six over one transport and one `ResponseCache`, so
//! a read through `posts` is a cache hit for any other holder of the cache.

use std::future::Future;
use std::sync::Arc;

use crate::cache::ResponseCache;
use crate::client::ResourceClient;
use crate::config::{ClientSettings, RequestConfig};
use crate::error::ApiError;
use crate::executor::RequestExecutor;
use crate::http::{ReqwestTransport, Transport};
use crate::metrics::RequestOutcome;
use crate::types::{
    Album, AlbumPatch, Comment, CommentPatch, Photo, PhotoPatch, Post, PostPatch, Resource, Todo,
    TodoPatch, User, UserPatch,
};

macro_rules! resource_client {
    (
        $(#[$meta:meta])*
        $client:ident($resource:ty, $patch:ty) {
            $all:ident, $by_id:ident, $create:ident, $update:ident, $delete:ident
            $(, $by_field:ident = $field:literal)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $client {
            inner: ResourceClient<$resource>,
            defaults: RequestConfig,
        }

        impl $client {
            pub fn new(inner: ResourceClient<$resource>) -> Self {
                Self {
                    inner,
                    defaults: RequestConfig::default(),
                }
            }

            /// Replace the config used by the named methods.
            pub fn with_defaults(mut self, defaults: RequestConfig) -> Self {
                self.defaults = defaults;
                self
            }

            pub fn defaults(&self) -> &RequestConfig {
                &self.defaults
            }

            pub fn resource(&self) -> &ResourceClient<$resource> {
                &self.inner
            }

            pub async fn $all(&self) -> Result<Vec<$resource>, ApiError> {
                self.inner.list_all(&self.defaults).await
            }

            pub async fn $by_id(&self, id: u64) -> Result<$resource, ApiError> {
                self.inner.get_by_id(id, &self.defaults).await
            }

            $(
                pub async fn $by_field(&self, id: u64) -> Result<Vec<$resource>, ApiError> {
                    self.inner.get_by_field($field, id, &self.defaults).await
                }
            )?

            pub async fn $create(&self, payload: &$patch) -> Result<$resource, ApiError> {
                self.inner.create(payload, &self.defaults).await
            }

            pub async fn $update(&self, id: u64, payload: &$patch) -> Result<$resource, ApiError> {
                self.inner.update(id, payload, &self.defaults).await
            }

            pub async fn $delete(&self, id: u64) -> Result<(), ApiError> {
                self.inner.delete(id, &self.defaults).await
            }

            pub fn metrics(&self) -> Vec<RequestOutcome> {
                self.inner.metrics()
            }

            pub fn clear_metrics(&self) {
                self.inner.clear_metrics();
            }

            pub fn clear_cache(&self) {
                self.inner.clear_cache();
            }

            pub async fn batch<T, F, Fut>(
                &self,
                operations: impl IntoIterator<Item = F>,
            ) -> Result<Vec<T>, ApiError>
            where
                F: FnOnce() -> Fut,
                Fut: Future<Output = Result<T, ApiError>>,
            {
                self.inner.batch(operations).await
            }
        }
    };
}

resource_client! {
    /// `/posts`, filterable by author.
    PostsClient(Post, PostPatch) {
        get_all_posts, get_post_by_id, create_post, update_post, delete_post,
        get_posts_by_user_id = "userId"
    }
}

resource_client! {
    /// `/comments`, filterable by parent post.
    CommentsClient(Comment, CommentPatch) {
        get_all_comments, get_comment_by_id, create_comment, update_comment, delete_comment,
        get_comments_by_post_id = "postId"
    }
}

resource_client! {
    AlbumsClient(Album, AlbumPatch) {
        get_all_albums, get_album_by_id, create_album, update_album, delete_album,
        get_albums_by_user_id = "userId"
    }
}

resource_client! {
    PhotosClient(Photo, PhotoPatch) {
        get_all_photos, get_photo_by_id, create_photo, update_photo, delete_photo,
        get_photos_by_album_id = "albumId"
    }
}

resource_client! {
    TodosClient(Todo, TodoPatch) {
        get_all_todos, get_todo_by_id, create_todo, update_todo, delete_todo,
        get_todos_by_user_id = "userId"
    }
}

resource_client! {
    /// `/users`. Users have no foreign key to filter on.
    UsersClient(User, UserPatch) {
        get_all_users, get_user_by_id, create_user, update_user, delete_user
    }
}

/// The six resource clients over one transport and one shared cache.
///
/// Every client gets its own executor, so metrics stay per client.
#[derive(Debug, Clone)]
pub struct ApiClients {
    pub posts: PostsClient,
    pub comments: CommentsClient,
    pub albums: AlbumsClient,
    pub photos: PhotosClient,
    pub todos: TodosClient,
    pub users: UsersClient,
    cache: ResponseCache,
}

impl ApiClients {
    pub fn new(settings: &ClientSettings, transport: Arc<dyn Transport>) -> Self {
        let cache = ResponseCache::with_ttl(settings.cache_ttl);
        let defaults = &settings.defaults;

        Self {
            posts: PostsClient::new(shared_client(settings, &transport, &cache))
                .with_defaults(defaults.clone()),
            comments: CommentsClient::new(shared_client(settings, &transport, &cache))
                .with_defaults(defaults.clone()),
            albums: AlbumsClient::new(shared_client(settings, &transport, &cache))
                .with_defaults(defaults.clone()),
            photos: PhotosClient::new(shared_client(settings, &transport, &cache))
                .with_defaults(defaults.clone()),
            todos: TodosClient::new(shared_client(settings, &transport, &cache))
                .with_defaults(defaults.clone()),
            users: UsersClient::new(shared_client(settings, &transport, &cache))
                .with_defaults(defaults.clone()),
            cache,
        }
    }

    /// Clients that talk HTTP through `reqwest`.
    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(settings, Arc::new(ReqwestTransport::new()))
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::from_settings(&ClientSettings::from_env()?))
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Drop every cached response and every client's metrics.
    pub fn reset(&self) {
        self.cache.clear();
        self.posts.clear_metrics();
        self.comments.clear_metrics();
        self.albums.clear_metrics();
        self.photos.clear_metrics();
        self.todos.clear_metrics();
        self.users.clear_metrics();
    }
}

fn shared_client<R: Resource>(
    settings: &ClientSettings,
    transport: &Arc<dyn Transport>,
    cache: &ResponseCache,
) -> ResourceClient<R> {
    let executor = RequestExecutor::new(transport.clone(), &settings.base_url)
        .with_metrics_exclusions(settings.metrics_exclusions.clone());
    ResourceClient::new(executor, cache.clone())
}
