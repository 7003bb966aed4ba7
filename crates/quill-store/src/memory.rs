// crates/quill-store/src/memory.rs
//
// In-memory store implementing the `PostStore` and `UserStore` traits.
//
// Each collection is a HashMap behind its own RwLock. Mutations that read
// and then write a key (update, remove) do both under one write guard, so
// concurrent callers never observe or clobber a half-applied change.
// Contents are lost when the process exits.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use quill_core::error::QuillError;
use quill_core::ids::{PostId, UserId};
use quill_core::post::{Post, PostPatch};
use quill_core::traits::{PostStore, UserStore};
use quill_core::user::User;

/// Process-lifetime store for posts and users.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    posts: RwLock<HashMap<PostId, Post>>,
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of posts currently stored.
    pub fn post_count(&self) -> Result<usize, QuillError> {
        Ok(self.read_posts()?.len())
    }

    /// Number of users currently stored.
    pub fn user_count(&self) -> Result<usize, QuillError> {
        Ok(self.read_users()?.len())
    }

    fn read_posts(&self) -> Result<RwLockReadGuard<'_, HashMap<PostId, Post>>, QuillError> {
        self.posts
            .read()
            .map_err(|e| QuillError::Storage(format!("RwLock poisoned: {}", e)))
    }

    fn write_posts(&self) -> Result<RwLockWriteGuard<'_, HashMap<PostId, Post>>, QuillError> {
        self.posts
            .write()
            .map_err(|e| QuillError::Storage(format!("RwLock poisoned: {}", e)))
    }

    fn read_users(&self) -> Result<RwLockReadGuard<'_, HashMap<UserId, User>>, QuillError> {
        self.users
            .read()
            .map_err(|e| QuillError::Storage(format!("RwLock poisoned: {}", e)))
    }

    fn write_users(&self) -> Result<RwLockWriteGuard<'_, HashMap<UserId, User>>, QuillError> {
        self.users
            .write()
            .map_err(|e| QuillError::Storage(format!("RwLock poisoned: {}", e)))
    }
}

/// Collect posts matching `keep` in listing order: `(created_at, id)` ascending.
///
/// HashMap iteration order is arbitrary, so every listing sorts explicitly.
/// UUID v7 ids are time-ordered, which breaks timestamp ties by creation order.
fn ordered_posts<F>(posts: &HashMap<PostId, Post>, keep: F) -> Vec<Post>
where
    F: Fn(&Post) -> bool,
{
    let mut out: Vec<Post> = posts.values().filter(|p| keep(p)).cloned().collect();
    out.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
    out
}

#[async_trait]
impl PostStore for InMemoryStore {
    async fn insert_post(&self, post: Post) -> Result<(), QuillError> {
        let mut posts = self.write_posts()?;
        if posts.contains_key(&post.id) {
            return Err(QuillError::Conflict(format!("post {} already exists", post.id)));
        }
        posts.insert(post.id, post);
        Ok(())
    }

    async fn get_post(&self, id: &PostId) -> Result<Option<Post>, QuillError> {
        Ok(self.read_posts()?.get(id).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, QuillError> {
        let posts = self.read_posts()?;
        Ok(ordered_posts(&posts, |_| true))
    }

    async fn list_posts_by_author(&self, author: &UserId) -> Result<Vec<Post>, QuillError> {
        let posts = self.read_posts()?;
        Ok(ordered_posts(&posts, |p| p.author_id == *author))
    }

    async fn update_post(
        &self,
        id: &PostId,
        patch: &PostPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Post>, QuillError> {
        let mut posts = self.write_posts()?;
        match posts.get_mut(id) {
            Some(post) => {
                patch.apply(post, now);
                Ok(Some(post.clone()))
            }
            None => Ok(None),
        }
    }

    async fn remove_post(&self, id: &PostId) -> Result<Option<Post>, QuillError> {
        Ok(self.write_posts()?.remove(id))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, user: User) -> Result<(), QuillError> {
        let mut users = self.write_users()?;
        if users.contains_key(&user.id) {
            return Err(QuillError::Conflict(format!("user {} already exists", user.id)));
        }
        users.insert(user.id, user);
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, QuillError> {
        Ok(self.read_users()?.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quill_core::post::CreatePostInput;
    use quill_core::user::CreateUserInput;

    fn make_post(title: &str, author: UserId, at: DateTime<Utc>) -> Post {
        Post::create(
            CreatePostInput {
                title: title.to_string(),
                content: "content".to_string(),
                published: false,
                author_id: author,
            },
            at,
        )
    }

    #[tokio::test]
    async fn test_insert_and_get_post() {
        let store = InMemoryStore::new();
        let post = make_post("hello", UserId::generate(), Utc::now());

        store.insert_post(post.clone()).await.unwrap();
        assert_eq!(store.get_post(&post.id).await.unwrap(), Some(post));
        assert_eq!(store.post_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_is_conflict() {
        let store = InMemoryStore::new();
        let post = make_post("first", UserId::generate(), Utc::now());
        store.insert_post(post.clone()).await.unwrap();

        let mut dup = post.clone();
        dup.title = "second".to_string();
        let err = store.insert_post(dup).await.unwrap_err();
        assert!(matches!(err, QuillError::Conflict(_)));

        // Original record untouched.
        let stored = store.get_post(&post.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "first");
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_creation() {
        let store = InMemoryStore::new();
        let author = UserId::generate();
        let base = Utc::now();

        // Insert out of chronological order.
        let late = make_post("late", author, base + Duration::seconds(20));
        let early = make_post("early", author, base);
        let middle = make_post("middle", author, base + Duration::seconds(10));
        for p in [late.clone(), early.clone(), middle.clone()] {
            store.insert_post(p).await.unwrap();
        }

        let titles: Vec<String> = store
            .list_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["early", "middle", "late"]);
    }

    #[tokio::test]
    async fn test_list_by_author_filters() {
        let store = InMemoryStore::new();
        let alice = UserId::generate();
        let bob = UserId::generate();
        let now = Utc::now();

        store.insert_post(make_post("a1", alice, now)).await.unwrap();
        store.insert_post(make_post("b1", bob, now)).await.unwrap();
        store
            .insert_post(make_post("a2", alice, now + Duration::seconds(1)))
            .await
            .unwrap();

        let alice_posts = store.list_posts_by_author(&alice).await.unwrap();
        assert_eq!(alice_posts.len(), 2);
        assert!(alice_posts.iter().all(|p| p.author_id == alice));

        let nobody = store.list_posts_by_author(&UserId::generate()).await.unwrap();
        assert!(nobody.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = InMemoryStore::new();
        let result = store
            .update_post(&PostId::generate(), &PostPatch::default(), Utc::now())
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(store.post_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_applies_patch_in_place() {
        let store = InMemoryStore::new();
        let created = Utc::now();
        let post = make_post("before", UserId::generate(), created);
        store.insert_post(post.clone()).await.unwrap();

        let later = created + Duration::seconds(3);
        let patch = PostPatch {
            title: Some("after".to_string()),
            ..PostPatch::default()
        };
        let updated = store.update_post(&post.id, &patch, later).await.unwrap().unwrap();

        assert_eq!(updated.title, "after");
        assert_eq!(updated.created_at, created);
        assert_eq!(updated.updated_at, later);
        assert_eq!(store.get_post(&post.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_remove_post() {
        let store = InMemoryStore::new();
        let post = make_post("gone", UserId::generate(), Utc::now());
        store.insert_post(post.clone()).await.unwrap();

        assert_eq!(store.remove_post(&post.id).await.unwrap(), Some(post.clone()));
        assert_eq!(store.remove_post(&post.id).await.unwrap(), None);
        assert_eq!(store.get_post(&post.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_users_are_independent_of_posts() {
        let store = InMemoryStore::new();
        let user = User::register(
            CreateUserInput {
                email: "ada@example.com".to_string(),
                name: "Ada".to_string(),
            },
            Utc::now(),
        );
        store.insert_user(user.clone()).await.unwrap();

        assert_eq!(store.get_user(&user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(store.user_count().unwrap(), 1);
        assert_eq!(store.post_count().unwrap(), 0);
        assert!(matches!(
            store.insert_user(user).await.unwrap_err(),
            QuillError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_all_land() {
        let store = std::sync::Arc::new(InMemoryStore::new());
        let author = UserId::generate();
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .insert_post(make_post(&format!("p{}", i), author, Utc::now()))
                    .await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }
        assert_eq!(store.post_count().unwrap(), 32);
    }

    #[tokio::test]
    async fn test_concurrent_removes_of_one_post_succeed_once() {
        let store = std::sync::Arc::new(InMemoryStore::new());
        let post = make_post("contested", UserId::generate(), Utc::now());
        store.insert_post(post.clone()).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            let id = post.id;
            handles.push(tokio::spawn(async move { store.remove_post(&id).await }));
        }

        let mut removed = 0;
        for h in handles {
            if h.await.unwrap().unwrap().is_some() {
                removed += 1;
            }
        }
        assert_eq!(removed, 1);
        assert_eq!(store.post_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_updates_apply_whole_patches() {
        let store = std::sync::Arc::new(InMemoryStore::new());
        let created = Utc::now();
        let post = make_post("t0", UserId::generate(), created);
        store.insert_post(post.clone()).await.unwrap();

        let mut handles = Vec::new();
        for i in 1..=16 {
            let store = store.clone();
            let id = post.id;
            handles.push(tokio::spawn(async move {
                let patch = PostPatch {
                    title: Some(format!("t{}", i)),
                    content: Some(format!("c{}", i)),
                    published: Some(i % 2 == 0),
                };
                store.update_post(&id, &patch, Utc::now()).await
            }));
        }
        for h in handles {
            assert!(h.await.unwrap().unwrap().is_some());
        }

        let last = store.get_post(&post.id).await.unwrap().unwrap();
        let n: u32 = last.title.trim_start_matches('t').parse().unwrap();
        assert!((1..=16).contains(&n));
        assert_eq!(last.content, format!("c{}", n));
        assert_eq!(last.published, n % 2 == 0);
        assert_eq!(last.created_at, created);
        assert!(last.updated_at >= created);
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_storage_error() {
        let store = InMemoryStore::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.posts.write().unwrap();
            panic!("poison the post collection");
        }));

        assert!(matches!(store.post_count(), Err(QuillError::Storage(_))));
        assert!(matches!(
            store.get_post(&PostId::generate()).await,
            Err(QuillError::Storage(_))
        ));
        assert_eq!(store.user_count().unwrap(), 0);
    }
}
