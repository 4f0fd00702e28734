use chrono::{DateTime, Utc};
use common::database::Ulid;

use crate::error::StorageError;

mod follow;
mod memory;
mod post;
mod postgres;
mod user;

pub use follow::*;
pub use memory::*;
pub use post::*;
pub use postgres::*;
pub use user::*;

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
	async fn insert_user(&self, user: &User) -> Result<(), StorageError>;

	async fn get_user(&self, id: Ulid) -> Result<Option<User>, StorageError>;

	/// Returns false if there was no such user.
	async fn delete_user(&self, id: Ulid) -> Result<bool, StorageError>;

	async fn user_exists(&self, id: Ulid) -> Result<bool, StorageError>;

	/// Points `last_post_id` at `post_id` unless a newer write already landed.
	/// A missing user is not an error.
	async fn set_last_post(&self, user_id: Ulid, post_id: Ulid, at: DateTime<Utc>) -> Result<(), StorageError>;
}

#[async_trait::async_trait]
pub trait PostStore: Send + Sync {
	async fn insert_post(&self, post: &Post) -> Result<(), StorageError>;

	async fn get_post(&self, id: Ulid) -> Result<Option<Post>, StorageError>;

	async fn post_exists(&self, id: Ulid, user_id: Ulid) -> Result<bool, StorageError>;

	/// Replaces the content of the post if it is owned by `user_id`, returning
	/// the updated row.
	async fn update_post(
		&self,
		id: Ulid,
		user_id: Ulid,
		content: &str,
		at: DateTime<Utc>,
	) -> Result<Option<Post>, StorageError>;

	/// Posts by every user `follower_id` actively follows, created strictly
	/// before `before`, newest first with ties broken by id.
	async fn followed_posts(&self, follower_id: Ulid, before: DateTime<Utc>, limit: u32) -> Result<Vec<Post>, StorageError>;
}

#[async_trait::async_trait]
pub trait FollowStore: Send + Sync {
	/// Inserts an active edge, or reactivates the existing one.
	async fn upsert_follow(&self, follower_id: Ulid, followee_id: Ulid, at: DateTime<Utc>) -> Result<(), StorageError>;

	/// Clears `active` on the edge if there is one. Never creates a row.
	async fn deactivate_follow(&self, follower_id: Ulid, followee_id: Ulid, at: DateTime<Utc>) -> Result<(), StorageError>;

	async fn get_follow(&self, follower_id: Ulid, followee_id: Ulid) -> Result<Option<Follow>, StorageError>;

	async fn list_active_followees(&self, user_id: Ulid, limit: u32) -> Result<Vec<Ulid>, StorageError>;
}

/// Everything the engine needs from a storage backend.
pub trait Database: UserStore + PostStore + FollowStore + 'static {}

impl<T: UserStore + PostStore + FollowStore + 'static> Database for T {}
