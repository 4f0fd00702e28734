#![forbid(unsafe_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use common::context::Context;
pub use common::database::Ulid;

pub mod database;
mod denormalize;
mod error;
mod graph;
mod id;
mod posts;
mod timeline;
mod users;

pub use database::{Database, Follow, Post, User};
pub use denormalize::Denormalizer;
pub use error::{Error, Result, StorageError};
pub use graph::FollowGraph;
pub use id::parse_id;
pub use posts::{validate_content, Posts, MAX_CONTENT_LENGTH};
pub use timeline::{DefaultBefore, PageLimit, Timeline};
pub use users::{validate_email, validate_name, Users};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
	/// Bound on the concurrent user existence checks run before a mutation.
	pub existence_check_timeout: Duration,
	/// Bound on a single background `last_post_id` update.
	pub denormalize_timeout: Duration,
	pub default_before: DefaultBefore,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			existence_check_timeout: Duration::from_secs(5),
			denormalize_timeout: Duration::from_secs(5),
			default_before: DefaultBefore::Now,
		}
	}
}

/// The engine: users, posts, the follow graph and timelines over one
/// storage backend.
pub struct Microblog<D> {
	db: Arc<D>,
	users: Users<D>,
	posts: Posts<D>,
	graph: FollowGraph<D>,
	timeline: Timeline<D>,
}

impl<D: Database> Microblog<D> {
	/// Background work is tied to `ctx` and stops when it is cancelled.
	pub fn new(ctx: Context, db: Arc<D>, options: Options) -> Self {
		let denormalizer = Denormalizer::new(ctx, db.clone(), options.denormalize_timeout);

		Self {
			users: Users::new(db.clone()),
			posts: Posts::new(db.clone(), denormalizer, options.existence_check_timeout),
			graph: FollowGraph::new(db.clone(), options.existence_check_timeout),
			timeline: Timeline::new(db.clone(), options.default_before),
			db,
		}
	}

	pub fn database(&self) -> &Arc<D> {
		&self.db
	}

	pub async fn create_user(&self, name: &str, email: &str) -> Result<User> {
		self.users.create_user(name, email).await
	}

	pub async fn get_user(&self, user_id: Ulid) -> Result<User> {
		self.users.get_user(user_id).await
	}

	pub async fn delete_user(&self, user_id: Ulid) -> Result<()> {
		self.users.delete_user(user_id).await
	}

	pub async fn create_post(&self, user_id: Ulid, content: &str) -> Result<Post> {
		self.posts.create_post(user_id, content).await
	}

	pub async fn update_post(&self, post_id: Ulid, user_id: Ulid, content: &str) -> Result<Post> {
		self.posts.update_post(post_id, user_id, content).await
	}

	pub async fn get_post(&self, post_id: Ulid) -> Result<Post> {
		self.posts.get_post(post_id).await
	}

	pub async fn follow(&self, follower_id: Ulid, followee_id: Ulid) -> Result<()> {
		self.graph.follow(follower_id, followee_id).await
	}

	pub async fn unfollow(&self, follower_id: Ulid, followee_id: Ulid) -> Result<()> {
		self.graph.unfollow(follower_id, followee_id).await
	}

	pub async fn list_followees(&self, user_id: Ulid, limit: PageLimit) -> Result<Vec<Ulid>> {
		self.graph.list_followees(user_id, limit).await
	}

	pub async fn get_follow(&self, follower_id: Ulid, followee_id: Ulid) -> Result<Option<Follow>> {
		self.graph.get_follow(follower_id, followee_id).await
	}

	pub async fn get_timeline(&self, user_id: Ulid, limit: PageLimit, before: Option<DateTime<Utc>>) -> Result<Vec<Post>> {
		self.timeline.get_timeline(user_id, limit, before).await
	}
}

#[cfg(test)]
mod tests;
