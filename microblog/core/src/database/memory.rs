use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use common::database::Ulid;

use super::{Follow, FollowStore, Post, PostStore, User, UserStore};
use crate::error::StorageError;

/// Storage operations that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
	UserLookup,
	PostWrite,
	LastPostUpdate,
	Timeline,
	FollowWrite,
}

#[derive(Default)]
struct Tables {
	users: HashMap<Ulid, User>,
	posts: HashMap<Ulid, Post>,
	follows: HashMap<(Ulid, Ulid), Follow>,
	faults: HashSet<Fault>,
}

/// In-process storage. A single lock guards every table, which gives the same
/// check-and-write atomicity the Postgres backend gets from its constraints.
#[derive(Default)]
pub struct MemoryDatabase {
	tables: Mutex<Tables>,
	lookup_delay: Option<Duration>,
	lookups: AtomicUsize,
}

impl MemoryDatabase {
	pub fn new() -> Self {
		Self::default()
	}

	/// Delays every user existence lookup, without holding the lock.
	pub fn with_lookup_delay(mut self, delay: Duration) -> Self {
		self.lookup_delay = Some(delay);
		self
	}

	pub fn fail(&self, fault: Fault) {
		self.lock().faults.insert(fault);
	}

	pub fn heal(&self, fault: Fault) {
		self.lock().faults.remove(&fault);
	}

	/// Number of user existence lookups served so far.
	pub fn lookups(&self) -> usize {
		self.lookups.load(Ordering::Relaxed)
	}

	/// Number of follow rows, active or not.
	pub fn follow_count(&self) -> usize {
		self.lock().follows.len()
	}

	fn lock(&self) -> MutexGuard<'_, Tables> {
		self.tables.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

impl Tables {
	fn check(&self, fault: Fault) -> Result<(), StorageError> {
		if self.faults.contains(&fault) {
			return Err(StorageError::Unavailable(format!("injected fault: {fault:?}")));
		}

		Ok(())
	}
}

#[async_trait::async_trait]
impl UserStore for MemoryDatabase {
	async fn insert_user(&self, user: &User) -> Result<(), StorageError> {
		self.lock().users.insert(user.id, user.clone());
		Ok(())
	}

	async fn get_user(&self, id: Ulid) -> Result<Option<User>, StorageError> {
		let tables = self.lock();
		tables.check(Fault::UserLookup)?;
		Ok(tables.users.get(&id).cloned())
	}

	async fn delete_user(&self, id: Ulid) -> Result<bool, StorageError> {
		Ok(self.lock().users.remove(&id).is_some())
	}

	async fn user_exists(&self, id: Ulid) -> Result<bool, StorageError> {
		self.lookups.fetch_add(1, Ordering::Relaxed);

		if let Some(delay) = self.lookup_delay {
			tokio::time::sleep(delay).await;
		}

		let tables = self.lock();
		tables.check(Fault::UserLookup)?;
		Ok(tables.users.contains_key(&id))
	}

	async fn set_last_post(&self, user_id: Ulid, post_id: Ulid, at: DateTime<Utc>) -> Result<(), StorageError> {
		let mut tables = self.lock();
		tables.check(Fault::LastPostUpdate)?;

		// an older write landing late must not move the pointer back
		if let Some(user) = tables.users.get_mut(&user_id).filter(|user| user.updated_at <= at) {
			user.last_post_id = Some(post_id);
			user.updated_at = at;
		}

		Ok(())
	}
}

#[async_trait::async_trait]
impl PostStore for MemoryDatabase {
	async fn insert_post(&self, post: &Post) -> Result<(), StorageError> {
		let mut tables = self.lock();
		tables.check(Fault::PostWrite)?;
		tables.posts.insert(post.id, post.clone());
		Ok(())
	}

	async fn get_post(&self, id: Ulid) -> Result<Option<Post>, StorageError> {
		Ok(self.lock().posts.get(&id).cloned())
	}

	async fn post_exists(&self, id: Ulid, user_id: Ulid) -> Result<bool, StorageError> {
		Ok(self.lock().posts.get(&id).is_some_and(|post| post.user_id == user_id))
	}

	async fn update_post(
		&self,
		id: Ulid,
		user_id: Ulid,
		content: &str,
		at: DateTime<Utc>,
	) -> Result<Option<Post>, StorageError> {
		let mut tables = self.lock();
		tables.check(Fault::PostWrite)?;

		Ok(tables.posts.get_mut(&id).filter(|post| post.user_id == user_id).map(|post| {
			post.content = content.to_string();
			post.updated_at = at;
			post.clone()
		}))
	}

	async fn followed_posts(&self, follower_id: Ulid, before: DateTime<Utc>, limit: u32) -> Result<Vec<Post>, StorageError> {
		let tables = self.lock();
		tables.check(Fault::Timeline)?;

		let followees: HashSet<Ulid> = tables
			.follows
			.values()
			.filter(|follow| follow.follower_id == follower_id && follow.active)
			.map(|follow| follow.followee_id)
			.collect();

		let mut posts: Vec<Post> = tables
			.posts
			.values()
			.filter(|post| followees.contains(&post.user_id) && post.created_at < before)
			.cloned()
			.collect();

		posts.sort_unstable_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
		posts.truncate(limit as usize);

		Ok(posts)
	}
}

#[async_trait::async_trait]
impl FollowStore for MemoryDatabase {
	async fn upsert_follow(&self, follower_id: Ulid, followee_id: Ulid, at: DateTime<Utc>) -> Result<(), StorageError> {
		if follower_id == followee_id {
			return Err(StorageError::Unavailable("follows_no_self_edge constraint violated".into()));
		}

		let mut tables = self.lock();
		tables.check(Fault::FollowWrite)?;

		tables
			.follows
			.entry((follower_id, followee_id))
			.and_modify(|follow| {
				if !follow.active {
					follow.active = true;
					follow.updated_at = at;
				}
			})
			.or_insert_with(|| Follow {
				follower_id,
				followee_id,
				active: true,
				created_at: at,
				updated_at: at,
			});

		Ok(())
	}

	async fn deactivate_follow(&self, follower_id: Ulid, followee_id: Ulid, at: DateTime<Utc>) -> Result<(), StorageError> {
		let mut tables = self.lock();
		tables.check(Fault::FollowWrite)?;

		if let Some(follow) = tables.follows.get_mut(&(follower_id, followee_id)).filter(|f| f.active) {
			follow.active = false;
			follow.updated_at = at;
		}

		Ok(())
	}

	async fn get_follow(&self, follower_id: Ulid, followee_id: Ulid) -> Result<Option<Follow>, StorageError> {
		Ok(self.lock().follows.get(&(follower_id, followee_id)).cloned())
	}

	async fn list_active_followees(&self, user_id: Ulid, limit: u32) -> Result<Vec<Ulid>, StorageError> {
		let tables = self.lock();

		let mut follows: Vec<&Follow> = tables
			.follows
			.values()
			.filter(|follow| follow.follower_id == user_id && follow.active)
			.collect();
		follows.sort_unstable_by_key(|follow| (follow.created_at, follow.followee_id));

		Ok(follows.into_iter().take(limit as usize).map(|follow| follow.followee_id).collect())
	}
}
