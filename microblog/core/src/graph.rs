use std::sync::Arc;
use std::time::Duration;

use common::database::Ulid;

use crate::database::{Database, Follow};
use crate::error::{Error, Result};
use crate::timeline::PageLimit;
use crate::users::ensure_users_exist;

/// Owns the follow relation between users.
pub struct FollowGraph<D> {
	db: Arc<D>,
	check_timeout: Duration,
}

impl<D: Database> FollowGraph<D> {
	pub fn new(db: Arc<D>, check_timeout: Duration) -> Self {
		Self { db, check_timeout }
	}

	/// Both ends must exist and differ. Following an already followed user
	/// succeeds without changing anything.
	#[tracing::instrument(skip(self))]
	pub async fn follow(&self, follower_id: Ulid, followee_id: Ulid) -> Result<()> {
		self.validate(follower_id, followee_id).await?;

		self.db
			.upsert_follow(follower_id, followee_id, crate::id::now())
			.await
			.map_err(|err| {
				tracing::error!(error = %err, "failed to follow user");
				err
			})?;

		tracing::debug!("followed user");

		Ok(())
	}

	/// Deactivates the edge. Unfollowing a user that was never followed, or
	/// is already unfollowed, succeeds without creating a row.
	#[tracing::instrument(skip(self))]
	pub async fn unfollow(&self, follower_id: Ulid, followee_id: Ulid) -> Result<()> {
		self.validate(follower_id, followee_id).await?;

		self.db
			.deactivate_follow(follower_id, followee_id, crate::id::now())
			.await
			.map_err(|err| {
				tracing::error!(error = %err, "failed to unfollow user");
				err
			})?;

		tracing::debug!("unfollowed user");

		Ok(())
	}

	/// Users `user_id` currently follows.
	pub async fn list_followees(&self, user_id: Ulid, limit: PageLimit) -> Result<Vec<Ulid>> {
		Ok(self.db.list_active_followees(user_id, limit.get()).await?)
	}

	pub async fn get_follow(&self, follower_id: Ulid, followee_id: Ulid) -> Result<Option<Follow>> {
		Ok(self.db.get_follow(follower_id, followee_id).await?)
	}

	async fn validate(&self, follower_id: Ulid, followee_id: Ulid) -> Result<()> {
		if follower_id == followee_id {
			tracing::debug!("rejected self follow");
			return Err(Error::SelfEdge);
		}

		ensure_users_exist(self.db.as_ref(), &[follower_id, followee_id], self.check_timeout).await
	}
}
