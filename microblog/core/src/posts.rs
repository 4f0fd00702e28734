use std::sync::Arc;
use std::time::Duration;

use common::database::Ulid;

use crate::database::{Database, Post};
use crate::denormalize::Denormalizer;
use crate::error::{Error, Result};
use crate::id::IdGenerator;
use crate::users::ensure_users_exist;

/// Upper bound on post content, counted in characters.
pub const MAX_CONTENT_LENGTH: usize = 280;

pub fn validate_content(content: &str) -> Result<()> {
	if content.trim().is_empty() {
		return Err(Error::InvalidInput("content must not be empty"));
	}

	let len = content.chars().count();
	if len > MAX_CONTENT_LENGTH {
		return Err(Error::ContentTooLong {
			len,
			max: MAX_CONTENT_LENGTH,
		});
	}

	Ok(())
}

pub struct Posts<D> {
	db: Arc<D>,
	ids: IdGenerator,
	denormalizer: Denormalizer<D>,
	check_timeout: Duration,
}

impl<D: Database> Posts<D> {
	pub fn new(db: Arc<D>, denormalizer: Denormalizer<D>, check_timeout: Duration) -> Self {
		Self {
			db,
			ids: IdGenerator::new(),
			denormalizer,
			check_timeout,
		}
	}

	/// Writes the post and returns it without waiting for the owner's
	/// `last_post_id` to be updated.
	#[tracing::instrument(skip(self, content), fields(len = content.len()))]
	pub async fn create_post(&self, user_id: Ulid, content: &str) -> Result<Post> {
		validate_content(content)?;
		ensure_users_exist(self.db.as_ref(), &[user_id], self.check_timeout).await?;

		let now = crate::id::now();
		let post = Post {
			id: self.ids.generate(),
			user_id,
			content: content.to_string(),
			created_at: now,
			updated_at: now,
		};

		self.db.insert_post(&post).await.map_err(|err| {
			tracing::error!(error = %err, "failed to insert post");
			err
		})?;

		tracing::debug!(post_id = %post.id, "created post");

		self.denormalizer.schedule(user_id, post.id, now);

		Ok(post)
	}

	/// Only the author can update a post, anyone else gets
	/// [`Error::PostNotFound`].
	#[tracing::instrument(skip(self, content), fields(len = content.len()))]
	pub async fn update_post(&self, post_id: Ulid, user_id: Ulid, content: &str) -> Result<Post> {
		validate_content(content)?;

		if !self.db.post_exists(post_id, user_id).await? {
			tracing::debug!("post does not exist for this user");
			return Err(Error::PostNotFound);
		}

		let now = crate::id::now();
		let post = self
			.db
			.update_post(post_id, user_id, content, now)
			.await
			.map_err(|err| {
				tracing::error!(error = %err, "failed to update post");
				err
			})?
			// deleted between the check and the update
			.ok_or(Error::PostNotFound)?;

		self.denormalizer.schedule(user_id, post.id, now);

		Ok(post)
	}

	pub async fn get_post(&self, post_id: Ulid) -> Result<Post> {
		self.db.get_post(post_id).await?.ok_or(Error::PostNotFound)
	}
}
