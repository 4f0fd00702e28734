use std::sync::Arc;
use std::time::Duration;

use common::database::Ulid;
use common::prelude::FutureTimeout;
use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;

use crate::database::{Database, User, UserStore};
use crate::error::{Error, Result, StorageError};

pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_EMAIL_LENGTH: usize = 100;

pub fn validate_name(name: &str) -> Result<(), &'static str> {
	if name.trim().is_empty() {
		return Err("name must not be empty");
	}

	if name.chars().count() > MAX_NAME_LENGTH {
		return Err("name must be at most 50 characters long");
	}

	Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
	if email.len() > MAX_EMAIL_LENGTH {
		return Err("email must be at most 100 characters long");
	}

	if !email.contains('@') {
		return Err("email must contain an @");
	}

	if !email_address::EmailAddress::is_valid(email) {
		return Err("email is not a valid email address");
	}

	Ok(())
}

/// Checks that every id belongs to an existing user, running the lookups
/// concurrently.
///
/// The first lookup to report a missing user wins and names that user. A
/// storage error is only returned once every lookup has finished without
/// finding a missing user.
pub(crate) async fn ensure_users_exist<S: UserStore + ?Sized>(store: &S, ids: &[Ulid], timeout: Duration) -> Result<()> {
	let barrier = async {
		let mut lookups: FuturesUnordered<_> = ids
			.iter()
			.map(|&id| async move { (id, store.user_exists(id).await) })
			.collect();

		let mut failure = None;
		while let Some((id, result)) = lookups.next().await {
			match result {
				Ok(true) => {}
				Ok(false) => {
					tracing::debug!(user_id = %id, "user does not exist");
					return Err(Error::UserNotFound(id));
				}
				Err(err) => {
					failure.get_or_insert(err);
				}
			}
		}

		match failure {
			Some(err) => Err(Error::Storage(err)),
			None => Ok(()),
		}
	};

	barrier.timeout(timeout).await.map_err(|_| {
		tracing::warn!(?ids, ?timeout, "user existence check timed out");
		Error::Storage(StorageError::Timeout)
	})?
}

pub struct Users<D> {
	db: Arc<D>,
}

impl<D: Database> Users<D> {
	pub fn new(db: Arc<D>) -> Self {
		Self { db }
	}

	pub async fn create_user(&self, name: &str, email: &str) -> Result<User> {
		let name = name.trim();
		let email = email.trim();

		validate_name(name).map_err(Error::InvalidInput)?;
		validate_email(email).map_err(Error::InvalidInput)?;

		let now = crate::id::now();
		let user = User {
			id: Ulid::new(),
			name: name.to_string(),
			email: email.to_string(),
			last_post_id: None,
			created_at: now,
			updated_at: now,
		};

		self.db.insert_user(&user).await.map_err(|err| {
			tracing::error!(error = %err, "failed to insert user");
			err
		})?;

		tracing::debug!(user_id = %user.id, "created user");

		Ok(user)
	}

	pub async fn get_user(&self, id: Ulid) -> Result<User> {
		self.db.get_user(id).await?.ok_or(Error::UserNotFound(id))
	}

	pub async fn delete_user(&self, id: Ulid) -> Result<()> {
		if !self.db.delete_user(id).await? {
			return Err(Error::UserNotFound(id));
		}

		tracing::debug!(user_id = %id, "deleted user");

		Ok(())
	}
}
