use chrono::{DateTime, Utc};
use common::database::Ulid;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, sqlx::FromRow)]
pub struct User {
	/// The unique identifier for the user.
	pub id: Ulid,
	/// The display name of the user.
	pub name: String,
	/// The email of the user.
	pub email: String,
	/// The most recent post by this user. Updated in the background after
	/// the post is written, so it may lag behind.
	pub last_post_id: Option<Ulid>,
	/// The time the user was created.
	pub created_at: DateTime<Utc>,
	/// The time the user was last updated.
	pub updated_at: DateTime<Utc>,
}
