use chrono::{DateTime, Utc};
use common::database::Ulid;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, sqlx::FromRow)]
pub struct Post {
	pub id: Ulid,
	/// The author. May point at a user that no longer exists.
	pub user_id: Ulid,
	pub content: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}
