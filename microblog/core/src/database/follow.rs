use chrono::{DateTime, Utc};
use common::database::Ulid;

/// A directed edge in the follow graph. There is at most one row per
/// `(follower_id, followee_id)` pair, unfollowing only clears `active`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, sqlx::FromRow)]
pub struct Follow {
	pub follower_id: Ulid,
	pub followee_id: Ulid,
	pub active: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}
