use std::str::FromStr;

use chrono::{DateTime, Utc};
use common::database::Ulid;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};

use super::{Follow, FollowStore, Post, PostStore, User, UserStore};
use crate::error::StorageError;

/// Postgres backed storage. The follow upsert relies on the
/// `(follower_id, followee_id)` unique constraint for atomicity.
#[derive(Debug, Clone)]
pub struct PgDatabase {
	pool: PgPool,
}

impl PgDatabase {
	pub async fn connect(uri: &str, max_connections: u32) -> Result<Self, StorageError> {
		let options = PgConnectOptions::from_str(uri)?.disable_statement_logging();

		let pool = PgPoolOptions::new()
			.max_connections(max_connections)
			.connect_with(options)
			.await?;

		Ok(Self { pool })
	}

	pub fn from_pool(pool: PgPool) -> Self {
		Self { pool }
	}

	pub fn pool(&self) -> &PgPool {
		&self.pool
	}

	pub async fn migrate(&self) -> Result<(), StorageError> {
		sqlx::migrate!("./migrations").run(&self.pool).await?;
		Ok(())
	}
}

#[async_trait::async_trait]
impl UserStore for PgDatabase {
	async fn insert_user(&self, user: &User) -> Result<(), StorageError> {
		sqlx::query(
			"INSERT INTO users (id, name, email, last_post_id, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6)",
		)
		.bind(user.id)
		.bind(&user.name)
		.bind(&user.email)
		.bind(user.last_post_id)
		.bind(user.created_at)
		.bind(user.updated_at)
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	async fn get_user(&self, id: Ulid) -> Result<Option<User>, StorageError> {
		Ok(sqlx::query_as("SELECT * FROM users WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.pool)
			.await?)
	}

	async fn delete_user(&self, id: Ulid) -> Result<bool, StorageError> {
		let result = sqlx::query("DELETE FROM users WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	async fn user_exists(&self, id: Ulid) -> Result<bool, StorageError> {
		Ok(sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
			.bind(id)
			.fetch_one(&self.pool)
			.await?)
	}

	async fn set_last_post(&self, user_id: Ulid, post_id: Ulid, at: DateTime<Utc>) -> Result<(), StorageError> {
		sqlx::query("UPDATE users SET last_post_id = $2, updated_at = $3 WHERE id = $1 AND updated_at <= $3")
			.bind(user_id)
			.bind(post_id)
			.bind(at)
			.execute(&self.pool)
			.await?;

		Ok(())
	}
}

#[async_trait::async_trait]
impl PostStore for PgDatabase {
	async fn insert_post(&self, post: &Post) -> Result<(), StorageError> {
		sqlx::query("INSERT INTO posts (id, user_id, content, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)")
			.bind(post.id)
			.bind(post.user_id)
			.bind(&post.content)
			.bind(post.created_at)
			.bind(post.updated_at)
			.execute(&self.pool)
			.await?;

		Ok(())
	}

	async fn get_post(&self, id: Ulid) -> Result<Option<Post>, StorageError> {
		Ok(sqlx::query_as("SELECT * FROM posts WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.pool)
			.await?)
	}

	async fn post_exists(&self, id: Ulid, user_id: Ulid) -> Result<bool, StorageError> {
		Ok(sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1 AND user_id = $2)")
			.bind(id)
			.bind(user_id)
			.fetch_one(&self.pool)
			.await?)
	}

	async fn update_post(
		&self,
		id: Ulid,
		user_id: Ulid,
		content: &str,
		at: DateTime<Utc>,
	) -> Result<Option<Post>, StorageError> {
		Ok(
			sqlx::query_as("UPDATE posts SET content = $3, updated_at = $4 WHERE id = $1 AND user_id = $2 RETURNING *")
				.bind(id)
				.bind(user_id)
				.bind(content)
				.bind(at)
				.fetch_optional(&self.pool)
				.await?,
		)
	}

	async fn followed_posts(&self, follower_id: Ulid, before: DateTime<Utc>, limit: u32) -> Result<Vec<Post>, StorageError> {
		Ok(sqlx::query_as(
			r#"
			SELECT p.*
			FROM posts p
			INNER JOIN follows f ON f.followee_id = p.user_id
			WHERE f.follower_id = $1 AND f.active AND p.created_at < $2
			ORDER BY p.created_at DESC, p.id DESC
			LIMIT $3
			"#,
		)
		.bind(follower_id)
		.bind(before)
		.bind(i64::from(limit))
		.fetch_all(&self.pool)
		.await?)
	}
}

#[async_trait::async_trait]
impl FollowStore for PgDatabase {
	async fn upsert_follow(&self, follower_id: Ulid, followee_id: Ulid, at: DateTime<Utc>) -> Result<(), StorageError> {
		sqlx::query(
			r#"
			INSERT INTO follows (follower_id, followee_id, active, created_at, updated_at)
			VALUES ($1, $2, TRUE, $3, $3)
			ON CONFLICT (follower_id, followee_id) DO UPDATE SET
				active = TRUE,
				updated_at = CASE WHEN follows.active THEN follows.updated_at ELSE EXCLUDED.updated_at END
			"#,
		)
		.bind(follower_id)
		.bind(followee_id)
		.bind(at)
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	async fn deactivate_follow(&self, follower_id: Ulid, followee_id: Ulid, at: DateTime<Utc>) -> Result<(), StorageError> {
		sqlx::query("UPDATE follows SET active = FALSE, updated_at = $3 WHERE follower_id = $1 AND followee_id = $2 AND active")
			.bind(follower_id)
			.bind(followee_id)
			.bind(at)
			.execute(&self.pool)
			.await?;

		Ok(())
	}

	async fn get_follow(&self, follower_id: Ulid, followee_id: Ulid) -> Result<Option<Follow>, StorageError> {
		Ok(sqlx::query_as("SELECT * FROM follows WHERE follower_id = $1 AND followee_id = $2")
			.bind(follower_id)
			.bind(followee_id)
			.fetch_optional(&self.pool)
			.await?)
	}

	async fn list_active_followees(&self, user_id: Ulid, limit: u32) -> Result<Vec<Ulid>, StorageError> {
		Ok(
			sqlx::query_scalar("SELECT followee_id FROM follows WHERE follower_id = $1 AND active ORDER BY created_at, followee_id LIMIT $2")
				.bind(user_id)
				.bind(i64::from(limit))
				.fetch_all(&self.pool)
				.await?,
		)
	}
}
