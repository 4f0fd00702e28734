use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use common::context::Context;
use common::database::Ulid;
use common::prelude::FutureContext;
use tokio::time::Instant;

use crate::database::Database;

/// Keeps `User::last_post_id` pointing at the newest write in the background.
///
/// Every write runs in its own task under a child of the service context with
/// a deadline. Failures are logged and dropped, nothing is retried.
pub struct Denormalizer<D> {
	db: Arc<D>,
	ctx: Context,
	timeout: Duration,
}

impl<D: Database> Denormalizer<D> {
	pub fn new(ctx: Context, db: Arc<D>, timeout: Duration) -> Self {
		Self { db, ctx, timeout }
	}

	pub fn schedule(&self, user_id: Ulid, post_id: Ulid, at: DateTime<Utc>) -> tokio::task::JoinHandle<()> {
		let db = self.db.clone();
		let (ctx, handler) = Context::with_parent(self.ctx.clone(), Some(Instant::now() + self.timeout));

		tokio::spawn(async move {
			// dropping the handler would cancel ctx
			let _handler = handler;

			let write = async move { db.set_last_post(user_id, post_id, at).await };

			match write.with_context(ctx).await {
				Ok(Ok(())) => tracing::debug!(%user_id, %post_id, "updated last post"),
				Ok(Err(err)) => tracing::warn!(%user_id, %post_id, error = %err, "failed to update last post"),
				Err(reason) => tracing::warn!(%user_id, %post_id, %reason, "abandoned last post update"),
			}
		})
	}
}
