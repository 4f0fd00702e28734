use std::time::Duration;

use futures::future::BoxFuture;
use futures::Future;
use tokio::time::Timeout;

use crate::context::{CancelReason, Context};

pub trait FutureTimeout: Future {
	#[inline(always)]
	fn timeout(self, duration: Duration) -> Timeout<Self>
	where
		Self: Sized,
	{
		tokio::time::timeout(duration, self)
	}
}

impl<F: Future> FutureTimeout for F {}

pub trait FutureContext: Future {
	/// Runs the future until it completes or `ctx` is done, whichever comes
	/// first. A context that is already done wins over a ready future.
	fn with_context(self, ctx: Context) -> BoxFuture<'static, Result<Self::Output, CancelReason>>
	where
		Self: Sized + Send + 'static,
		Self::Output: Send,
	{
		Box::pin(async move {
			tokio::select! {
				biased;
				reason = ctx.done() => Err(reason),
				output = self => Ok(output),
			}
		})
	}
}

impl<F: Future> FutureContext for F {}
