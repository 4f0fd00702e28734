use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, oneshot};
use tokio::time::Instant;

/// Why a [`Context`] finished.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CancelReason {
	Parent,
	Deadline,
	Cancel,
}

impl Display for CancelReason {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Parent => write!(f, "parent cancelled"),
			Self::Deadline => write!(f, "deadline exceeded"),
			Self::Cancel => write!(f, "cancelled"),
		}
	}
}

struct RawContext {
	// Dropped together with the last clone of the context, which is what
	// `Handler::cancel` waits on.
	_alive: oneshot::Sender<()>,
	deadline: Option<Instant>,
	parent: Option<Context>,
	cancel: broadcast::Receiver<()>,
}

impl RawContext {
	fn new(parent: Option<Context>, deadline: Option<Instant>) -> (Self, Handler) {
		let (alive_send, alive_recv) = oneshot::channel();
		let (cancel_send, cancel_recv) = broadcast::channel(1);

		// A child can never outlive the deadline of its parent.
		let deadline = match (deadline, parent.as_ref().and_then(|p| p.deadline())) {
			(Some(own), Some(inherited)) => Some(own.min(inherited)),
			(own, inherited) => own.or(inherited),
		};

		(
			Self {
				_alive: alive_send,
				deadline,
				parent,
				cancel: cancel_recv,
			},
			Handler {
				alive: alive_recv,
				cancel: cancel_send,
			},
		)
	}

	fn done(&self) -> Pin<Box<dyn Future<Output = CancelReason> + Send + '_>> {
		let mut cancel = self.cancel.resubscribe();

		Box::pin(async move {
			let parent = async {
				match &self.parent {
					Some(parent) => {
						parent.done().await;
					}
					None => std::future::pending().await,
				}
			};

			let deadline = async {
				match self.deadline {
					Some(deadline) => tokio::time::sleep_until(deadline).await,
					None => std::future::pending().await,
				}
			};

			tokio::select! {
				biased;
				_ = cancel.recv() => CancelReason::Cancel,
				_ = deadline => CancelReason::Deadline,
				_ = parent => CancelReason::Parent,
			}
		})
	}
}

/// The owning side of a [`Context`].
///
/// Dropping the handler cancels every clone of the context.
pub struct Handler {
	alive: oneshot::Receiver<()>,
	cancel: broadcast::Sender<()>,
}

impl Handler {
	/// Resolves once every clone of the context has been dropped.
	pub async fn done(&mut self) {
		let _ = (&mut self.alive).await;
	}

	/// Cancels the context and waits for every clone of it to be dropped.
	pub async fn cancel(self) {
		drop(self.cancel);

		let _ = self.alive.await;
	}
}

/// A cheaply clonable cancellation token with an optional deadline and parent.
#[derive(Clone)]
pub struct Context(Arc<RawContext>);

impl Context {
	#[must_use]
	pub fn new() -> (Self, Handler) {
		Self::build(None, None)
	}

	#[must_use]
	pub fn with_deadline(deadline: Instant) -> (Self, Handler) {
		Self::build(None, Some(deadline))
	}

	#[must_use]
	pub fn with_timeout(timeout: Duration) -> (Self, Handler) {
		Self::with_deadline(Instant::now() + timeout)
	}

	#[must_use]
	pub fn with_parent(parent: Context, deadline: Option<Instant>) -> (Self, Handler) {
		Self::build(Some(parent), deadline)
	}

	fn build(parent: Option<Context>, deadline: Option<Instant>) -> (Self, Handler) {
		let (raw, handler) = RawContext::new(parent, deadline);
		(Self(Arc::new(raw)), handler)
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.0.deadline
	}

	pub async fn done(&self) -> CancelReason {
		self.0.done().await
	}
}
