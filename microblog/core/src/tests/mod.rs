use std::sync::Arc;

use common::context::{Context, Handler};

use crate::database::MemoryDatabase;
use crate::{Microblog, Options, User};

mod timeline;

pub(crate) struct Harness {
	pub microblog: Microblog<MemoryDatabase>,
	pub db: Arc<MemoryDatabase>,
	// keeps background tasks alive
	pub handler: Handler,
}

pub(crate) fn harness() -> Harness {
	harness_with(MemoryDatabase::new(), Options::default())
}

pub(crate) fn harness_with(db: MemoryDatabase, options: Options) -> Harness {
	let (ctx, handler) = Context::new();
	let db = Arc::new(db);

	Harness {
		microblog: Microblog::new(ctx, db.clone(), options),
		db,
		handler,
	}
}

impl Harness {
	pub async fn user(&self, name: &str) -> User {
		self.microblog
			.create_user(name, &format!("{name}@example.com"))
			.await
			.expect("failed to create user")
	}
}
