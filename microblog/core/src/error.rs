use common::database::Ulid;

/// Failures of the storage layer itself, as opposed to a rejected request.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("migration error: {0}")]
	Migrate(#[from] sqlx::migrate::MigrateError),
	#[error("storage operation timed out")]
	Timeout,
	#[error("storage unavailable: {0}")]
	Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("a user cannot follow themselves")]
	SelfEdge,
	#[error("user {0} not found")]
	UserNotFound(Ulid),
	#[error("post not found")]
	PostNotFound,
	#[error("content is {len} characters long, at most {max} are allowed")]
	ContentTooLong { len: usize, max: usize },
	#[error("invalid id: {0:?}")]
	InvalidId(String),
	#[error("{0}")]
	InvalidInput(&'static str),
	#[error("timeline unavailable: {0}")]
	TimelineUnavailable(#[source] StorageError),
	#[error("storage error: {0}")]
	Storage(#[from] StorageError),
}

impl Error {
	/// True for errors caused by the request rather than by the system.
	pub fn is_client_error(&self) -> bool {
		!matches!(self, Self::TimelineUnavailable(_) | Self::Storage(_))
	}
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
