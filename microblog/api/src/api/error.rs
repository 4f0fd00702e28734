use std::panic::Location;

use common::http::RouteError;
use hyper::StatusCode;

pub type Result<T, E = RouteError<ApiError>> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
	#[error("failed to read http body: {0}")]
	ParseHttpBody(#[from] hyper::Error),
	#[error("failed to parse json body: {0}")]
	ParseJson(#[from] serde_json::Error),
	#[error("failed to parse timestamp: {0}")]
	ParseTimestamp(#[from] chrono::ParseError),
	#[error(transparent)]
	Core(#[from] microblog_core::Error),
}

pub fn core_status(err: &microblog_core::Error) -> StatusCode {
	use microblog_core::Error;

	match err {
		Error::SelfEdge | Error::InvalidId(_) | Error::ContentTooLong { .. } | Error::InvalidInput(_) => {
			StatusCode::BAD_REQUEST
		}
		Error::UserNotFound(_) | Error::PostNotFound => StatusCode::NOT_FOUND,
		Error::TimelineUnavailable(_) | Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
	}
}

pub trait CoreResultExt<T> {
	/// Turns an engine error into a route error with the matching status.
	/// Server errors get a generic message, the details only go to the log.
	fn map_err_core(self) -> Result<T>;
}

impl<T> CoreResultExt<T> for std::result::Result<T, microblog_core::Error> {
	#[track_caller]
	fn map_err_core(self) -> Result<T> {
		let location = Location::caller();

		self.map_err(|err| {
			let status = core_status(&err);
			let message = match &err {
				microblog_core::Error::TimelineUnavailable(_) => "timeline unavailable".to_string(),
				_ if status.is_server_error() => "internal server error".to_string(),
				_ => err.to_string(),
			};

			RouteError::from((status, message, err)).with_location(location)
		})
	}
}
