use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::http::ext::{OptionExt, ResultExt};
use common::http::RouteError;
use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use microblog_core::{parse_id, PageLimit};
use routerify::Router;
use serde_json::json;

use crate::api::error::{ApiError, CoreResultExt, Result};
use crate::api::request::{global, query};
use crate::global::ApiGlobal;

/// `GET /v1/timeline?user_id=&limit=&before=`
///
/// `limit` quietly falls back to the default when it is unusable, a malformed
/// `before` is rejected. Without `before` the configured default applies.
async fn timeline<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = global::<G>(&req)?;
	let query = query(&req);

	let user_id = query
		.get("user_id")
		.map_err_route((StatusCode::BAD_REQUEST, "missing user_id"))?;
	let user_id = parse_id(user_id).map_err_core()?;

	let limit = PageLimit::parse_or_default(query.get("limit").map(String::as_str));

	let before = query
		.get("before")
		.map(|before| DateTime::parse_from_rfc3339(before).map(|before| before.with_timezone(&Utc)))
		.transpose()
		.map_err_route((StatusCode::BAD_REQUEST, "before must be an RFC 3339 timestamp"))?;

	let posts = global
		.microblog()
		.get_timeline(user_id, limit, before)
		.await
		.map_err_core()?;

	Ok(make_response!(
		StatusCode::OK,
		json!({ "success": true, "user_id": user_id, "posts": posts })
	))
}

pub fn routes<G: ApiGlobal>(_: &Arc<G>) -> Router<Body, RouteError<ApiError>> {
	Router::builder()
		.get("/", timeline::<G>)
		.build()
		.expect("failed to build router")
}
