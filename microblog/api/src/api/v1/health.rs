use std::sync::Arc;

use common::http::RouteError;
use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use routerify::Router;
use serde_json::json;

use crate::api::error::{ApiError, Result};
use crate::global::ApiGlobal;

async fn health(_: Request<Body>) -> Result<Response<Body>> {
	Ok(make_response!(StatusCode::OK, json!({ "status": "ok" })))
}

pub fn routes<G: ApiGlobal>(_: &Arc<G>) -> Router<Body, RouteError<ApiError>> {
	Router::builder().get("/", health).build().expect("failed to build router")
}
