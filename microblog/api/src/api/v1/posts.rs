use std::sync::Arc;

use common::http::RouteError;
use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use microblog_core::{parse_id, validate_content};
use routerify::Router;
use serde_json::json;

use crate::api::error::{ApiError, CoreResultExt, Result};
use crate::api::request::{global, json_body};
use crate::global::ApiGlobal;

#[derive(Debug, serde::Deserialize)]
struct CreatePostRequest {
	user_id: String,
	content: String,
}

#[derive(Debug, serde::Deserialize)]
struct UpdatePostRequest {
	post_id: String,
	user_id: String,
	content: String,
}

async fn create_post<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = global::<G>(&req)?;
	let body: CreatePostRequest = json_body(&mut req).await?;

	let user_id = parse_id(&body.user_id).map_err_core()?;
	validate_content(&body.content).map_err_core()?;

	let post = global.microblog().create_post(user_id, &body.content).await.map_err_core()?;

	Ok(make_response!(StatusCode::CREATED, json!({ "success": true, "post": post })))
}

async fn update_post<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = global::<G>(&req)?;
	let body: UpdatePostRequest = json_body(&mut req).await?;

	let post_id = parse_id(&body.post_id).map_err_core()?;
	let user_id = parse_id(&body.user_id).map_err_core()?;
	validate_content(&body.content).map_err_core()?;

	let post = global
		.microblog()
		.update_post(post_id, user_id, &body.content)
		.await
		.map_err_core()?;

	Ok(make_response!(StatusCode::OK, json!({ "success": true, "post": post })))
}

pub fn routes<G: ApiGlobal>(_: &Arc<G>) -> Router<Body, RouteError<ApiError>> {
	Router::builder()
		.post("/", create_post::<G>)
		.put("/", update_post::<G>)
		.build()
		.expect("failed to build router")
}
