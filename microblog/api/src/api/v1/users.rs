use std::sync::Arc;

use common::http::RouteError;
use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use routerify::Router;
use serde_json::json;

use crate::api::error::{ApiError, CoreResultExt, Result};
use crate::api::request::{global, json_body, path_id};
use crate::global::ApiGlobal;

#[derive(Debug, serde::Deserialize)]
struct CreateUserRequest {
	name: String,
	email: String,
}

async fn create_user<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = global::<G>(&req)?;
	let body: CreateUserRequest = json_body(&mut req).await?;

	let user = global.microblog().create_user(&body.name, &body.email).await.map_err_core()?;

	Ok(make_response!(StatusCode::CREATED, json!({ "success": true, "user": user })))
}

async fn get_user<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = global::<G>(&req)?;
	let user_id = path_id(&req, "id")?;

	let user = global.microblog().get_user(user_id).await.map_err_core()?;

	Ok(make_response!(StatusCode::OK, json!({ "success": true, "user": user })))
}

async fn delete_user<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = global::<G>(&req)?;
	let user_id = path_id(&req, "id")?;

	global.microblog().delete_user(user_id).await.map_err_core()?;

	Ok(make_response!(StatusCode::OK, json!({ "success": true, "user_id": user_id })))
}

pub fn routes<G: ApiGlobal>(_: &Arc<G>) -> Router<Body, RouteError<ApiError>> {
	Router::builder()
		.post("/", create_user::<G>)
		.get("/:id", get_user::<G>)
		.delete("/:id", delete_user::<G>)
		.build()
		.expect("failed to build router")
}
