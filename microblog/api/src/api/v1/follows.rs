use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use microblog_core::{parse_id, PageLimit};
use serde_json::json;

use crate::api::error::{CoreResultExt, Result};
use crate::api::request::{global, json_body, path_id, query};
use crate::global::ApiGlobal;

#[derive(Debug, serde::Deserialize)]
struct FollowRequest {
	follower_id: String,
	followee_id: String,
}

pub async fn follow<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = global::<G>(&req)?;
	let body: FollowRequest = json_body(&mut req).await?;

	let follower_id = parse_id(&body.follower_id).map_err_core()?;
	let followee_id = parse_id(&body.followee_id).map_err_core()?;

	global.microblog().follow(follower_id, followee_id).await.map_err_core()?;

	Ok(make_response!(StatusCode::OK, json!({ "success": true })))
}

pub async fn unfollow<G: ApiGlobal>(mut req: Request<Body>) -> Result<Response<Body>> {
	let global = global::<G>(&req)?;
	let body: FollowRequest = json_body(&mut req).await?;

	let follower_id = parse_id(&body.follower_id).map_err_core()?;
	let followee_id = parse_id(&body.followee_id).map_err_core()?;

	global.microblog().unfollow(follower_id, followee_id).await.map_err_core()?;

	Ok(make_response!(StatusCode::OK, json!({ "success": true })))
}

pub async fn followees<G: ApiGlobal>(req: Request<Body>) -> Result<Response<Body>> {
	let global = global::<G>(&req)?;
	let user_id = path_id(&req, "id")?;
	let limit = PageLimit::parse_or_default(query(&req).get("limit").map(String::as_str));

	let followees = global.microblog().list_followees(user_id, limit).await.map_err_core()?;

	Ok(make_response!(
		StatusCode::OK,
		json!({ "success": true, "user_id": user_id, "followees": followees })
	))
}
