use std::collections::HashMap;
use std::sync::Arc;

use common::database::Ulid;
use common::http::ext::{OptionExt, RequestGlobalExt, ResultExt};
use hyper::{Body, Request, StatusCode};
use routerify::ext::RequestExt;
use serde::de::DeserializeOwned;

use super::error::{CoreResultExt, Result};
use crate::global::ApiGlobal;

pub fn global<G: ApiGlobal>(req: &Request<Body>) -> Result<Arc<G>> {
	req.get_global::<G>()
}

pub async fn json_body<T: DeserializeOwned>(req: &mut Request<Body>) -> Result<T> {
	let body = hyper::body::to_bytes(req.body_mut())
		.await
		.map_err_route((StatusCode::BAD_REQUEST, "failed to read body"))?;

	serde_json::from_slice(&body).map_err_route((StatusCode::BAD_REQUEST, "invalid json body"))
}

pub fn query(req: &Request<Body>) -> HashMap<String, String> {
	req.uri()
		.query()
		.map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
		.unwrap_or_default()
}

pub fn path_id(req: &Request<Body>, name: &str) -> Result<Ulid> {
	let raw = req.param(name).map_err_route((StatusCode::BAD_REQUEST, "missing path parameter"))?;

	microblog_core::parse_id(raw).map_err_core()
}
