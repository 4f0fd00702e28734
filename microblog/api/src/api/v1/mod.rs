use std::sync::Arc;

use common::http::RouteError;
use hyper::Body;
use routerify::Router;

use super::error::ApiError;
use crate::global::ApiGlobal;

mod follows;
mod health;
mod posts;
mod timeline;
mod users;

pub fn routes<G: ApiGlobal>(global: &Arc<G>) -> Router<Body, RouteError<ApiError>> {
	Router::builder()
		.scope("/health", health::routes(global))
		.scope("/users", users::routes(global))
		.scope("/posts", posts::routes(global))
		.scope("/timeline", timeline::routes(global))
		.post("/follow", follows::follow::<G>)
		.post("/unfollow", follows::unfollow::<G>)
		.get("/followees/:id", follows::followees::<G>)
		.build()
		.expect("failed to build router")
}
