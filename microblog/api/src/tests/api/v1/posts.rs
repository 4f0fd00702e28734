use hyper::{Method, StatusCode};
use serde_json::json;

use crate::tests::api::TestServer;

#[tokio::test]
async fn test_create_and_update_post() {
	let server = TestServer::start().await;
	let alice = server.create_user("alice").await;
	let bob = server.create_user("bob").await;

	let (status, body) = server
		.post("/v1/posts", json!({ "user_id": alice, "content": "hello" }))
		.await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(body["post"]["content"], "hello");
	assert_eq!(body["post"]["user_id"], alice.as_str());
	let post_id = body["post"]["id"].as_str().expect("post id").to_string();

	let (status, body) = server
		.request(
			Method::PUT,
			"/v1/posts",
			Some(json!({ "post_id": post_id, "user_id": alice, "content": "hello again" })),
		)
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["post"]["content"], "hello again");

	// someone else's post looks like a missing one
	let (status, _) = server
		.request(
			Method::PUT,
			"/v1/posts",
			Some(json!({ "post_id": post_id, "user_id": bob, "content": "mine now" })),
		)
		.await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	server.shutdown().await;
}

#[tokio::test]
async fn test_post_validation() {
	let server = TestServer::start().await;
	let alice = server.create_user("alice").await;

	let (status, body) = server
		.post("/v1/posts", json!({ "user_id": alice, "content": "a".repeat(281) }))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["success"], false);

	let (status, _) = server
		.post("/v1/posts", json!({ "user_id": "garbage", "content": "hi" }))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, _) = server
		.post("/v1/posts", json!({ "user_id": microblog_core::Ulid::new(), "content": "hi" }))
		.await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, _) = server
		.request(
			Method::PUT,
			"/v1/posts",
			Some(json!({ "post_id": "garbage", "user_id": alice, "content": "hi" })),
		)
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	server.shutdown().await;
}
