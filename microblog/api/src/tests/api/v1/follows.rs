use hyper::StatusCode;
use serde_json::json;

use crate::global::GlobalMicroblog;
use crate::tests::api::TestServer;

#[tokio::test]
async fn test_follow_unfollow() {
	let server = TestServer::start().await;
	let alice = server.create_user("alice").await;
	let bob = server.create_user("bob").await;

	for _ in 0..2 {
		let (status, body) = server
			.post("/v1/follow", json!({ "follower_id": alice, "followee_id": bob }))
			.await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["success"], true);
	}
	assert_eq!(server.global.microblog().database().follow_count(), 1);

	let (status, body) = server.get(&format!("/v1/followees/{alice}")).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["followees"], json!([bob]));

	let (status, _) = server
		.post("/v1/unfollow", json!({ "follower_id": alice, "followee_id": bob }))
		.await;
	assert_eq!(status, StatusCode::OK);

	let (status, body) = server.get(&format!("/v1/followees/{alice}?limit=abc")).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["followees"], json!([]));
	assert_eq!(server.global.microblog().database().follow_count(), 1);

	server.shutdown().await;
}

#[tokio::test]
async fn test_follow_errors() {
	let server = TestServer::start().await;
	let alice = server.create_user("alice").await;

	let (status, body) = server
		.post("/v1/follow", json!({ "follower_id": alice, "followee_id": alice }))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "a user cannot follow themselves");

	let ghost = microblog_core::Ulid::new();
	let (status, body) = server
		.post("/v1/follow", json!({ "follower_id": alice, "followee_id": ghost }))
		.await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["message"], format!("user {ghost} not found"));

	let (status, _) = server
		.post("/v1/unfollow", json!({ "follower_id": alice, "followee_id": "nope" }))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, _) = server.get("/v1/followees/nope").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	server.shutdown().await;
}
