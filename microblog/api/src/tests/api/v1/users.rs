use hyper::{Method, StatusCode};
use serde_json::json;

use crate::tests::api::TestServer;

#[tokio::test]
async fn test_user_lifecycle() {
	let server = TestServer::start().await;

	let id = server.create_user("alice").await;

	let (status, body) = server.get(&format!("/v1/users/{id}")).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["success"], true);
	assert_eq!(body["user"]["name"], "alice");
	assert_eq!(body["user"]["email"], "alice@example.com");
	assert!(body["user"]["last_post_id"].is_null());

	let (status, body) = server.request(Method::DELETE, &format!("/v1/users/{id}"), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["user_id"], id.as_str());

	let (status, body) = server.get(&format!("/v1/users/{id}")).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["success"], false);

	server.shutdown().await;
}

#[tokio::test]
async fn test_user_bad_requests() {
	let server = TestServer::start().await;

	let (status, _) = server.get("/v1/users/not-an-id").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, _) = server
		.post("/v1/users", json!({ "name": "bob", "email": "nope" }))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, body) = server.post("/v1/users", json!({ "name": "bob" })).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "invalid json body");

	server.shutdown().await;
}
