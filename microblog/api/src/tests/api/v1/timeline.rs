use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use hyper::StatusCode;
use serde_json::json;

use crate::tests::api::TestServer;

fn rfc3339(at: DateTime<Utc>) -> String {
	at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[tokio::test]
async fn test_timeline() {
	let server = TestServer::start().await;
	let alice = server.create_user("alice").await;
	let bob = server.create_user("bob").await;

	for content in ["hello", "world"] {
		let (status, _) = server
			.post("/v1/posts", json!({ "user_id": bob, "content": content }))
			.await;
		assert_eq!(status, StatusCode::CREATED);
	}

	server
		.post("/v1/follow", json!({ "follower_id": alice, "followee_id": bob }))
		.await;

	let before = rfc3339(Utc::now() + chrono::Duration::seconds(1));
	let (status, body) = server
		.get(&format!("/v1/timeline?user_id={alice}&limit=10&before={}", urlencode(&before)))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["user_id"], alice.as_str());

	let contents: Vec<_> = body["posts"]
		.as_array()
		.expect("posts array")
		.iter()
		.map(|post| post["content"].as_str().expect("content"))
		.collect();
	assert_eq!(contents, ["world", "hello"]);

	let (status, body) = server
		.get(&format!("/v1/timeline?user_id={alice}&limit=1&before={}", urlencode(&before)))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["posts"].as_array().expect("posts array").len(), 1);

	server.shutdown().await;
}

#[tokio::test]
async fn test_timeline_limit_fallback() {
	let server = TestServer::start().await;
	let alice = server.create_user("alice").await;
	let bob = server.create_user("bob").await;

	server
		.post("/v1/follow", json!({ "follower_id": alice, "followee_id": bob }))
		.await;
	server
		.post("/v1/posts", json!({ "user_id": bob, "content": "only post" }))
		.await;

	// let the post fall strictly before the default cursor
	tokio::time::sleep(Duration::from_millis(5)).await;

	for limit in ["0", "101", "abc", ""] {
		let (status, body) = server.get(&format!("/v1/timeline?user_id={alice}&limit={limit}")).await;
		assert_eq!(status, StatusCode::OK, "limit={limit}");
		assert_eq!(body["posts"].as_array().expect("posts array").len(), 1);
	}

	server.shutdown().await;
}

#[tokio::test]
async fn test_timeline_bad_requests() {
	let server = TestServer::start().await;
	let alice = server.create_user("alice").await;

	let (status, _) = server.get("/v1/timeline").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, _) = server.get("/v1/timeline?user_id=nope").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, body) = server
		.get(&format!("/v1/timeline?user_id={alice}&before=yesterday"))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "before must be an RFC 3339 timestamp");

	let (status, body) = server.get(&format!("/v1/timeline?user_id={alice}")).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["posts"], json!([]));

	server.shutdown().await;
}

fn urlencode(value: &str) -> String {
	url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
