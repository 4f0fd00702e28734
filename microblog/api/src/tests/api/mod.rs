use std::sync::Arc;
use std::time::Duration;

use common::context::Handler;
use common::prelude::FutureTimeout;
use hyper::client::HttpConnector;
use hyper::{Body, Client, Method, Request, StatusCode};
use microblog_core::database::MemoryDatabase;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use crate::api::run;
use crate::config::AppConfig;
use crate::global::GlobalState;
use crate::tests::global::mock_global_state;

mod v1;

pub struct TestServer {
	pub global: Arc<GlobalState<MemoryDatabase>>,
	pub client: Client<HttpConnector>,
	base: String,
	handler: Handler,
	handle: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
	pub async fn start() -> Self {
		let port = portpicker::pick_unused_port().expect("failed to pick port");

		let mut config = AppConfig::default();
		config.api.bind_address = format!("127.0.0.1:{port}").parse().expect("failed to parse bind address");

		let (global, handler) = mock_global_state(config);

		let handle = tokio::spawn(run(global.clone()));

		// We need to wait for the server to start
		tokio::time::sleep(Duration::from_millis(300)).await;

		Self {
			global,
			client: Client::new(),
			base: format!("http://127.0.0.1:{port}"),
			handler,
			handle,
		}
	}

	pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
		let req = Request::builder()
			.method(method)
			.uri(format!("{}{}", self.base, path))
			.header("content-type", "application/json")
			.body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
			.expect("failed to build request");

		let resp = self.client.request(req).await.expect("failed to send request");
		let status = resp.status();

		assert_eq!(
			resp.headers().get("content-type").expect("missing content-type"),
			"application/json"
		);

		let body = hyper::body::to_bytes(resp.into_body()).await.expect("failed to read body");
		let body = serde_json::from_slice(&body).expect("body is not json");

		(status, body)
	}

	pub async fn get(&self, path: &str) -> (StatusCode, Value) {
		self.request(Method::GET, path, None).await
	}

	pub async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
		self.request(Method::POST, path, Some(body)).await
	}

	pub async fn create_user(&self, name: &str) -> String {
		let (status, body) = self
			.post("/v1/users", json!({ "name": name, "email": format!("{name}@example.com") }))
			.await;
		assert_eq!(status, StatusCode::CREATED, "{body}");

		body["user"]["id"].as_str().expect("user id").to_string()
	}

	pub async fn shutdown(self) {
		let Self {
			global,
			client,
			handler,
			handle,
			..
		} = self;

		// The client uses Keep-Alive, so we need to drop it to release the global context
		drop(client);
		drop(global);

		handler
			.cancel()
			.timeout(Duration::from_secs(1))
			.await
			.expect("failed to cancel context");
		handle
			.timeout(Duration::from_secs(1))
			.await
			.expect("failed to cancel api")
			.expect("api failed")
			.expect("api failed");
	}
}

#[tokio::test]
async fn test_health() {
	let server = TestServer::start().await;

	let (status, body) = server.get("/v1/health").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({ "status": "ok" }));

	server.shutdown().await;
}

#[tokio::test]
async fn test_unknown_route() {
	let server = TestServer::start().await;

	let (status, body) = server.get("/v2/nothing").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["success"], false);

	server.shutdown().await;
}
