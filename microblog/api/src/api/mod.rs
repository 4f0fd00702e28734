use std::sync::Arc;

use common::http::RouteError;
use common::make_response;
use hyper::server::conn::Http;
use hyper::{Body, Request, Response, StatusCode};
use routerify::{RequestServiceBuilder, Router};
use serde_json::json;
use tokio::net::TcpSocket;
use tokio::select;

use self::error::{ApiError, Result};
use crate::config::AppConfig;
use crate::global::ApiGlobal;

pub mod error;
mod request;
pub mod v1;

async fn not_found(_: Request<Body>) -> Result<Response<Body>> {
	Ok(make_response!(
		StatusCode::NOT_FOUND,
		json!({ "message": "not found", "success": false })
	))
}

pub fn routes<G: ApiGlobal>(global: &Arc<G>) -> Router<Body, RouteError<ApiError>> {
	let weak = Arc::downgrade(global);
	Router::builder()
		.data(weak)
		.err_handler_with_info(common::http::error_handler::<ApiError>)
		.scope("/v1", v1::routes(global))
		.any(not_found)
		.build()
		.expect("failed to build router")
}

pub async fn run<G: ApiGlobal>(global: Arc<G>) -> anyhow::Result<()> {
	let config = global.config::<AppConfig>();

	tracing::info!("API listening on {}", config.api.bind_address);
	let socket = if config.api.bind_address.is_ipv6() {
		TcpSocket::new_v6()?
	} else {
		TcpSocket::new_v4()?
	};

	socket.set_reuseaddr(true)?;
	socket.set_reuseport(true)?;
	socket.bind(config.api.bind_address)?;
	let listener = socket.listen(1024)?;

	// Routes only hold a Weak reference to the global state, so open
	// keep-alive connections never stop it from being dropped on shutdown.
	let request_service =
		RequestServiceBuilder::new(routes(&global)).map_err(|err| anyhow::anyhow!("failed to build request service: {err}"))?;

	loop {
		select! {
			_ = global.ctx().done() => {
				return Ok(());
			},
			r = listener.accept() => {
				let (socket, addr) = r?;

				let service = request_service.build(addr);

				tracing::debug!("accepted connection from {}", addr);

				tokio::spawn(async move {
					if let Err(err) = Http::new().serve_connection(socket, service).await {
						tracing::debug!(error = %err, "connection closed with error");
					}
				});
			},
		}
	}
}
