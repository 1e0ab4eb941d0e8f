mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::api::API;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{estimates, fares, health, tariffs};

pub type DynAPI = Arc<dyn API + Send + Sync>;

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/health", get(health::check))
        .route("/fares", post(fares::create))
        .route("/estimates", post(estimates::create))
        .route("/tariffs", get(tariffs::list))
        .route("/tariffs/current", get(tariffs::current))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let api = Arc::new(api) as DynAPI;
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!("server stopped: {}", err);
            unexpected_error()
        })
}
