use std::sync::Arc;

use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use futures::StreamExt;

use super::{ServiceError, common_routes, resolve_proxy, sse_response};
use crate::candidate::read_candidates;
use crate::config::ServiceConfig;
use crate::pipeline::Pipeline;
use crate::stream::{BatchOptions, verdict_stream};
use crate::transport::{ProxyConfig, ProxyFields, connector_for};

/// Shared, read-only after startup.
#[derive(Debug, Clone)]
pub struct WorkerState {
    pub pipeline: Arc<Pipeline>,
    pub batch: BatchOptions,
    pub default_proxy: Option<ProxyConfig>,
}

impl WorkerState {
    pub fn from_config(config: &ServiceConfig, client: reqwest::Client) -> Self {
        Self {
            pipeline: Arc::new(config.pipeline(client)),
            batch: config.batch,
            default_proxy: config.default_proxy.clone(),
        }
    }
}

async fn verify(
    state: web::Data<WorkerState>,
    query: web::Query<ProxyFields>,
    body: web::Bytes,
) -> Result<HttpResponse, ServiceError> {
    let candidates = read_candidates(&body)?;
    let proxy = resolve_proxy(query.into_inner(), state.default_proxy.as_ref())?;
    let connector = connector_for(proxy.as_ref());
    let verdicts = verdict_stream(
        state.pipeline.clone(),
        candidates,
        connector,
        state.batch,
    );
    Ok(sse_response(verdicts.map(|v| v.to_event())))
}

pub fn worker_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::Data::new("worker"))
        .route("/verify", web::post().to(verify));
    common_routes(cfg);
}

pub async fn run_worker(config: ServiceConfig) -> std::io::Result<()> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("mailprobe/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(std::io::Error::other)?;
    let state = WorkerState::from_config(&config, client);
    tracing::info!(
        bind = %config.bind,
        stages = ?state.pipeline.stage_names(),
        providers = ?config.providers,
        "worker listening"
    );
    let data = web::Data::new(state);
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(data.clone())
            .configure(worker_routes)
    })
    .bind(&config.bind)?
    .run()
    .await
}
