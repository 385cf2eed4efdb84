use actix_web::{App, HttpResponse, HttpServer, middleware, web};

use super::{ServiceError, common_routes, resolve_proxy, sse_response};
use crate::candidate::read_candidates;
use crate::config::FrontConfig;
use crate::front::{Front, WorkerPool};
use crate::transport::{ProxyConfig, ProxyFields};

#[derive(Debug, Clone)]
pub struct FrontState {
    pub front: Front,
    pub default_proxy: Option<ProxyConfig>,
}

impl FrontState {
    pub fn from_config(config: &FrontConfig, client: reqwest::Client) -> Self {
        Self {
            front: Front::new(
                WorkerPool::new(config.workers.iter().cloned(), client)
                    .with_response_timeout(config.worker_timeout),
                config.syntax,
                config.disposable_filter(),
            ),
            default_proxy: config.default_proxy.clone(),
        }
    }
}

async fn verify(
    state: web::Data<FrontState>,
    query: web::Query<ProxyFields>,
    body: web::Bytes,
) -> Result<HttpResponse, ServiceError> {
    let candidates = read_candidates(&body)?;
    let proxy = resolve_proxy(query.into_inner(), state.default_proxy.as_ref())?;
    let events = state.front.verify(candidates, proxy.as_ref()).await?;
    Ok(sse_response(events))
}

pub fn front_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::Data::new("front"))
        .route("/verify", web::post().to(verify));
    common_routes(cfg);
}

pub async fn run_front(config: FrontConfig) -> std::io::Result<()> {
    // pas de timeout global : le flux d'un worker dure tout le lot
    let client = reqwest::Client::builder()
        .user_agent(concat!("mailprobe-front/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(std::time::Duration::from_secs(10))
        .build()
        .map_err(std::io::Error::other)?;
    let state = FrontState::from_config(&config, client);
    tracing::info!(bind = %config.bind, workers = ?state.front.pool().workers(), "front listening");
    let data = web::Data::new(state);
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(data.clone())
            .configure(front_routes)
    })
    .bind(&config.bind)?
    .run()
    .await
}
