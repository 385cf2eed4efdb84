//! HTTP surface shared by the worker and the front.
//!
//! Both expose `GET /`, `POST /verify` (text/event-stream) and
//! `POST /test-proxy`; only `/verify` differs.

mod error;
mod front;
mod worker;

use std::convert::Infallible;

use actix_web::web::{self, Bytes};
use actix_web::{HttpResponse, error::JsonPayloadError};
use futures::stream::{Stream, StreamExt};

pub use error::ServiceError;
pub use front::{FrontState, front_routes, run_front};
pub use worker::{WorkerState, run_worker, worker_routes};

use error::StatusBody;
use crate::stream::{encode_event, sse::CONTENT_TYPE};
use crate::transport::{ProxyConfig, ProxyFields, test_proxy};
use crate::verdict::VerdictEvent;

async fn index(name: web::Data<&'static str>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(format!("mailprobe {} is running", name.get_ref()))
}

/// `{proxy, proxyUser?, proxyPass?}` → 200 or 400 with `{status}`.
async fn proxy_check(fields: web::Json<ProxyFields>) -> Result<HttpResponse, ServiceError> {
    let proxy = fields
        .into_inner()
        .into_config()?
        .ok_or(ServiceError::MissingProxy)?;
    match test_proxy(&proxy).await {
        Ok(()) => Ok(HttpResponse::Ok().json(StatusBody {
            status: "Proxy connection successful".to_string(),
        })),
        Err(err) => {
            tracing::info!(proxy = %proxy.address(), error = %err, "proxy test failed");
            Ok(HttpResponse::BadRequest().json(StatusBody {
                status: format!("Proxy connection failed: {err}"),
            }))
        }
    }
}

fn json_error(err: JsonPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    ServiceError::Payload(err.to_string()).into()
}

/// Routes common to both roles; `/verify` is added by the caller.
pub(crate) fn common_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .route("/", web::get().to(index))
        .route("/test-proxy", web::post().to(proxy_check));
}

/// Request proxy, else the configured default.
pub(crate) fn resolve_proxy(
    fields: ProxyFields,
    default: Option<&ProxyConfig>,
) -> Result<Option<ProxyConfig>, ServiceError> {
    Ok(fields.into_config()?.or_else(|| default.cloned()))
}

/// Wrap an event stream as an SSE response.
pub(crate) fn sse_response<S>(events: S) -> HttpResponse
where
    S: Stream<Item = VerdictEvent> + 'static,
{
    let body = events.map(|event| Ok::<_, Infallible>(Bytes::from(encode_event(&event))));
    HttpResponse::Ok()
        .content_type(CONTENT_TYPE)
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(body)
}

#[cfg(test)]
mod tests;
