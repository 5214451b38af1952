#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use actix_web::{get, middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use anyhow::{Context, Result as AnyResult};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{AppConfig, StoreBackend};
use crate::domain::AppState;
use crate::error::ApiError;
use crate::metrics::Metrics;
use crate::service::run_burn;
use crate::store::{ListStore, MemoryStore, RedisStore};
use crate::validation::{apply_limits, default_workers, resolve_query};

/// `/burn?seconds=&workers=&mem_mb=`. Always answers `{"ok":true}` once every
/// worker has stopped; malformed parameters fall back to defaults.
#[get("/burn")]
pub async fn burn(req: HttpRequest, data: web::Data<AppState>) -> HttpResponse {
    let pairs = web::Query::<Vec<(String, String)>>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();
    let load = apply_limits(resolve_query(&pairs, default_workers()), &data.limits);
    info!(
        seconds = load.seconds,
        workers = load.workers,
        mem_mb = load.mem_mb,
        "burn request"
    );

    // Dropping the handler future (client went away) stops the workers.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    let report = run_burn(load, cancel).await;
    info!(
        spawned = report.spawned,
        acknowledged = report.acknowledged,
        blocks = report.blocks,
        elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
        "burn finished"
    );
    HttpResponse::Ok().json(json!({"ok": true}))
}

#[get("/lrange/{key}")]
pub async fn list_range(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let key = path.into_inner();
    range_response(&data, &key).await
}

#[get("/rpush/{key}/{value}")]
pub async fn list_push(
    path: web::Path<(String, String)>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let (key, value) = path.into_inner();
    data.metrics.record_store_op("rpush");
    data.store.push(&key, &value).await?;
    range_response(&data, &key).await
}

#[get("/info")]
pub async fn store_info(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    data.metrics.record_store_op("info");
    let info = data.store.info().await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(info))
}

#[get("/env")]
pub async fn env_dump() -> Result<HttpResponse, ApiError> {
    let environment: BTreeMap<String, String> = std::env::vars_os()
        .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
        .collect();
    pretty_json(&environment)
}

#[get("/healthz")]
pub async fn healthz(data: web::Data<AppState>) -> HttpResponse {
    data.metrics.record_store_op("ping");
    match data.store.ping().await {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(e) => {
            warn!(error = %e, "store ping failed");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

#[get("/metrics")]
pub async fn scrape_metrics(data: web::Data<AppState>) -> HttpResponse {
    match data.metrics.encode_text() {
        Ok(buf) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(buf),
        Err(e) => {
            error!(error=%format!("{e:#}"), "encode metrics failed");
            HttpResponse::InternalServerError().body("encode metrics failed")
        }
    }
}

/// Mount every endpoint. Shared by [`serve`] and the tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(burn)
        .service(list_range)
        .service(list_push)
        .service(store_info)
        .service(env_dump)
        .service(healthz)
        .service(scrape_metrics);
}

pub fn build_state(config: &AppConfig) -> AnyResult<AppState> {
    let metrics = Metrics::new().context("metrics init")?;
    let store: Arc<dyn ListStore> = match config.backend {
        StoreBackend::Redis => Arc::new(
            RedisStore::new(&config.redis_host).context("redis client")?,
        ),
        StoreBackend::Memory => Arc::new(MemoryStore::default()),
    };
    Ok(AppState::new(store, metrics, config.limits))
}

pub async fn serve(config: AppConfig) -> AnyResult<()> {
    let state = build_state(&config)?;
    info!(
        bind = %config.bind,
        backend = ?config.backend,
        redis_host = %config.redis_host,
        limits = ?config.limits,
        "starting server"
    );
    if config.limits.is_unbounded() {
        warn!("burn limits are unset; /burn accepts any workers and mem_mb");
    }
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind(&config.bind)
    .with_context(|| format!("bind {}", config.bind))?
    .run()
    .await
    .context("http server")
}

async fn range_response(data: &AppState, key: &str) -> Result<HttpResponse, ApiError> {
    data.metrics.record_store_op("lrange");
    let members = data.store.range(key).await?;
    pretty_json(&members)
}

fn pretty_json<T: Serialize>(value: &T) -> Result<HttpResponse, ApiError> {
    let body = serde_json::to_vec_pretty(value)?;
    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}
