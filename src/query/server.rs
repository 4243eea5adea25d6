use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::core::{StripRecord, Year};
use crate::index::StripIndex;
use crate::query::ServeError;
use crate::stats::ScanStats;

#[derive(Serialize)]
pub struct StatusResponse {
    pub strips: usize,
    pub years: usize,
    pub scan: ScanStats,
}

/// HTTP 查询服务：索引只读共享，handler 之间无锁
pub struct QueryServer {
    pub index: Arc<StripIndex>,
}

impl QueryServer {
    pub fn new(index: Arc<StripIndex>) -> Self {
        Self { index }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/years", get(years_handler))
            .route("/api/strips/:year", get(strips_handler))
            .route("/api/status", get(status_handler))
            .route("/comics/*path", get(comic_handler))
            .with_state(self.index.clone())
    }

    pub async fn run(self, addr: SocketAddr) -> anyhow::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(
            "Serving {} comic strips at {}",
            self.index.strip_count(),
            listener.local_addr()?
        );
        self.serve(listener).await
    }

    /// 在已绑定的 listener 上服务，直到收到 Ctrl-C
    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}

async fn years_handler(State(index): State<Arc<StripIndex>>) -> Json<Vec<Year>> {
    Json(index.list_years().to_vec())
}

async fn strips_handler(
    Path(year): Path<String>,
    State(index): State<Arc<StripIndex>>,
) -> Result<Json<Vec<StripRecord>>, ServeError> {
    index
        .list_strips(&year)
        .map(|strips| Json(strips.to_vec()))
        .ok_or(ServeError::NotFound)
}

async fn status_handler(State(index): State<Arc<StripIndex>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        strips: index.strip_count(),
        years: index.list_years().len(),
        scan: index.scan_stats().clone(),
    })
}

async fn comic_handler(
    Path(path): Path<String>,
    State(index): State<Arc<StripIndex>>,
) -> Result<Response, ServeError> {
    if !index.contains_path(&path) {
        return Err(ServeError::NotFound);
    }

    let content_type = content_type_for(&path);
    // 解压是阻塞 IO，放到 blocking 线程池
    let body = tokio::task::spawn_blocking(move || read_strip(&index, &path))
        .await
        .map_err(|e| ServeError::Worker(e.to_string()))??;

    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

/// 打开并读完一条漫画；流在所有返回路径上随作用域释放
fn read_strip(index: &StripIndex, path: &str) -> Result<Vec<u8>, ServeError> {
    let mut reader = index
        .open_strip(path)
        .map_err(|source| ServeError::Open {
            path: path.to_string(),
            source,
        })?
        .ok_or(ServeError::NotFound)?;

    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|source| ServeError::Copy {
            path: path.to_string(),
            source,
        })?;
    Ok(buf)
}

fn content_type_for(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or_default();
    if ext.eq_ignore_ascii_case("gif") {
        "image/gif"
    } else if ext.eq_ignore_ascii_case("jpg") {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}
