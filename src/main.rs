use clap::Parser;
use std::sync::Arc;
use stripd::config::{Cli, Config};
use stripd::index::build_from_archive;
use stripd::query::QueryServer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::resolve(Cli::parse())?;
    info!("Starting stripd: indexing {:?}", config.archive);

    // 扫描在服务启动前一次性完成；失败（归档打不开 / 无可用漫画）由 anyhow 输出诊断后退出
    let archive = config.archive.clone();
    let index = tokio::task::spawn_blocking(move || build_from_archive(&archive)).await??;

    QueryServer::new(Arc::new(index)).run(config.listen_addr()).await
}
