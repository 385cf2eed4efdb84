use anyhow::{Context, Result};
use mailprobe::server::{run_front, run_worker};
use mailprobe::test_proxy;

use crate::args::{FrontArgs, ProxyArgs, WorkerArgs};

pub async fn serve_worker(args: WorkerArgs) -> Result<()> {
    let config = args.config()?;
    let bind = config.bind.clone();
    run_worker(config)
        .await
        .with_context(|| format!("worker on {bind}"))
}

pub async fn serve_front(args: FrontArgs) -> Result<()> {
    let config = args.config()?;
    let bind = config.bind.clone();
    run_front(config)
        .await
        .with_context(|| format!("front on {bind}"))
}

pub async fn run_test_proxy(args: ProxyArgs) -> Result<()> {
    let Some(proxy) = args.config()? else {
        anyhow::bail!("--proxy (or MAILPROBE_DEFAULT_PROXY) is required");
    };
    test_proxy(&proxy)
        .await
        .with_context(|| format!("proxy {} unusable", proxy.address()))?;
    println!("Proxy connection successful ({})", proxy.address());
    Ok(())
}
