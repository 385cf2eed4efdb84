use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::StreamExt;
use mailprobe::transport::connector_for;
use mailprobe::{read_candidates, verdict_stream};

use crate::args::CheckArgs;
use crate::output::{Summary, write_verdict};

/// Runs the pipeline locally and prints verdicts as they arrive.
pub async fn run_check(args: CheckArgs) -> Result<Summary> {
    let body = match &args.input {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("read {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buf).context("read stdin")?;
            buf
        }
    };
    let candidates = read_candidates(&body).context("parse address list")?;

    let config = args
        .pipeline
        .service_config(String::new(), !args.no_disposable)?;
    let client = reqwest::Client::builder()
        .user_agent(concat!("mailprobe/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("build HTTP client")?;
    let pipeline = Arc::new(config.pipeline(client));
    tracing::debug!(stages = ?pipeline.stage_names(), "pipeline ready");
    let connector = connector_for(config.default_proxy.as_ref());

    let mut verdicts = verdict_stream(pipeline, candidates, connector, config.batch);
    let mut summary = Summary::default();
    let mut stdout = std::io::stdout().lock();
    while let Some(verdict) = verdicts.next().await {
        summary.record(&verdict);
        write_verdict(&mut stdout, args.format, &verdict)?;
    }
    Ok(summary)
}
