use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use mailprobe::config::{DEFAULT_BIND, split_list};
use mailprobe::{
    BatchOptions, FrontConfig, ProviderKeys, ProxyConfig, ServiceConfig, SmtpProbeOptions,
    SyntaxMode,
};

#[derive(Parser)]
#[command(name = "mailprobe", version, about = "Vérification de délivrabilité e-mail en flux")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// vérifie une liste localement (fichier ou stdin)
    Check(CheckArgs),
    /// sert le worker de vérification (POST /verify)
    Worker(WorkerArgs),
    /// sert le front de répartition vers les workers
    Front(FrontArgs),
    /// teste une connexion SOCKS5 vers smtp.gmail.com:587
    TestProxy(ProxyArgs),
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Human,
    Ndjson,
    Sse,
}

#[derive(Args)]
pub struct ProxyArgs {
    /// proxy SOCKS5 host:port
    #[arg(long, env = "MAILPROBE_DEFAULT_PROXY")]
    pub proxy: Option<String>,
    #[arg(long, env = "MAILPROBE_PROXY_USER")]
    pub proxy_user: Option<String>,
    #[arg(long, env = "MAILPROBE_PROXY_PASS", hide_env_values = true)]
    pub proxy_pass: Option<String>,
}

impl ProxyArgs {
    pub fn config(&self) -> Result<Option<ProxyConfig>> {
        match self.proxy.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(addr) => ProxyConfig::parse(
                addr,
                self.proxy_user.as_deref(),
                self.proxy_pass.as_deref(),
            )
            .map(Some)
            .with_context(|| format!("bad --proxy '{addr}'")),
        }
    }
}

/// Pipeline knobs shared by `check` and `worker`.
#[derive(Args)]
pub struct PipelineArgs {
    /// mode: permissive|strict
    #[arg(long, env = "MAILPROBE_SYNTAX", default_value = "permissive")]
    pub syntax: SyntaxMode,

    /// domaines jetables supplémentaires (séparés par des virgules)
    #[arg(long, env = "MAILPROBE_DISPOSABLE_EXTRA", default_value = "")]
    pub disposable_extra: String,

    /// nom utilisé pour EHLO/HELO
    #[arg(long, env = "MAILPROBE_HELO", default_value = "localhost")]
    pub helo: String,

    /// enveloppe MAIL FROM
    #[arg(long = "from", env = "MAILPROBE_MAIL_FROM", default_value = "test@example.com")]
    pub mail_from: String,

    /// port SMTP des MX
    #[arg(long, default_value_t = 25)]
    pub smtp_port: u16,

    /// timeout par hôte MX (s)
    #[arg(long, default_value_t = 10)]
    pub smtp_timeout: u64,

    /// nombre maximum d'MX interrogés
    #[arg(long = "max-mx")]
    pub max_mx: Option<usize>,

    #[arg(long, env = "MAILPROBE_CONCURRENCY", default_value_t = 4)]
    pub concurrency: usize,

    /// délai entre deux événements (ms)
    #[arg(long, env = "MAILPROBE_PACING_MS", default_value_t = 250)]
    pub pacing_ms: u64,

    /// borne par adresse, toutes étapes confondues (s)
    #[arg(long, default_value_t = 60)]
    pub candidate_timeout: u64,

    #[arg(long, env = "MAILPROBE_HUNTER_KEY", hide_env_values = true)]
    pub hunter_key: Option<String>,

    #[arg(long, env = "MAILPROBE_ZEROBOUNCE_KEY", hide_env_values = true)]
    pub zerobounce_key: Option<String>,

    #[arg(long, env = "MAILPROBE_ABSTRACT_KEY", hide_env_values = true)]
    pub abstract_key: Option<String>,

    #[command(flatten)]
    pub proxy: ProxyArgs,
}

impl PipelineArgs {
    pub fn service_config(&self, bind: String, filter_disposable: bool) -> Result<ServiceConfig> {
        Ok(ServiceConfig {
            bind,
            syntax: self.syntax,
            filter_disposable,
            disposable_extra: split_list(&self.disposable_extra),
            smtp: SmtpProbeOptions {
                port: self.smtp_port,
                helo_domain: self.helo.clone(),
                mail_from: self.mail_from.clone(),
                timeout: Duration::from_secs(self.smtp_timeout),
                max_hosts: self.max_mx,
            },
            batch: BatchOptions {
                concurrency: self.concurrency,
                pacing: Duration::from_millis(self.pacing_ms),
                candidate_timeout: Duration::from_secs(self.candidate_timeout),
            },
            providers: ProviderKeys {
                hunter: self.hunter_key.clone(),
                zerobounce: self.zerobounce_key.clone(),
                abstract_api: self.abstract_key.clone(),
            },
            default_proxy: self.proxy.config()?,
        })
    }
}

#[derive(Args)]
pub struct CheckArgs {
    /// fichier d'adresses (une par ligne); stdin si absent
    pub input: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "human")]
    pub format: Format,

    /// désactive le filtre de domaines jetables
    #[arg(long)]
    pub no_disposable: bool,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Args)]
pub struct WorkerArgs {
    #[arg(long, env = "MAILPROBE_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// applique aussi le filtre jetable côté worker
    #[arg(long)]
    pub filter_disposable: bool,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

impl WorkerArgs {
    pub fn config(&self) -> Result<ServiceConfig> {
        self.pipeline
            .service_config(self.bind.clone(), self.filter_disposable)
    }
}

#[derive(Args)]
pub struct FrontArgs {
    #[arg(long, env = "MAILPROBE_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// URLs de base des workers, séparées par des virgules
    #[arg(long, env = "MAILPROBE_WORKERS")]
    pub workers: String,

    /// mode: permissive|strict
    #[arg(long, env = "MAILPROBE_SYNTAX", default_value = "permissive")]
    pub syntax: SyntaxMode,

    #[arg(long, env = "MAILPROBE_DISPOSABLE_EXTRA", default_value = "")]
    pub disposable_extra: String,

    /// attente max des en-têtes de réponse d'un worker (secondes)
    #[arg(long, env = "MAILPROBE_WORKER_TIMEOUT", default_value_t = 10)]
    pub worker_timeout: u64,

    #[command(flatten)]
    pub proxy: ProxyArgs,
}

impl FrontArgs {
    pub fn config(&self) -> Result<FrontConfig> {
        let workers = split_list(&self.workers);
        anyhow::ensure!(!workers.is_empty(), "--workers is empty");
        Ok(FrontConfig {
            bind: self.bind.clone(),
            workers,
            syntax: self.syntax,
            disposable_extra: split_list(&self.disposable_extra),
            worker_timeout: Duration::from_secs(self.worker_timeout),
            default_proxy: self.proxy.config()?,
        })
    }
}
