//! hotmirror CLI: publish the latest hotwords, generate the endpoint manifest,
//! and fetch artifacts through the ordered mirror fallback.

use clap::{Args, Parser, Subcommand};
use hotmirror_core::config::{FetchConfig, PublishConfig};
use hotmirror_core::origin::{CI_REF_KEY, CI_REPO_KEY, REF_KEY, REPO_KEY};
use hotmirror_core::prelude::*;
use hotmirror_fetch::{prefer_priority, Fetcher, HttpTransport, ResponsePolicy};
use hotmirror_io::{generate_manifest, publish_latest, read_manifest, FsStore, Store};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

type CliResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "hotmirror")]
#[command(about = "Stable publishing and ordered mirror fallback for the hotwords list", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
struct OriginArgs {
    /// Origin repository as owner/repo (overrides HOTWORDS_PUBLISH_REPO)
    #[arg(long)]
    repo: Option<String>,

    /// Origin branch or ref (overrides HOTWORDS_PUBLISH_REF)
    #[arg(long = "ref")]
    git_ref: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the endpoint manifest for the configured origin
    Generate {
        #[command(flatten)]
        origin: OriginArgs,

        /// Output directory (overrides HOTMIRROR_OUTPUT_DIR)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Republish a merged hotwords file as the stable latest artifacts
    Publish {
        /// Merged hotwords file to publish
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Master list the snapshot was merged from (recorded for provenance)
        #[arg(long, default_value = "hotwords.txt")]
        source: String,

        #[command(flatten)]
        origin: OriginArgs,

        /// Output directory (overrides HOTMIRROR_OUTPUT_DIR)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// List the compiled-in mirror registry
    Mirrors {
        #[command(flatten)]
        origin: OriginArgs,
    },

    /// Download an artifact, trying each mirror in order
    Fetch {
        /// Endpoint manifest to read candidates from
        #[arg(long, conflicts_with_all = ["url"])]
        manifest: Option<PathBuf>,

        /// Explicit candidate URLs, tried in the order given
        #[arg(long)]
        url: Vec<String>,

        #[command(flatten)]
        origin: OriginArgs,

        /// Artifact name
        #[arg(short, long, default_value = "hotwords_latest.txt")]
        artifact: String,

        /// Write the body here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Try the candidate with this priority first
        #[arg(long)]
        prefer: Option<usize>,

        /// Per-attempt timeout in milliseconds (overrides HOTMIRROR_ATTEMPT_TIMEOUT_MS)
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Overall deadline in milliseconds (overrides HOTMIRROR_DEADLINE_MS)
        #[arg(long)]
        deadline_ms: Option<u64>,

        /// Minimum accepted body size (overrides HOTMIRROR_MIN_BODY_BYTES)
        #[arg(long)]
        min_body_bytes: Option<usize>,
    },
}

fn init_tracing() {
    let env = std::env::var("HOTMIRROR_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { origin, output_dir } => generate(&origin, output_dir),
        Commands::Publish {
            snapshot,
            source,
            origin,
            output_dir,
        } => publish(&snapshot, &source, &origin, output_dir),
        Commands::Mirrors { origin } => mirrors(&origin),
        Commands::Fetch {
            manifest,
            url,
            origin,
            artifact,
            out,
            prefer,
            timeout_ms,
            deadline_ms,
            min_body_bytes,
        } => {
            let mut config = FetchConfig::from_env();
            apply_fetch_overrides(&mut config, timeout_ms, deadline_ms, min_body_bytes);
            let source = if let Some(path) = manifest {
                CandidateSource::Manifest(path)
            } else if !url.is_empty() {
                CandidateSource::Urls(url)
            } else {
                CandidateSource::Origin(origin)
            };
            fetch(source, &artifact, out.as_deref(), prefer, &config)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Process environment with `--repo`/`--ref` layered on top.
fn origin_env(args: &OriginArgs) -> HashMap<String, String> {
    let mut env: HashMap<String, String> = std::env::vars().collect();
    overlay_origin(&mut env, args);
    env
}

fn overlay_origin(env: &mut HashMap<String, String>, args: &OriginArgs) {
    if let Some(repo) = &args.repo {
        env.insert(REPO_KEY.to_string(), repo.clone());
    }
    if let Some(git_ref) = &args.git_ref {
        env.insert(REF_KEY.to_string(), git_ref.clone());
    }
}

fn output_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| PathBuf::from(PublishConfig::from_env().output_dir))
}

fn apply_fetch_overrides(
    cfg: &mut FetchConfig,
    timeout_ms: Option<u64>,
    deadline_ms: Option<u64>,
    min_body_bytes: Option<usize>,
) {
    if let Some(ms) = timeout_ms {
        cfg.attempt_timeout_ms = ms;
    }
    if let Some(ms) = deadline_ms {
        cfg.deadline_ms = Some(ms);
    }
    if let Some(n) = min_body_bytes {
        cfg.min_body_bytes = n;
    }
}

fn report_skipped(skipped: &[TemplateError]) {
    for err in skipped {
        tracing::warn!(priority = err.priority(), error = %err, "mirror template skipped");
    }
}

fn generate(origin: &OriginArgs, output_dir_flag: Option<PathBuf>) -> CliResult<()> {
    let origin = OriginIdentity::resolve(&origin_env(origin))?;
    let dir = output_dir(output_dir_flag);
    let report = generate_manifest(&FsStore::new(), &origin, &dir, chrono::Utc::now())?;

    println!("✓ Endpoint manifest written");
    println!("  Path: {}", report.path.display());
    println!("  Origin: {}", origin);
    for (name, candidates) in &report.manifest.artifacts {
        println!("  {}: {} candidates", name, candidates.len());
    }
    report_skipped(&report.skipped);
    Ok(())
}

fn publish(
    snapshot: &Path,
    source: &str,
    origin: &OriginArgs,
    output_dir_flag: Option<PathBuf>,
) -> CliResult<()> {
    let origin = OriginIdentity::resolve(&origin_env(origin))?;
    let dir = output_dir(output_dir_flag);
    let report = publish_latest(
        &FsStore::new(),
        snapshot,
        source,
        &dir,
        &origin,
        chrono::Utc::now(),
    )?;

    println!("✓ Latest hotwords published");
    println!("  Latest list: {}", report.latest_text.display());
    println!("  Metadata: {}", report.latest_meta.display());
    println!("  Endpoints: {}", report.endpoints.path.display());
    println!(
        "  Terms: {} in {} categories",
        report.meta.total_terms, report.meta.non_empty_categories
    );
    println!("  SHA-256: {}", report.meta.sha256);
    report_skipped(&report.endpoints.skipped);
    Ok(())
}

fn mirrors(origin: &OriginArgs) -> CliResult<()> {
    println!("Mirror Registry");
    println!("===============");
    for template in list_templates() {
        let kind = if template.is_direct() { "direct" } else { "proxy" };
        println!(
            "  {}. {:<10} {:<7} {}",
            template.priority, template.name, kind, template.url_pattern
        );
    }

    let Some(origin) = configured_origin(&origin_env(origin))? else {
        return Ok(());
    };
    let materialized = materialize(&origin, list_templates(), ARTIFACTS);
    println!();
    println!("Candidates for {}", origin);
    for (name, candidates) in &materialized.artifacts {
        println!("  {}:", name);
        for c in candidates {
            println!("    {}. {}", c.mirror_priority, c.url);
        }
    }
    report_skipped(&materialized.skipped);
    Ok(())
}

/// `None` when no origin key is set at all; a partial or malformed origin is an error.
fn configured_origin(env: &HashMap<String, String>) -> CliResult<Option<OriginIdentity>> {
    let any_set = [REPO_KEY, REF_KEY, CI_REPO_KEY, CI_REF_KEY]
        .iter()
        .any(|key| env.get(*key).is_some_and(|v| !v.trim().is_empty()));
    if !any_set {
        return Ok(None);
    }
    Ok(Some(OriginIdentity::resolve(env)?))
}

enum CandidateSource {
    Manifest(PathBuf),
    Urls(Vec<String>),
    Origin(OriginArgs),
}

fn resolve_candidates(source: CandidateSource, artifact: &str) -> CliResult<Vec<CandidateUrl>> {
    let candidates = match source {
        CandidateSource::Manifest(path) => {
            let manifest = read_manifest(&FsStore::new(), &path)?;
            manifest
                .candidates(artifact)
                .map(<[CandidateUrl]>::to_vec)
                .ok_or_else(|| format!("manifest {} has no entry for '{}'", path.display(), artifact))?
        }
        CandidateSource::Urls(urls) => urls
            .into_iter()
            .enumerate()
            .map(|(i, url)| CandidateUrl::new(i, url))
            .collect(),
        CandidateSource::Origin(args) => {
            let origin = OriginIdentity::resolve(&origin_env(&args))?;
            let logical = LogicalArtifact::by_name(artifact)
                .ok_or_else(|| format!("unknown artifact '{}'", artifact))?;
            let materialized = materialize(&origin, list_templates(), &[logical]);
            materialized
                .candidates(artifact)
                .map(<[CandidateUrl]>::to_vec)
                .unwrap_or_default()
        }
    };
    Ok(candidates)
}

fn fetch(
    source: CandidateSource,
    artifact: &str,
    out: Option<&Path>,
    prefer: Option<usize>,
    config: &FetchConfig,
) -> CliResult<()> {
    let mut candidates = resolve_candidates(source, artifact)?;
    if let Some(priority) = prefer {
        candidates = prefer_priority(&candidates, priority);
    }

    let policy = ResponsePolicy::from_config(config).with_json(artifact.ends_with(".json"));
    let fetcher = Fetcher::from_config(HttpTransport::new()?, config).with_policy(policy);
    let fetched = fetcher.fetch(&candidates)?;

    match out {
        Some(path) => FsStore::new().write_atomic(path, &fetched.bytes)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&fetched.bytes)?;
            stdout.flush()?;
        }
    }

    eprintln!(
        "✓ {} bytes from mirror #{} ({})",
        fetched.bytes.len(),
        fetched.candidate.mirror_priority,
        fetched.candidate.url
    );
    if !fetched.failed.is_empty() {
        eprintln!("  {} mirror(s) failed first", fetched.failed.len());
    }
    Ok(())
}
