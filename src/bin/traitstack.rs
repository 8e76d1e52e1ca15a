use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use traitstack::{
    AssetSource, CollectionAssembler, CollectionConfig, DirAssetSource, DirPublisher,
    GenerationStatus, GeneratorOpts, JobState, PngCompositor, Publisher, StatusSink,
};

#[derive(Parser, Debug)]
#[command(name = "traitstack", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a collection config and print per-variant rarity.
    Inspect(InspectArgs),
    /// Generate a collection and publish it.
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Collection config JSON.
    #[arg(long)]
    config: PathBuf,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct AssetArgs {
    /// Resolve asset ids as relative paths under this directory.
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Fetch asset ids from this HTTP gateway prefix (requires the `http` feature).
    #[arg(long)]
    gateway_assets: Option<String>,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct StoreArgs {
    /// Publish into a local content-addressed directory.
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Publish to the IPFS pinning service, JWT from `PINATA_JWT` (requires the `http` feature).
    #[arg(long)]
    pinata: bool,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Collection config JSON.
    #[arg(long)]
    config: PathBuf,

    #[command(flatten)]
    assets: AssetArgs,

    #[command(flatten)]
    store: StoreArgs,

    /// Also write the final archive to this path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// RNG seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Rejected draws tolerated per edition.
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Gateway prefix used in final metadata image URLs.
    #[arg(long)]
    gateway: Option<String>,

    /// Composite editions in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for asset fetches and parallel compositing.
    #[arg(long)]
    threads: Option<usize>,

    /// Editions per parallel compositing chunk.
    #[arg(long)]
    chunk_size: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Generate(args) => cmd_generate(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn read_config(path: &Path) -> anyhow::Result<CollectionConfig> {
    let config = CollectionConfig::from_path(path)
        .with_context(|| format!("load collection config '{}'", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let config = read_config(&args.config)?;
    println!(
        "{} ({} editions, {} layers)",
        config.name,
        config.edition_count,
        config.layers.len()
    );
    for layer in config.layer_stack() {
        println!("  [{}] {}", layer.z_order, layer.name);
        for (idx, variant) in layer.variants.iter().enumerate() {
            let pct = layer.rarity_percent(idx).unwrap_or(0.0);
            println!("    {:<24} {:>7.3}%  {}", variant.name, pct, variant.asset_id);
        }
    }
    let space = config.combination_space();
    println!("combination space: {space}");
    if u64::from(config.edition_count) > space {
        println!("warning: more editions requested than distinct combinations exist");
    }
    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let config = read_config(&args.config)?;

    let mut opts = GeneratorOpts::from_env()?;
    if let Some(seed) = args.seed {
        opts.seed = Some(seed);
    }
    if let Some(n) = args.max_attempts {
        opts.max_attempts = n;
    }
    if let Some(url) = args.gateway {
        opts.gateway_url = url;
    }
    if args.parallel {
        opts.parallel = true;
    }
    if args.threads.is_some() {
        opts.threads = args.threads;
    }
    if let Some(n) = args.chunk_size {
        opts.chunk_size = n;
    }

    let source = make_source(&args.assets)?;
    let publisher = make_publisher(&args.store)?;
    let compositor = PngCompositor::new();

    let assembler =
        CollectionAssembler::new(opts, &*source, &compositor, &*publisher)?;
    let mut status = LogStatus::default();
    let output = assembler.run(&config, &mut status)?;

    if let Some(out) = &args.out {
        if let Some(parent) = out.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(out, &output.archive)
            .with_context(|| format!("write archive '{}'", out.display()))?;
        eprintln!("wrote {}", out.display());
    }

    println!("{}", output.final_address);
    Ok(())
}

fn make_source(args: &AssetArgs) -> anyhow::Result<Box<dyn AssetSource>> {
    if let Some(dir) = &args.assets_dir {
        return Ok(Box::new(DirAssetSource::new(dir)));
    }
    let Some(gateway) = &args.gateway_assets else {
        anyhow::bail!("one of --assets-dir or --gateway-assets is required");
    };
    gateway_source(gateway)
}

#[cfg(feature = "http")]
fn gateway_source(gateway: &str) -> anyhow::Result<Box<dyn AssetSource>> {
    Ok(Box::new(traitstack::GatewayAssetSource::new(
        gateway,
        traitstack::GatewayAssetSource::DEFAULT_TIMEOUT,
    )?))
}

#[cfg(not(feature = "http"))]
fn gateway_source(_gateway: &str) -> anyhow::Result<Box<dyn AssetSource>> {
    anyhow::bail!("--gateway-assets requires traitstack built with the `http` feature")
}

fn make_publisher(args: &StoreArgs) -> anyhow::Result<Box<dyn Publisher>> {
    if let Some(dir) = &args.store_dir {
        return Ok(Box::new(DirPublisher::new(dir)));
    }
    pinata_publisher()
}

#[cfg(feature = "http")]
fn pinata_publisher() -> anyhow::Result<Box<dyn Publisher>> {
    Ok(Box::new(traitstack::PinataPublisher::from_env()?))
}

#[cfg(not(feature = "http"))]
fn pinata_publisher() -> anyhow::Result<Box<dyn Publisher>> {
    anyhow::bail!("--pinata requires traitstack built with the `http` feature")
}

#[derive(Default)]
struct LogStatus {
    last: Option<JobState>,
    last_percent: u8,
}

impl StatusSink for LogStatus {
    fn update(&mut self, status: &GenerationStatus) {
        let changed = self.last != Some(status.state);
        let step = status.progress_percent / 10 != self.last_percent / 10;
        if changed || (status.state == JobState::Generating && step) {
            tracing::info!(
                state = ?status.state,
                progress = status.progress_percent,
                current = status.current_image,
                total = status.total_images,
                "status"
            );
        }
        self.last = Some(status.state);
        self.last_percent = status.progress_percent;
    }
}
