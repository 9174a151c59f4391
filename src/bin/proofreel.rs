use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "proofreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render proof scenes and write their manifest (requires `manim` unless `--text-only`).
    Render(RenderArgs),
    /// Bundle definition JSON files into a manifest.
    Definitions(DefinitionsArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Folder with the `*.py` scene scripts and their `.proof.json` files.
    #[arg(long, default_value = "data/proofs")]
    src: PathBuf,

    /// Folder rendered videos are written to.
    #[arg(long, default_value = "public/proofs")]
    out: PathBuf,

    /// Manifest path (defaults to `<out>/manifest.json`).
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Render quality.
    #[arg(long, value_enum, default_value_t = proofreel::Quality::Medium)]
    quality: proofreel::Quality,

    /// Only refresh proof text in an existing manifest; do not render.
    #[arg(long)]
    text_only: bool,

    /// Base for the source paths recorded in the manifest (defaults to the current dir).
    #[arg(long)]
    project_root: Option<PathBuf>,

    /// Python interpreter with `manim` installed.
    #[arg(long, default_value = "python3")]
    python: PathBuf,

    /// Per-scene render timeout in seconds.
    #[arg(long, default_value_t = 1800)]
    timeout_secs: u64,
}

#[derive(Parser, Debug)]
struct DefinitionsArgs {
    /// Folder with definition `*.json` files.
    #[arg(long, default_value = "data/definitions")]
    src: PathBuf,

    /// Output folder.
    #[arg(long, default_value = "public/definitions")]
    out: PathBuf,

    /// Manifest path (defaults to `<out>/manifest.json`).
    #[arg(long)]
    manifest: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Definitions(args) => cmd_definitions(args),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "failed");
            ExitCode::FAILURE
        }
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<ExitCode> {
    let mut opts = proofreel::PipelineOpts::new(args.src, args.out);
    if let Some(root) = args.project_root {
        opts = opts.with_project_root(root);
    }
    opts.manifest_path = args.manifest;
    opts.quality = args.quality;

    if args.text_only {
        return match proofreel::refresh_text_only(&opts)? {
            proofreel::RefreshOutcome::Skipped => Ok(ExitCode::SUCCESS),
            proofreel::RefreshOutcome::Refreshed {
                items,
                missing_sources,
            } => {
                tracing::info!(items, missing_sources, "refreshed proof text");
                Ok(ExitCode::SUCCESS)
            }
        };
    }

    let mut manim_opts = proofreel::ManimOpts::new(args.python);
    manim_opts.timeout = Duration::from_secs(args.timeout_secs);
    let mut renderer = proofreel::ManimRenderer::new(manim_opts);

    let report = proofreel::run_pipeline(&opts, &mut renderer)?;
    for failure in &report.failures {
        eprintln!(
            "failed: {} {}: {}",
            failure.source.display(),
            failure.scene.as_deref().unwrap_or("<discovery>"),
            failure.message
        );
    }
    eprintln!("wrote {}", report.manifest_path.display());
    Ok(ExitCode::from(report.exit_code() as u8))
}

fn cmd_definitions(args: DefinitionsArgs) -> anyhow::Result<ExitCode> {
    let mut opts = proofreel::DefinitionsOpts::new(args.src, args.out);
    opts.manifest_path = args.manifest;
    let manifest = proofreel::build_definitions(&opts)?;
    eprintln!(
        "wrote {} definitions to {}",
        manifest.items.len(),
        opts.manifest_path().display()
    );
    Ok(ExitCode::SUCCESS)
}
