use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use depfresh::config::{CommandSpec, Settings};
use depfresh::git::{GitCli, VcsClient};
use depfresh::hooks;
use depfresh::parser::{ManifestFormat, ManifestParser as _, detect_format, parser_for};
use depfresh::report::{Report, ReportFormat};
use depfresh::resolve::BatchAnalyzer;

#[derive(Parser)]
#[command(name = "depfresh")]
#[command(version, about = "Checks pinned dependency manifests against upstream git state")]
struct Cli {
    /// Path to the dependency manifest
    #[arg(long, value_name = "FILE")]
    manifest: PathBuf,

    /// Root directory for package checkouts (created if absent)
    #[arg(long, value_name = "DIR")]
    package_root: PathBuf,

    /// Manifest format: gpm or gopkg (detected from the file name when omitted)
    #[arg(long)]
    format: Option<String>,

    /// Turn on debug logging
    #[arg(long)]
    debug: bool,

    /// Rewrite the manifest in place with updated pins
    #[arg(long)]
    write: bool,

    /// Report format: text or json
    #[arg(long, default_value = "text")]
    report: String,

    /// Dependency-install command to run after resolution
    #[arg(long)]
    install_command: Option<String>,

    /// Working directory for the install command
    #[arg(long)]
    install_dir: Option<PathBuf>,

    /// Arguments for the install command
    #[arg(long)]
    install_args: Option<String>,

    /// Build command to run after resolution
    #[arg(long)]
    build_command: Option<String>,

    /// Working directory for the build command
    #[arg(long)]
    build_dir: Option<PathBuf>,

    /// Arguments for the build command
    #[arg(long)]
    build_args: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    let settings = settings_from(cli)?;
    run(&settings)
}

/// The debug flag becomes the subscriber's level filter; RUST_LOG overrides.
fn init_tracing(debug: bool) {
    let default = if debug { "depfresh=debug" } else { "depfresh=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn settings_from(cli: Cli) -> anyhow::Result<Settings> {
    let format = cli
        .format
        .map(|s| {
            s.parse::<ManifestFormat>()
                .map_err(|()| anyhow!("unknown manifest format: {s}"))
        })
        .transpose()?;
    let report = cli
        .report
        .parse::<ReportFormat>()
        .map_err(|()| anyhow!("unknown report format: {}", cli.report))?;
    let install = cli.install_command.map(|program| CommandSpec {
        program,
        dir: cli.install_dir,
        args: cli.install_args,
    });
    let build = cli.build_command.map(|program| CommandSpec {
        program,
        dir: cli.build_dir,
        args: cli.build_args,
    });
    Ok(Settings {
        manifest_path: cli.manifest,
        package_root: cli.package_root,
        format,
        write_back: cli.write,
        report,
        install,
        build,
    })
}

fn run(settings: &Settings) -> anyhow::Result<()> {
    let client = GitCli::new();
    let manifest_dir = settings
        .manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let root = client
        .repo_root(manifest_dir)
        .context("manifest is not inside a git repository")?;
    debug!("got git root {}", root.display());

    let format = settings
        .format
        .or_else(|| detect_format(&settings.manifest_path))
        .ok_or_else(|| anyhow!("cannot detect manifest format, pass --format"))?;
    let parser = parser_for(format, &root, &settings.manifest_path);

    let content = fs::read_to_string(parser.manifest_path()).with_context(|| {
        format!("failed to read manifest {}", parser.manifest_path().display())
    })?;
    let mut manifest = parser.parse(&content);
    debug!("got {} entries", manifest.entries.len());

    BatchAnalyzer::new(&client, &settings.package_root).analyze(&mut manifest.entries)?;

    let report = Report::build(&manifest.entries);
    print!("{}", report.render(settings.report)?);

    if settings.write_back {
        let outcome = parser.rewrite(&manifest);
        if outcome.changed {
            fs::write(parser.manifest_path(), outcome.text).with_context(|| {
                format!("failed to update manifest {}", parser.manifest_path().display())
            })?;
            info!("manifest updated");
        } else {
            info!("manifest already up to date");
        }
    }

    if settings.install.is_some() || settings.build.is_some() {
        hooks::run_post_commands(settings.install.as_ref(), settings.build.as_ref());
    }
    Ok(())
}
