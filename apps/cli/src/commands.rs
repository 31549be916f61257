//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use protonav_core::pipeline::{
    NormalizeStatus, ProgressReporter, SyncReport, sync_navigation,
};
use protonav_core::toc::parse_toc_file;
use protonav_markdown::normalize_file;
use protonav_shared::{
    AppConfig, Category, CategoryNav, SyncConfig, init_config, load_config, load_config_from,
};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// protonav: keep a docs site's protobuf navigation in sync with generated markdown.
#[derive(Parser)]
#[command(
    name = "protonav",
    version,
    about = "Regenerate site navigation from protoc-gen-doc markdown pages.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./protonav.toml when present).
    #[arg(long, global = true, env = "PROTONAV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Normalize both category pages and rewrite the site navigation.
    Sync {
        /// Markdown page for the `node` category.
        #[arg(long)]
        node_doc: Option<PathBuf>,

        /// Markdown page for the `provider` category.
        #[arg(long)]
        provider_doc: Option<PathBuf>,

        /// Site configuration file to update.
        #[arg(long)]
        site_config: Option<PathBuf>,

        /// Key of the `nav` entry to regenerate.
        #[arg(long)]
        nav_section: Option<String>,
    },

    /// Fix heading artifacts in markdown files in place.
    Normalize {
        /// Files to normalize.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the navigation tree parsed from one markdown page.
    Toc {
        /// Markdown page to parse.
        file: PathBuf,

        /// Category the page belongs to: node or provider.
        #[arg(short, long)]
        category: Category,

        /// Print JSON instead of YAML.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write protonav.toml with defaults into the current directory.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "protonav=info",
        1 => "protonav=debug",
        _ => "protonav=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Sync {
            node_doc,
            provider_doc,
            site_config,
            nav_section,
        } => {
            let overrides = SyncOverrides {
                node_doc,
                provider_doc,
                site_config,
                nav_section,
            };
            cmd_sync(config_path, overrides)
        }
        Command::Normalize { files } => cmd_normalize(&files),
        Command::Toc {
            file,
            category,
            json,
        } => cmd_toc(config_path, &file, category, json),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load the config file named by `--config`, or the default one.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

/// `sync` flags that override config file values.
struct SyncOverrides {
    node_doc: Option<PathBuf>,
    provider_doc: Option<PathBuf>,
    site_config: Option<PathBuf>,
    nav_section: Option<String>,
}

impl SyncOverrides {
    fn apply(self, config: &mut SyncConfig) {
        if let Some(p) = self.node_doc {
            config.node_doc = p;
        }
        if let Some(p) = self.provider_doc {
            config.provider_doc = p;
        }
        if let Some(p) = self.site_config {
            config.site_config = p;
        }
        if let Some(s) = self.nav_section {
            config.nav_section = s;
        }
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_sync(config_path: Option<&Path>, overrides: SyncOverrides) -> Result<()> {
    let app = resolve_config(config_path)?;
    let mut config = SyncConfig::from(&app);
    overrides.apply(&mut config);

    info!(
        node = %config.node_doc.display(),
        provider = %config.provider_doc.display(),
        site = %config.site_config.display(),
        "syncing navigation"
    );

    let reporter = CliProgress::new();
    let report = sync_navigation(&config, &reporter)?;

    println!();
    println!("  Navigation updated: {}", config.site_config.display());
    for summary in &report.categories {
        let normalize = match &summary.normalize {
            NormalizeStatus::Updated { corrections } => format!("{corrections} corrections"),
            NormalizeStatus::Unchanged => "unchanged".to_string(),
            NormalizeStatus::Failed { error } => format!("skipped ({error})"),
        };
        println!(
            "  {:<9} {} sections, {} links, markdown {normalize}",
            summary.category.display_name(),
            summary.sections,
            summary.links,
        );
    }
    println!("  Time:     {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_normalize(files: &[PathBuf]) -> Result<()> {
    let mut failed = 0usize;

    for path in files {
        match normalize_file(path) {
            Ok(report) if report.written() => {
                println!(
                    "{}: {} corrections",
                    path.display(),
                    report.corrections.len()
                );
            }
            Ok(_) => println!("{}: unchanged", path.display()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "normalization failed");
                println!("{}: failed ({e})", path.display());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(eyre!("{failed} of {} files could not be normalized", files.len()));
    }
    Ok(())
}

fn cmd_toc(config_path: Option<&Path>, file: &Path, category: Category, json: bool) -> Result<()> {
    let app = resolve_config(config_path)?;
    let sections = parse_toc_file(file, category, &app.sections)?;
    let tree = CategoryNav { category, sections };

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{}", serde_yaml::to_string(&tree)?);
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let cwd = std::env::current_dir()?;
    let path = init_config(&cwd)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _report: &SyncReport) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
