//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use biocatalog_core::{
    CategoryStats, IngestOptions, IngestReport, ProgressReporter, VerifyReport, ingest, verify,
};
use biocatalog_rules::RuleSet;
use biocatalog_shared::{
    AppConfig, SourceKind, config_file_path, init_config, load_config, load_config_from,
};
use biocatalog_sources::{RowSource, RowWindow, SourceOptions, open_source};
use biocatalog_storage::CatalogStore;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// biocatalog: curate bioinformatics resource listings into one catalog.
#[derive(Parser)]
#[command(
    name = "biocatalog",
    version,
    about = "Merge yearly database and web-resource listings into a categorized, glossed JSON catalog.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.biocatalog/biocatalog.toml).
    #[arg(long, env = "BIOCATALOG_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
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

/// Where rows come from: a registered source name or a file path.
#[derive(Args, Debug, Clone)]
pub(crate) struct SourceArgs {
    /// Registered source name or path to a .xlsx/.xls/.ods/.csv/.tsv file.
    pub source: String,

    /// Release kind: yearly-database, supplement, or web-resource.
    #[arg(long)]
    pub kind: Option<SourceKind>,

    /// Worksheet name (first sheet when unset).
    #[arg(long)]
    pub sheet: Option<String>,

    /// 1-based inclusive data rows, e.g. 92-187, 73, or 92-.
    #[arg(long)]
    pub rows: Option<RowWindow>,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Ingest one source into the catalog.
    Ingest {
        #[command(flatten)]
        source: SourceArgs,

        /// Catalog file (defaults to defaults.catalog_path).
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Rule table (defaults to defaults.rules_path, else the built-in table).
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Process everything but do not write the catalog.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show category counts for the catalog.
    Stats {
        /// Catalog file (defaults to defaults.catalog_path).
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Rule table used for category labels.
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Compare a source's names against the catalog.
    Verify {
        #[command(flatten)]
        source: SourceArgs,

        /// Catalog file (defaults to defaults.catalog_path).
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Also list catalog entries with id >= N that the source lacks.
        #[arg(long)]
        since_id: Option<u64>,
    },

    /// Rule table inspection.
    Rules {
        /// Rules subcommand.
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Rules subcommands.
#[derive(Subcommand)]
pub(crate) enum RulesAction {
    /// Print the effective category and translation tables.
    Show {
        /// Rule table (defaults to defaults.rules_path, else the built-in table).
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// Validate a rule file.
    Check {
        /// Path to the TOML rule file.
        path: PathBuf,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
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
        0 => "biocatalog=info",
        1 => "biocatalog=debug",
        _ => "biocatalog=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
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
        Command::Ingest {
            source,
            catalog,
            rules,
            dry_run,
        } => {
            let config = resolve_config(config_path)?;
            cmd_ingest(&config, &source, catalog.as_deref(), rules.as_deref(), dry_run)
        }
        Command::Stats { catalog, rules } => {
            let config = resolve_config(config_path)?;
            cmd_stats(&config, catalog.as_deref(), rules.as_deref())
        }
        Command::Verify {
            source,
            catalog,
            since_id,
        } => {
            let config = resolve_config(config_path)?;
            cmd_verify(&config, &source, catalog.as_deref(), since_id)
        }
        Command::Rules { action } => match action {
            RulesAction::Show { rules } => {
                let config = resolve_config(config_path)?;
                cmd_rules_show(&config, rules.as_deref())
            }
            RulesAction::Check { path } => cmd_rules_check(&path),
        },
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

// ---------------------------------------------------------------------------
// Resolution helpers (CLI flags > config file > defaults)
// ---------------------------------------------------------------------------

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

fn resolve_catalog(config: &AppConfig, flag: Option<&Path>) -> CatalogStore {
    match flag {
        Some(p) => CatalogStore::new(p),
        None => CatalogStore::new(&config.defaults.catalog_path),
    }
}

fn resolve_rules(config: &AppConfig, flag: Option<&Path>) -> Result<RuleSet> {
    let configured = config.defaults.rules_path.as_deref().map(Path::new);
    Ok(RuleSet::load_or_embedded(flag.or(configured))?)
}

/// Open the source named on the command line, merging a registered
/// `[[sources]]` entry with any overriding flags.
fn resolve_source(config: &AppConfig, args: &SourceArgs) -> Result<Box<dyn RowSource>> {
    let mut options = SourceOptions {
        columns: config.columns.clone(),
        sheet: args.sheet.clone(),
        window: args.rows,
    };

    let (path, kind) = match config.find_source(&args.source) {
        Some(entry) => {
            if options.sheet.is_none() {
                options.sheet = entry.sheet.clone();
            }
            if options.window.is_none() {
                options.window = entry
                    .rows
                    .as_deref()
                    .map(|r| r.parse::<RowWindow>())
                    .transpose()
                    .map_err(|e| eyre!("source '{}': {e}", entry.name))?;
            }
            (PathBuf::from(&entry.path), args.kind.unwrap_or(entry.kind))
        }
        None => {
            let path = PathBuf::from(&args.source);
            if !path.exists() {
                return Err(eyre!(
                    "'{}' is neither a registered source nor an existing file",
                    args.source
                ));
            }
            (path, args.kind.unwrap_or_default())
        }
    };

    Ok(open_source(&path, kind, options)?)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_ingest(
    config: &AppConfig,
    args: &SourceArgs,
    catalog: Option<&Path>,
    rules: Option<&Path>,
    dry_run: bool,
) -> Result<()> {
    let store = resolve_catalog(config, catalog);
    let rules = resolve_rules(config, rules)?;
    let source = resolve_source(config, args)?;

    info!(
        source = %source.label(),
        kind = %source.kind(),
        catalog = %store.path().display(),
        dry_run,
        "ingesting source"
    );

    let reporter = CliProgress::new();
    let report = ingest(&store, &*source, &rules, IngestOptions { dry_run }, &reporter)?;

    print_ingest_report(&report, store.path());
    Ok(())
}

fn cmd_stats(config: &AppConfig, catalog: Option<&Path>, rules: Option<&Path>) -> Result<()> {
    let store = resolve_catalog(config, catalog);
    let rules = resolve_rules(config, rules)?;
    let catalog = store.load()?;

    println!();
    println!("  Catalog: {} ({} entries)", store.path().display(), catalog.len());
    println!();
    print_stats(&CategoryStats::collect(catalog.entries(), &rules));
    Ok(())
}

fn cmd_verify(
    config: &AppConfig,
    args: &SourceArgs,
    catalog: Option<&Path>,
    since_id: Option<u64>,
) -> Result<()> {
    let store = resolve_catalog(config, catalog);
    let catalog = store.load()?;
    let source = resolve_source(config, args)?;
    let rows = source.read_rows()?;

    let report = verify(&catalog, &rows, since_id);
    print_verify_report(&report, &source.label(), since_id);
    Ok(())
}

fn cmd_rules_show(config: &AppConfig, rules: Option<&Path>) -> Result<()> {
    let rules = resolve_rules(config, rules)?;

    println!("Categories (priority order):");
    for rule in rules.categorizer().rules() {
        println!("  {:<13} {}", rule.id, rule.label);
        println!("                {}", rule.keywords.join(", "));
    }

    println!();
    println!("Translations ({}):", rules.translations().len());
    for t in rules.translations() {
        println!("  {} → {}", t.phrase, t.gloss);
    }
    Ok(())
}

fn cmd_rules_check(path: &Path) -> Result<()> {
    let rules = RuleSet::load(path)?;
    println!(
        "{}: ok ({} categories, {} phrases)",
        path.display(),
        rules.categorizer().rules().len(),
        rules.translator().len()
    );
    Ok(())
}

fn cmd_config_init(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(p) => {
            if p.exists() {
                return Err(eyre!("config file already exists at {}", p.display()));
            }
            if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(p, toml::to_string_pretty(&AppConfig::default())?)?;
            p.to_path_buf()
        }
        None => {
            let default_path = config_file_path()?;
            if default_path.exists() {
                return Err(eyre!("config file already exists at {}", default_path.display()));
            }
            init_config()?
        }
    };
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_ingest_report(report: &IngestReport, catalog_path: &Path) {
    let summary = &report.summary;

    println!();
    if report.dry_run {
        println!("  Dry run complete, catalog not written.");
    } else {
        println!("  Ingestion complete.");
    }
    println!("  Source:   {} ({})", report.source, report.kind);
    println!("  Started:  {}", report.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Rows:     {}", report.rows_read);
    println!("  Added:    {}", summary.added.len());
    println!("  Skipped:  {}", summary.skipped.len());
    println!("  Blank:    {}", summary.blank_rows);
    if !report.missing_columns.is_empty() {
        println!("  Missing columns: {}", report.missing_columns.join(", "));
    }
    match &report.saved {
        Some(saved) => println!(
            "  Catalog:  {} entries → {} (sha256 {})",
            saved.entries,
            saved.path.display(),
            &saved.sha256[..12]
        ),
        None => println!(
            "  Catalog:  {} entries, {} unchanged",
            report.catalog_entries,
            catalog_path.display()
        ),
    }
    println!("  Time:     {:.1}s", report.elapsed.as_secs_f64());

    if !summary.added.is_empty() {
        println!();
        println!("  New entries:");
        for added in &summary.added {
            println!("    #{:<5} {} [{}]", added.id, added.name, added.category);
        }
    }

    if !summary.skipped.is_empty() {
        println!();
        println!("  Already cataloged:");
        for skipped in &summary.skipped {
            println!(
                "    row {:<5} {} (id {})",
                skipped.row, skipped.name, skipped.existing_id
            );
        }
    }

    println!();
    print_stats(&report.stats);
}

fn print_stats(stats: &CategoryStats) {
    println!("  {:<14} {:>9} {:>5} {:>6}", "Category", "Databases", "Web", "Total");
    for count in &stats.categories {
        println!(
            "  {:<14} {:>9} {:>5} {:>6}  {}",
            count.category.as_str(),
            count.databases,
            count.web,
            count.total(),
            count.label
        );
    }
    println!(
        "  {:<14} {:>9} {:>5} {:>6}",
        "total",
        stats.total_databases(),
        stats.total_web(),
        stats.total()
    );
    println!();
}

fn print_verify_report(report: &VerifyReport, source: &str, since_id: Option<u64>) {
    println!();
    println!("  Source:   {source}");
    println!("  Compared: {}", report.compared);
    println!("  Matched:  {}", report.matched);

    if report.missing_from_catalog.is_empty() {
        println!("  Every source row is cataloged.");
    } else {
        println!();
        println!("  Not in catalog ({}):", report.missing_from_catalog.len());
        for row in &report.missing_from_catalog {
            println!("    row {:<5} {}", row.row, row.name);
        }
    }

    if let Some(since) = since_id {
        println!();
        if report.missing_from_source.is_empty() {
            println!("  Every entry with id >= {since} appears in the source.");
        } else {
            println!(
                "  Entries with id >= {since} not in source ({}):",
                report.missing_from_source.len()
            );
            for entry in &report.missing_from_source {
                println!("    #{:<5} {}", entry.id, entry.name);
            }
        }
    }
    println!();
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

    fn row_processed(&self, name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Merging [{current}/{total}] {name}"));
    }

    fn done(&self, _report: &IngestReport) {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_ingest_flags() {
        let cli = Cli::try_parse_from([
            "biocatalog",
            "ingest",
            "nar2024.xlsx",
            "--kind",
            "supplement",
            "--rows",
            "92-187",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Command::Ingest { source, dry_run, .. } => {
                assert_eq!(source.source, "nar2024.xlsx");
                assert_eq!(source.kind, Some(SourceKind::Supplement));
                assert_eq!(source.rows, Some("92-187".parse().unwrap()));
                assert!(dry_run);
            }
            _ => panic!("expected ingest"),
        }
    }

    #[test]
    fn rejects_bad_row_window() {
        assert!(Cli::try_parse_from(["biocatalog", "ingest", "x.csv", "--rows", "9-3"]).is_err());
    }

    #[test]
    fn registered_source_supplies_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[[sources]]
name = "nar2024-web"
path = "nar2024web.tsv"
kind = "web-resource"
rows = "1-74"
"#,
        )
        .unwrap();
        let args = SourceArgs {
            source: "nar2024-web".into(),
            kind: None,
            sheet: None,
            rows: None,
        };

        let source = resolve_source(&config, &args).unwrap();
        assert_eq!(source.kind(), SourceKind::WebResource);
        assert!(source.label().contains("nar2024web.tsv"));
    }

    #[test]
    fn unknown_source_is_an_error() {
        let args = SourceArgs {
            source: "/nonexistent/listing.csv".into(),
            kind: None,
            sheet: None,
            rows: None,
        };
        assert!(resolve_source(&AppConfig::default(), &args).is_err());
    }
}
