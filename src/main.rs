//! CLI entry point for `notedrop`.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use notedrop::config::{self, Config, ConfigSource};
use notedrop::i18n;
use notedrop::intake::{guard, BatchReport, Intake};
use notedrop::notify::{ConsoleNotifier, Level, Notifier};
use notedrop::vault::FsVault;

#[derive(Parser)]
#[command(name = "notedrop", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Vault root folder (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR", env = "NOTEDROP_VAULT")]
    vault: Option<PathBuf>,

    /// Config file, instead of the standard locations
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Language (en, de). Defaults to the config, then the system locale.
    #[arg(long, global = true, value_name = "LANG")]
    lang: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import every file in the input folder
    Import {
        #[arg(long)]
        json: bool,
    },
    /// Rename notes after their 'created' date
    Rename {
        #[arg(required = true, value_name = "NOTE")]
        notes: Vec<PathBuf>,
    },
    /// Create missing folders and a vault config file
    Init,
    /// Show the effective configuration
    Config,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

/// Language given with `--lang`, looked up before clap runs so `--help` is localized.
fn lang_from_args() -> Option<i18n::Lang> {
    let args: Vec<String> = std::env::args().collect();
    for (i, arg) in args.iter().enumerate() {
        if arg == "--lang" {
            if let Some(lang) = args.get(i + 1).and_then(|c| i18n::Lang::from_code(c)) {
                return Some(lang);
            }
        }
        if let Some(lang) = arg.strip_prefix("--lang=").and_then(i18n::Lang::from_code) {
            return Some(lang);
        }
    }
    None
}

/// Build a localized clap Command using i18n strings.
fn build_localized_command() -> clap::Command {
    let mut cmd = Cli::command()
        .about(i18n::app_about())
        .long_about(i18n::app_long_about());

    for name in ["import", "rename", "init", "config", "completions", "manpage"] {
        let about = match name {
            "import" => i18n::help_cmd_import(),
            "rename" => i18n::help_cmd_rename(),
            "init" => i18n::help_cmd_init(),
            "config" => i18n::help_cmd_config(),
            "completions" => i18n::help_cmd_completions(),
            _ => i18n::help_cmd_manpage(),
        };
        cmd = cmd.mut_subcommand(name, |sub| sub.about(about));
    }
    cmd
}

fn main() -> anyhow::Result<()> {
    let arg_lang = lang_from_args();
    i18n::set_lang(arg_lang.unwrap_or_else(i18n::detect_system_lang));

    let matches = build_localized_command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let vault_root = match cli.vault {
        Some(ref dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let (config, source) = config::load_config(cli.config.as_deref(), &vault_root)?;

    if arg_lang.is_none() {
        if let Some(lang) = config.general.lang.as_deref().and_then(i18n::Lang::from_code) {
            i18n::set_lang(lang);
        }
    }

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Import { json } => cmd_import(&vault_root, &config, json),
        Commands::Rename { notes } => cmd_rename(&vault_root, &notes),
        Commands::Init => cmd_init(&vault_root, &config, &source),
        Commands::Config => cmd_config(&config, &source),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "notedrop.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Routes notices around an active progress bar.
struct BarNotifier<'a> {
    bar: &'a ProgressBar,
    inner: ConsoleNotifier,
}

impl Notifier for BarNotifier<'_> {
    fn notify(&self, level: Level, message: &str) {
        self.bar.suspend(|| self.inner.notify(level, message));
    }
}

/// Run one batch import and print the summary.
fn cmd_import(vault_root: &Path, config: &Config, json: bool) -> anyhow::Result<()> {
    let vault = FsVault::open(vault_root)?;

    let pb = ProgressBar::new(0);
    if json {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} {} [{{bar:40.cyan/blue}}] {{pos}}/{{len}}",
                i18n::msg_importing()
            ))?
            .progress_chars("#>-"),
    );

    let notifier = BarNotifier {
        bar: &pb,
        inner: ConsoleNotifier { quiet: json },
    };
    let report = Intake::new(&vault, config, &notifier).run(Some(&|current, total| {
        pb.set_length(total as u64);
        pb.set_position(current as u64);
    }));
    pb.finish_and_clear();
    let report = report?;

    if json {
        print_report_json(&report)?;
    } else {
        print_report_table(&report);
    }
    Ok(())
}

/// Rename each note; fails if any of them could not be renamed.
fn cmd_rename(vault_root: &Path, notes: &[PathBuf]) -> anyhow::Result<()> {
    let vault = FsVault::open(vault_root)?;
    let notifier = ConsoleNotifier::default();

    let failed = notes
        .iter()
        .map(|note| vault.vault_path(note))
        .filter(|path| notedrop::rename::rename_and_notify(&vault, path, &notifier).is_err())
        .count();

    if failed > 0 {
        anyhow::bail!("{failed} of {} note(s) not renamed", notes.len());
    }
    Ok(())
}

/// Create missing folders, the template and a vault config file.
fn cmd_init(vault_root: &Path, config: &Config, source: &ConfigSource) -> anyhow::Result<()> {
    let vault = FsVault::open(vault_root)?;
    let notifier = ConsoleNotifier::default();

    guard::prepare_vault(&vault, config, &notifier)?;

    let config_path = vault_root.join(config::VAULT_CONFIG_FILE);
    if !config_path.exists() && *source == ConfigSource::Defaults {
        config::save_config(&config_path, config)?;
        notifier.info(&format!(
            "{}: {}",
            i18n::msg_config_written(),
            config_path.display()
        ));
    }

    notifier.info(i18n::msg_vault_ready());
    Ok(())
}

/// Print the effective configuration as TOML.
fn cmd_config(config: &Config, source: &ConfigSource) -> anyhow::Result<()> {
    let origin = match source {
        ConfigSource::File(path) => path.display().to_string(),
        ConfigSource::Defaults => i18n::msg_defaults().to_string(),
    };
    println!("# {}: {origin}", i18n::msg_config_source());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "notedrop", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

/// Print the import summary in a human-readable table.
fn print_report_table(report: &BatchReport) {
    use humansize::{format_size, BINARY};

    println!();
    println!("  {:<20} {}", i18n::msg_processed(), report.processed);
    println!("  {:<20} {}", i18n::msg_failed(), report.failures.len());
    println!("  {:<20} {}", i18n::msg_skipped(), report.skipped);
    println!(
        "  {:<20} {}",
        i18n::msg_relocated(),
        format_size(report.bytes_relocated(), BINARY)
    );

    let notes: Vec<&str> = report.notes().collect();
    if !notes.is_empty() {
        println!();
        println!("  {}:", i18n::msg_note_created());
        for note in notes {
            println!("    {note}");
        }
    }
    println!();
}

/// Print the import summary as JSON.
fn print_report_json(report: &BatchReport) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "processed": report.processed,
        "skipped": report.skipped,
        "failed": report.failures.len(),
        "bytes_relocated": report.bytes_relocated(),
        "failures": report.failures,
        "items": report.items,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
