use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use ferrotex_lint::report::{render_changes, render_context, render_issues, render_issues_json};
use ferrotex_lint::source::{fixed_output_path, read_document};
use ferrotex_lint::{EnvironmentScanner, LintConfig, repair, repair_file};
use notify::{EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

const RULE: &str = "==================================================";

#[derive(Parser)]
#[command(name = "ferrotex")]
#[command(about = "FerroTeX CLI tools", long_about = None)]
struct Cli {
    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report unbalanced environments and list lines missing \item
    Diagnose {
        /// Path to the .tex file
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Also print the lines around this line number
        #[arg(long, value_name = "LINE")]
        around: Option<usize>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Insert missing \item markers and save a repaired copy next to the input
    Fix {
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Inserted before the file extension of the copy (default: -fixed)
        #[arg(long)]
        suffix: Option<String>,

        /// Print the changes without writing anything
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Print the lines around a line number
    Context {
        #[arg(value_name = "FILE")]
        path: PathBuf,

        #[arg(short, long)]
        line: usize,

        /// Lines on each side (default: 5)
        #[arg(short, long)]
        radius: Option<usize>,

        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Re-run the diagnosis whenever the file changes
    Watch {
        #[arg(value_name = "FILE")]
        path: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Args)]
struct SettingsArgs {
    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Document encoding label, e.g. utf-8 or latin1
    #[arg(long)]
    encoding: Option<String>,

    /// Also treat dashes and asterisks as list entries, ignoring case
    #[arg(long)]
    extended: bool,

    /// Flag plain text directly after a list \begin
    #[arg(long)]
    leading_content: bool,
}

impl SettingsArgs {
    fn resolve(&self) -> anyhow::Result<LintConfig> {
        let mut config = match &self.config {
            Some(path) => LintConfig::load(path)?,
            None => LintConfig::default(),
        };
        if let Some(encoding) = &self.encoding {
            config.encoding = encoding.clone();
        }
        if self.extended {
            config.rules.apply_extended();
        }
        if self.leading_content {
            config.rules.flag_leading_content = true;
        }
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Diagnose {
            path,
            around,
            format,
            settings,
        } => {
            let config = settings.resolve()?;
            let clean = diagnose(path, &config, *around, *format)?;
            if !clean {
                std::process::exit(1);
            }
        }
        Commands::Fix {
            path,
            suffix,
            dry_run,
            settings,
        } => {
            let mut config = settings.resolve()?;
            if let Some(suffix) = suffix {
                config.output_suffix = suffix.clone();
            }
            fix(path, &config, *dry_run)?;
        }
        Commands::Context {
            path,
            line,
            radius,
            settings,
        } => {
            let config = settings.resolve()?;
            let text = read_document(path, &config.encoding)
                .with_context(|| format!("cannot load {}", path.display()))?;
            let lines: Vec<&str> = text.split('\n').collect();
            print!(
                "{}",
                render_context(&lines, *line, radius.unwrap_or(config.context_radius))
            );
        }
        Commands::Watch { path, settings } => {
            let config = settings.resolve()?;
            watch(path, &config)?;
        }
    }
    Ok(())
}

/// Prints the report. Returns true when no issues were found.
fn diagnose(
    path: &Path,
    config: &LintConfig,
    around: Option<usize>,
    format: Format,
) -> anyhow::Result<bool> {
    let text = read_document(path, &config.encoding)
        .with_context(|| format!("cannot load {}", path.display()))?;
    let issues = EnvironmentScanner::new(config.rules.clone()).scan_text(&text);

    match format {
        Format::Json => println!("{}", render_issues_json(&issues)?),
        Format::Text => {
            println!("LaTeX Structure Diagnostic Report");
            println!("{RULE}");
            println!();
            print!("{}", render_issues(&issues));
            if let Some(target) = around {
                let lines: Vec<&str> = text.split('\n').collect();
                println!();
                print!("{}", render_context(&lines, target, config.context_radius));
            }
        }
    }

    Ok(issues.is_empty())
}

fn fix(path: &Path, config: &LintConfig, dry_run: bool) -> anyhow::Result<()> {
    let (outcome, output) = if dry_run {
        let text = read_document(path, &config.encoding)
            .with_context(|| format!("cannot load {}", path.display()))?;
        (repair(&text, &config.rules), None)
    } else {
        let result = repair_file(path, config)
            .with_context(|| format!("cannot repair {}", path.display()))?;
        (result.outcome, Some(result.output))
    };

    println!("LaTeX List Structure Fixes{}:", if dry_run { " (dry run)" } else { " Applied" });
    println!("{RULE}");
    print!("{}", render_changes(&outcome.changes));

    let remaining = outcome.issues.iter().filter(|i| !i.is_repairable()).count();
    if remaining > 0 {
        println!();
        println!(
            "{remaining} structural issue(s) need manual attention; run `ferrotex diagnose {}`.",
            path.display()
        );
    }

    println!();
    match output {
        Some(output) => println!("Fixed file saved as: {}", output.display()),
        None => println!(
            "Would save fixed file as: {}",
            fixed_output_path(path, &config.output_suffix).display()
        ),
    }
    Ok(())
}

fn watch(path: &Path, config: &LintConfig) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    println!("Watching {} for changes (Press Ctrl+C to stop)", path.display());
    if let Err(e) = diagnose(path, config, None, Format::Text) {
        log::error!("Initial check failed: {e:#}");
    }

    let (tx, rx) = channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(event) => {
                let _ = tx.send(event);
            }
            Err(e) => log::warn!("Watch error: {e}"),
        }
    })?;
    watcher.watch(path, RecursiveMode::NonRecursive)?;

    for event in rx {
        // Atomic saves replace the file, which shows up as a create.
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            continue;
        }
        // Editors often write in several steps.
        std::thread::sleep(Duration::from_millis(100));
        println!("\n--- {} changed ---\n", path.display());
        if let Err(e) = diagnose(path, config, None, Format::Text) {
            log::error!("Check failed: {e:#}");
        }
    }

    Ok(())
}
