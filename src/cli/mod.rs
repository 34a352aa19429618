use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use serde::Serialize;

use crate::engine::{Engine, EngineOptions};
use crate::logging::Verbosity;
use crate::rules::RuleChain;
use crate::ui::UiConfig;

mod markdown;

#[derive(Debug, Parser)]
#[command(
    name = "secassess",
    version,
    about = "Assess an infrastructure inventory (JSON) against a fixed set of security rules"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
    #[arg(long, global = true)]
    pub verbose: bool,
    #[arg(long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Assess an inventory file, or stdin when INPUT is omitted or `-`.
    Assess(AssessArgs),
    /// List the rules in evaluation order.
    Rules(RulesArgs),
    Completion(CompletionArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct AssessArgs {
    pub input: Option<PathBuf>,
    #[arg(long)]
    pub markdown: bool,
    /// Rule id to skip; may be repeated.
    #[arg(long)]
    pub disable: Vec<String>,
    /// Glob matched against resource names; matching resources are skipped.
    #[arg(long)]
    pub exclude: Vec<String>,
    /// Exit with status 1 when any finding is reported.
    #[arg(long)]
    pub fail_on_findings: bool,
}

#[derive(Debug, Args)]
pub struct RulesArgs {}

#[derive(Debug, Args)]
pub struct CompletionArgs {
    pub shell: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub show: bool,
}

#[derive(Debug, Serialize)]
struct RuleListing {
    position: usize,
    id: &'static str,
    title: &'static str,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    crate::logging::init(Verbosity::from_flags(cli.quiet, cli.verbose));

    let stdout_is_tty = io::stdout().is_terminal();

    let home_dir = crate::config::home_dir();
    let env_config_path = std::env::var_os("SECASSESS_CONFIG").map(PathBuf::from);
    let cfg = crate::config::load(
        cli.config.as_deref().or(env_config_path.as_deref()),
        home_dir.as_deref(),
    )
    .map_err(crate::exit::invalid_args_err)?;

    let ui_cfg = UiConfig {
        color: stdout_is_tty && cfg.ui.color && !cli.no_color,
        max_table_rows: cfg.ui.max_table_rows,
        include_remediation: cfg.report.include_remediation,
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Assess(args) => {
            if cli.json && args.markdown {
                return Err(crate::exit::invalid_args(
                    "assess: `--markdown` cannot be combined with `--json`",
                ));
            }

            let mut disabled_rules = cfg.rules.disabled.clone();
            disabled_rules.extend(args.disable);
            disabled_rules.sort();
            disabled_rules.dedup();

            let mut exclude = cfg.assess.exclude.clone();
            exclude.extend(args.exclude);
            exclude.sort();
            exclude.dedup();

            let engine = Engine::new(EngineOptions {
                disabled_rules,
                exclude,
            })
            .map_err(crate::exit::invalid_args_err)?;

            let raw = read_input(args.input.as_deref()).map_err(crate::exit::invalid_args_err)?;
            let report = engine.report_bytes(&raw);

            if cli.json {
                write_json(&report)?;
            } else if args.markdown {
                write_stdout(
                    markdown::format_report(&report, ui_cfg.include_remediation).as_bytes(),
                )?;
            } else {
                crate::ui::print_report(&report, &ui_cfg);
            }

            if args.fail_on_findings && report.summary.findings_total > 0 {
                return Err(crate::exit::findings_present(report.summary.findings_total));
            }
        }
        Commands::Rules(_args) => {
            let chain = RuleChain::standard().without(&cfg.rules.disabled);
            if cli.json {
                let listing: Vec<RuleListing> = chain
                    .rules()
                    .enumerate()
                    .map(|(idx, rule)| RuleListing {
                        position: idx + 1,
                        id: rule.id(),
                        title: rule.title(),
                    })
                    .collect();
                write_json(&listing)?;
            } else {
                crate::ui::print_rules(&chain, &ui_cfg);
            }
        }
        Commands::Completion(args) => {
            let shell = parse_shell(&args.shell)?;
            let mut cmd = Cli::command();
            let mut out = io::stdout().lock();
            clap_complete::generate(shell, &mut cmd, "secassess", &mut out);
        }
        Commands::Config(args) => {
            if args.show {
                if cli.json {
                    write_json(&cfg)?;
                } else {
                    println!("{}", toml::to_string_pretty(&cfg)?);
                }
            } else if !ui_cfg.quiet {
                eprintln!("config: use `secassess config --show`");
            }
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        None => read_stdin(),
        Some(p) if p.as_os_str() == "-" => read_stdin(),
        Some(p) => std::fs::read(p)
            .with_context(|| format!("failed to read input file: {}", p.display())),
    }
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut raw)
        .context("failed to read input from stdin")?;
    Ok(raw)
}

fn write_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut buf = serde_json::to_vec_pretty(value)?;
    buf.push(b'\n');
    write_stdout(&buf)
}

fn write_stdout(bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    match stdout.write_all(bytes) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn parse_shell(s: &str) -> Result<clap_complete::Shell> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "bash" => Ok(clap_complete::Shell::Bash),
        "zsh" => Ok(clap_complete::Shell::Zsh),
        "fish" => Ok(clap_complete::Shell::Fish),
        other => Err(crate::exit::invalid_args(format!(
            "unsupported shell: {other} (expected bash|zsh|fish)"
        ))),
    }
}
