//! CLI command handling
//!
//! Resolves configuration, builds the report sinks and dispatches to the
//! harness. Everything that can fail here fails before the first request.

use colored::Colorize;
use std::env;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

use crate::commands::{Commands, RunArgs, SuiteArgs};
use crate::common::config::{env_base_url, Config};
use crate::common::paths::default_log_path;
use crate::common::{Error, Result};
use crate::harness::Harness;
use crate::probe::{build_url, HttpProbe};
use crate::report::{
    ConsoleReporter, HtmlReporter, JsonReporter, LogReporter, Reporters,
};
use crate::scenario::{builtin_suite, load_suite, Suite};

/// Dispatch a CLI command, returning the process exit code
pub async fn dispatch(command: Commands) -> Result<i32> {
    match command {
        Commands::Run(args) => run(args).await,
        Commands::List { base_url, suite } => list(base_url.as_deref(), &suite),
    }
}

async fn run(args: RunArgs) -> Result<i32> {
    let config = load_config(&args.suite)?;
    let suite = load_resolved_suite(&args.suite, &config)?;
    let env = env_base_url();
    let target = config.resolve_base_url(
        args.base_url.as_deref(),
        env.as_deref(),
        suite.base_url.as_deref(),
    )?;

    let timeout_secs = args.timeout.unwrap_or(config.target.timeout_secs);
    if timeout_secs == 0 {
        return Err(Error::Config("timeout must be at least one second".to_string()));
    }
    let probe = HttpProbe::new(Duration::from_secs(timeout_secs), &config.target.user_agent)?;

    if args.preflight {
        probe.preflight(&target).await?;
    }

    let mut reporters = build_reporters(&args, &config)?;
    let summary = Harness::new(&probe, target)
        .run(&suite, &mut reporters)
        .await?;
    Ok(summary.exit_code())
}

fn list(base_url: Option<&str>, args: &SuiteArgs) -> Result<i32> {
    let config = load_config(args)?;
    let suite = load_resolved_suite(args, &config)?;
    let env = env_base_url();
    let target = config.resolve_base_url(base_url, env.as_deref(), suite.base_url.as_deref())?;

    println!(
        "\n{} {} ({} scenarios)",
        "Suite:".blue().bold(),
        suite.name.white().bold(),
        suite.table.len()
    );
    for (i, scenario) in suite.table.iter().enumerate() {
        println!(
            "  {:>3}. {} {}",
            i + 1,
            scenario.name,
            format!("-> {}", scenario.expect).dimmed()
        );
        println!("       {}", build_url(&target, &scenario.params).as_str().dimmed());
    }
    println!();
    Ok(0)
}

fn load_config(args: &SuiteArgs) -> Result<Config> {
    match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Load the suite and drop scenarios gated on features the target lacks
fn load_resolved_suite(args: &SuiteArgs, config: &Config) -> Result<Suite> {
    let mut suite = match &args.suite {
        Some(path) => load_suite(path)?,
        None => builtin_suite()?,
    };

    let mut features = config.target.features.clone();
    features.extend(args.features.iter().cloned());
    suite.table = suite.table.resolve(&features)?;

    tracing::debug!(suite = %suite.name, scenarios = suite.table.len(), ?features, "Suite resolved");
    Ok(suite)
}

/// Open every report sink up front so a bad path aborts the run early
fn build_reporters(args: &RunArgs, config: &Config) -> Result<Reporters> {
    let html = args.html.as_deref().or(config.report.html.as_deref());
    let html_on_stdout = html == Some(Path::new("-"));
    if html_on_stdout && args.json {
        return Err(Error::Config(
            "--json and --html - both write to stdout; pick one".to_string(),
        ));
    }

    let mut reporters = Reporters::new();

    if html_on_stdout || args.json {
        if let Some(enabled) = stderr_color(
            env::var_os("NO_COLOR").is_some(),
            env::var_os("CLICOLOR_FORCE").is_some_and(|v| v != "0"),
            io::stderr().is_terminal(),
        ) {
            colored::control::set_override(enabled);
        }
        reporters.push(ConsoleReporter::stderr(args.verbose));
    } else {
        reporters.push(ConsoleReporter::stdout(args.verbose));
    }

    if !args.no_log && config.report.log {
        let path = args
            .log
            .clone()
            .or_else(|| config.report.log_file.clone())
            .unwrap_or_else(default_log_path);
        reporters.push(LogReporter::open(&path)?);
    }

    match html {
        Some(_) if html_on_stdout => reporters.push(HtmlReporter::stdout()),
        Some(path) => reporters.push(HtmlReporter::create(path)?),
        None => {}
    }

    if args.json {
        reporters.push(JsonReporter::stdout());
    }

    Ok(reporters)
}

/// Color decision for console output that goes to stderr
///
/// `colored` looks at stdout by default. `NO_COLOR` and `CLICOLOR_FORCE`
/// keep their meaning; otherwise stderr's own terminal status decides.
fn stderr_color(no_color: bool, forced: bool, stderr_is_tty: bool) -> Option<bool> {
    if no_color || forced {
        None
    } else {
        Some(stderr_is_tty)
    }
}
