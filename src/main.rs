use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ep_votes::config::CliOverrides;
use ep_votes::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// How tracked MEPs voted on the laws of a EuroVoc theme
#[derive(Parser, Debug)]
#[command(name = "ep-votes")]
#[command(about = "Report how tracked MEPs voted on laws within a EuroVoc theme")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// YAML config file (can also use EP_VOTES_CONFIG env var)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Votes API base URL (can also use EP_VOTES_API_URL env var)
    #[arg(long = "api-url", global = true)]
    api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long = "timeout-secs", global = true)]
    timeout_secs: Option<u64>,

    /// Extra attempts after a transport failure or server error
    #[arg(long, global = true)]
    retries: Option<u32>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every EuroVoc label found in the vote listing
    Labels,

    /// Print the tracked members' ballots for a theme as JSON lines
    Votes {
        /// EuroVoc label to filter by (exact match)
        #[arg(long)]
        theme: String,
    },

    /// Print the Legislative Observatory summary of one vote
    Summary {
        /// Vote id
        #[arg(long)]
        vote: u64,
    },

    /// Build the full report for a theme
    Report {
        /// EuroVoc label to filter by (exact match)
        #[arg(long)]
        theme: String,

        /// Output format
        #[arg(long, default_value = "html", value_parser = ["html", "text", "json"])]
        format: String,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Download member photos into this directory and reference them locally
        #[arg(long = "photos-dir")]
        photos_dir: Option<PathBuf>,

        /// Render votes without a summary when scraping fails instead of aborting
        #[arg(long = "skip-missing-summaries")]
        skip_missing_summaries: bool,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &GlobalArgs) -> anyhow::Result<Config> {
    let flags = CliOverrides {
        config_file: args.config.clone(),
        api_base_url: args.api_url.clone(),
        timeout_secs: args.timeout_secs,
        retries: args.retries,
    };
    let config = ConfigBuilder::layered(&flags, |name| std::env::var(name).ok())
        .context("Failed to load configuration")?
        .build()?;
    Ok(config)
}

/// Load the listing and fetch the tracked members' rows for `theme`,
/// warning when no vote carries the label at all
fn theme_rows(pipeline: &VotePipeline<HttpFetcher>, theme: &str) -> anyhow::Result<Vec<MemberVoteRow>> {
    let votes = pipeline.load_all_votes().context("Failed to load the vote listing")?;
    if !votes.iter().any(|vote| vote.has_label(theme)) {
        tracing::warn!(theme, "no vote carries this EuroVoc label; run `ep-votes labels` to list them");
    }
    pipeline
        .rows_for_theme(theme, &votes)
        .with_context(|| format!("Failed to fetch votes for theme '{}'", theme))
}

fn run_labels_command(pipeline: &VotePipeline<HttpFetcher>) -> anyhow::Result<()> {
    let votes = pipeline.load_all_votes().context("Failed to load the vote listing")?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for label in pipeline.list_labels(&votes) {
        writeln!(out, "{}", label)?;
    }
    Ok(())
}

fn run_votes_command(pipeline: &VotePipeline<HttpFetcher>, theme: &str) -> anyhow::Result<()> {
    let rows = theme_rows(pipeline, theme)?;

    // Write JSON to stdout (one per line)
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for row in rows {
        writeln!(out, "{}", serde_json::to_string(&row)?)?;
    }
    Ok(())
}

fn run_summary_command(pipeline: &VotePipeline<HttpFetcher>, vote_id: u64) -> anyhow::Result<()> {
    let vote = pipeline
        .vote(vote_id)
        .with_context(|| format!("Failed to fetch vote {}", vote_id))?;
    let summary = pipeline
        .vote_summary(&vote)
        .with_context(|| format!("Failed to scrape the summary of vote {}", vote_id))?;
    println!("{}", summary);
    Ok(())
}

fn run_report_command(
    pipeline: &VotePipeline<HttpFetcher>,
    theme: &str,
    format: &str,
    output: Option<PathBuf>,
    options: &ReportOptions,
) -> anyhow::Result<()> {
    let rows = theme_rows(pipeline, theme)?;
    let reports = ep_votes::report::build_report(pipeline.fetcher(), pipeline.config(), &rows, options)
        .context("Failed to build the report")?;

    let rendered = match format {
        "text" => render_text(&reports, theme),
        "json" => serde_json::to_string_pretty(&reports)?,
        _ => render_html(&reports, theme),
    };

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            eprintln!("✓ Wrote {} votes to {}", reports.len(), path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let config = build_config(&cli.global)?;
    let pipeline = VotePipeline::from_config(config)?;

    match cli.command {
        Command::Labels => run_labels_command(&pipeline),
        Command::Votes { theme } => run_votes_command(&pipeline, &theme),
        Command::Summary { vote } => run_summary_command(&pipeline, vote),
        Command::Report {
            theme,
            format,
            output,
            photos_dir,
            skip_missing_summaries,
        } => {
            let options = ReportOptions {
                skip_missing_summaries,
                photos_dir,
            };
            run_report_command(&pipeline, &theme, &format, output, &options)
        }
    }
}
