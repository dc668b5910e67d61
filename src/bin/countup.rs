use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "countup", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split displayed text into its numeric value and trailing suffix.
    Parse(ParseArgs),
    /// Format a number the way a counter renders it.
    Format(FormatArgs),
    /// Run the counters of a page description on a virtual clock.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// Text as it appears in the element.
    text: String,

    /// Locale whose decimal mark is kept.
    #[arg(long, default_value = countup::DEFAULT_LOCALE)]
    locale: String,
}

#[derive(Parser, Debug)]
struct FormatArgs {
    /// Value to format.
    #[arg(allow_negative_numbers = true)]
    number: f64,

    /// Fraction digits to show.
    #[arg(long, default_value_t = 0)]
    decimals: usize,

    /// Locale tag; unknown tags fall back to their language, then en-US.
    #[arg(long, default_value = countup::DEFAULT_LOCALE)]
    locale: String,

    /// Omit the thousands separator.
    #[arg(long, default_value_t = false)]
    no_separator: bool,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input page JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame rate of the simulated display.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Stop after this much virtual time even if counters are still running.
    #[arg(long, default_value_t = 60_000)]
    duration_ms: u64,

    /// Print one JSON object per line instead of plain text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Parse(args) => cmd_parse(args),
        Command::Format(args) => cmd_format(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn cmd_parse(args: ParseArgs) -> anyhow::Result<()> {
    let decimal = countup::decimal_separator(&args.locale);
    let parsed = countup::parse_value_with(&args.text, decimal);
    println!("value: {}", parsed.value);
    println!("suffix: {}", parsed.suffix);
    Ok(())
}

fn cmd_format(args: FormatArgs) -> anyhow::Result<()> {
    if args.decimals > countup::MAX_DECIMALS {
        anyhow::bail!(
            "--decimals must be at most {}, got {}",
            countup::MAX_DECIMALS,
            args.decimals
        );
    }
    let text = countup::format_number(
        args.number,
        args.decimals,
        Some(args.locale.as_str()),
        !args.no_separator,
    );
    println!("{text}");
    Ok(())
}

#[derive(serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Line<'a> {
    Text(&'a countup::TextChange),
    Event(&'a countup::DispatchedEvent),
}

impl Line<'_> {
    fn at(&self) -> countup::Timestamp {
        match self {
            Line::Text(change) => change.at,
            Line::Event(event) => event.at,
        }
    }
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    if args.fps == 0 {
        anyhow::bail!("--fps must be positive");
    }
    let json = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read page '{}'", args.in_path.display()))?;
    let page = countup::Page::from_json_str(&json)
        .with_context(|| format!("load page '{}'", args.in_path.display()))?;

    let mut runtime = countup::Runtime::new(page);
    let handles = runtime.start();
    tracing::info!(counters = handles.len(), "page loaded");

    let interval_ms = 1000.0 / f64::from(args.fps);
    let stopped_at = runtime.run_until_idle(interval_ms, args.duration_ms as f64);

    let page = runtime.page();
    let mut lines: Vec<Line<'_>> = page
        .text_log()
        .iter()
        .map(Line::Text)
        .chain(page.events().iter().map(Line::Event))
        .collect();
    // Stable sort keeps a frame's text write ahead of the event it triggered.
    lines.sort_by(|a, b| a.at().0.total_cmp(&b.at().0));

    for line in &lines {
        if args.json {
            println!("{}", serde_json::to_string(line).context("encode output line")?);
        } else {
            match line {
                Line::Text(change) => println!(
                    "{:>10.1}ms  {}  {}",
                    change.at.as_millis(),
                    change.element,
                    change.text
                ),
                Line::Event(event) => println!(
                    "{:>10.1}ms  {}  {}",
                    event.at.as_millis(),
                    event.event.element,
                    event.event.name
                ),
            }
        }
    }

    if !runtime.is_idle() {
        eprintln!(
            "stopped at {:.1}ms with counters still running",
            stopped_at.as_millis()
        );
    }
    Ok(())
}
