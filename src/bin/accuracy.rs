use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail};
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info, warn};

use shootout::batch;
use shootout::config::Config;
use shootout::csv::CsvWriter;
use shootout::domain::TiePolicy;
use shootout::print;
use shootout::season::Season;
use shootout::teams::TeamDirectory;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// directory to source the odds and results from, overriding the config
    dir: Option<PathBuf>,

    /// configuration file
    #[clap(short = 'c', long, default_value = "config/shootout.json")]
    config: PathBuf,

    /// season to score, e.g. 2018-19; may be repeated (defaults to the configured seasons)
    #[clap(short = 's', long = "season")]
    seasons: Vec<Season>,

    /// prediction for games with even odds: visitor, home or exclude
    #[clap(short = 't', long, value_parser = parse_tie_policy)]
    tie_policy: Option<TiePolicy>,

    /// only score games at least this many points away from an even game
    #[clap(short = 'b', long)]
    lopsided_band: Option<f64>,

    /// write the per-season accuracies to a CSV file
    #[clap(short = 'o', long)]
    out: Option<PathBuf>,
}
impl Args {
    fn apply(self, config: &mut Config) -> Option<PathBuf> {
        if let Some(dir) = self.dir {
            config.data_dir = dir;
        }
        if !self.seasons.is_empty() {
            config.seasons = self.seasons;
        }
        if let Some(tie_policy) = self.tie_policy {
            config.accuracy.tie_policy = tie_policy;
        }
        if let Some(band) = self.lopsided_band {
            config.accuracy.lopsided_band = Some(band);
        }
        self.out
    }
}

fn parse_tie_policy(s: &str) -> anyhow::Result<TiePolicy> {
    match s.to_lowercase().as_str() {
        "v" | "visitor" => Ok(TiePolicy::Visitor),
        "h" | "home" => Ok(TiePolicy::Home),
        "x" | "exclude" => Ok(TiePolicy::Exclude),
        _ => Err(anyhow!("unsupported tie policy {s}")),
    }
}

fn main() -> anyhow::Result<()> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    debug!("args: {args:?}");

    let mut config = Config::read(&args.config)?;
    let out = args.apply(&mut config);
    config.validate()?;
    if config.seasons.is_empty() {
        bail!("no seasons to score");
    }
    debug!("config: {config:?}");

    let directory = TeamDirectory::read(&config.teams_file)?;
    info!(
        "loaded {} team aliases from {}",
        directory.len(),
        config.teams_file.display()
    );

    let source = config.source();
    let report = batch::run(&source, &directory, &config.seasons, &config.accuracy);

    info!(
        "accuracy of the closing favourite (tie policy: {}):\n{}",
        config.accuracy.tie_policy,
        Console::default().render(&print::tabulate_accuracies(report.accuracies()))
    );
    let failures = report.failures().count();
    if failures > 0 {
        warn!(
            "{failures} of {} seasons failed:\n{}",
            report.outcomes.len(),
            Console::default().render(&print::tabulate_failures(report.failures()))
        );
    }
    info!("took {:.3}s", report.elapsed().as_secs_f64());

    if let Some(out) = out {
        let mut writer = CsvWriter::create(&out)?;
        report.write_csv(&mut writer)?;
        info!("wrote {}", out.display());
    }
    Ok(())
}
