use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::bail;
use chrono::{Duration, Utc};
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info, warn};

use matchcast::cache::{Snapshot, TtlCache, DEFAULT_MAX_AGE_SECS};
use matchcast::domain::MatchInput;
use matchcast::file::{read_json, recurse_dir, write_json, FromJsonFile};
use matchcast::fixture::{Fixture, RawFixture};
use matchcast::league::league_config;
use matchcast::prediction::{Config, Prediction, Predictor};
use matchcast::print::{tabulate, tabulate_value};
use matchcast::synthetic::synthesise;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// JSON file, or directory of JSON files, holding arrays of fixtures
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// home team of a single fixture with synthesised data
    #[clap(long)]
    home: Option<String>,

    /// away team of a single fixture with synthesised data
    #[clap(long)]
    away: Option<String>,

    /// provider sport key of the league, e.g. soccer_epl
    #[clap(short = 'l', long)]
    league: Option<String>,

    /// model configuration file
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// print predictions as JSON rather than as tables
    #[clap(long)]
    json: bool,

    /// snapshot file to persist predictions to, and to reuse while fresh
    #[clap(short = 'o', long)]
    out: Option<PathBuf>,

    /// maximum age of a reusable snapshot, in seconds
    #[clap(long, default_value_t = DEFAULT_MAX_AGE_SECS)]
    max_age_secs: i64,

    /// ignore any existing snapshot
    #[clap(long)]
    force: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        let single = self.home.is_some() || self.away.is_some();
        if self.file.is_none() && !single || self.file.is_some() && single {
            bail!("either the -f flag or the --home and --away flags must be specified");
        }
        if single && (self.home.is_none() || self.away.is_none()) {
            bail!("both --home and --away must be specified");
        }
        if self.max_age_secs <= 0 {
            bail!("snapshot max age must be positive");
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    config.validate()?;
    debug!("config: {config:?}");

    let now = Utc::now();
    let max_age = Duration::seconds(args.max_age_secs);
    if let Some(predictions) = fresh_snapshot(&args, now, max_age) {
        render(&args, &predictions)?;
        return Ok(());
    }

    let inputs = read_inputs(&args)?;
    info!("predicting {} fixture(s)", inputs.len());
    let predictor = Predictor::new(config);
    let mut cache = TtlCache::new(max_age);
    let predictions = inputs
        .iter()
        .map(|input| predictor.predict_cached(&mut cache, input, now))
        .collect::<Vec<_>>();

    if let Some(out) = &args.out {
        write_json(out, &Snapshot::new(predictions.clone(), now))?;
        info!("saved snapshot to {}", out.display());
    }
    render(&args, &predictions)?;
    Ok(())
}

fn fresh_snapshot(
    args: &Args,
    now: chrono::DateTime<Utc>,
    max_age: Duration,
) -> Option<Vec<Prediction>> {
    let out = args.out.as_ref()?;
    if args.force || !out.exists() {
        return None;
    }
    match read_json::<Snapshot<Vec<Prediction>>>(out) {
        Ok(snapshot) if !snapshot.is_stale(now, max_age) => {
            info!(
                "reusing snapshot from {} ({}s old)",
                snapshot.last_updated,
                snapshot.age(now).num_seconds()
            );
            Some(snapshot.value)
        }
        Ok(snapshot) => {
            info!("snapshot from {} is stale", snapshot.last_updated);
            None
        }
        Err(err) => {
            warn!("ignoring unreadable snapshot {}: {err}", out.display());
            None
        }
    }
}

fn read_inputs(args: &Args) -> anyhow::Result<Vec<MatchInput>> {
    if let (Some(home), Some(away)) = (&args.home, &args.away) {
        let league = league_config(args.league.as_deref().unwrap_or_default());
        return Ok(vec![synthesise(home, away, league)]);
    }

    let mut files = vec![];
    if let Some(path) = &args.file {
        recurse_dir(path.clone(), &mut files, &mut |ext| ext == "json")?;
    }
    let mut inputs = vec![];
    for file in files {
        debug!("reading fixtures from {}", file.display());
        let raw_fixtures: Vec<RawFixture> = read_json(&file)?;
        for mut raw in raw_fixtures {
            if raw.sport_key.is_none() {
                raw.sport_key = args.league.clone();
            }
            match Fixture::try_from(raw) {
                Ok(fixture) => inputs.push(fixture.input),
                Err(err) => warn!("skipping fixture in {}: {err}", file.display()),
            }
        }
    }
    if inputs.is_empty() {
        bail!("no valid fixtures found");
    }
    Ok(inputs)
}

fn render(args: &Args, predictions: &[Prediction]) -> Result<(), Box<dyn Error>> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(predictions)?);
        return Ok(());
    }
    info!("\n{}", Console::default().render(&tabulate(predictions)));
    for prediction in predictions.iter().filter(|prediction| prediction.value.any()) {
        info!(
            "{} v {}:\n{}",
            prediction.home_team,
            prediction.away_team,
            Console::default().render(&tabulate_value(prediction))
        );
    }
    Ok(())
}
