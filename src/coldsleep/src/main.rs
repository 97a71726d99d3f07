#[macro_use]
extern crate log;

use std::path::PathBuf;

use anyhow::anyhow;
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use coldsleep::{
    Analysis, AnalysisOptions, BathSource, OuraApiClient, api::API_BASE, loader,
};
use coldsleep_algos::ColdBathClassifier;
use coldsleep_types::{
    activities::DailyActivity,
    cold_bath::{ColdBathFlag, MissingDays},
    sleep::{SleepMetric, SleepRecord},
    window::ObservationWindow,
};
use dotenv::dotenv;

#[derive(Parser)]
#[command(version, about = "Correlate cold baths with sleep data from an Oura ring")]
pub struct ColdSleepCli {
    /// Oura personal access token, required when data comes from the API
    #[arg(env, long, hide_env_values = true)]
    pub oura_token: Option<String>,
    #[arg(env, long, default_value = API_BASE)]
    pub oura_base_url: String,
    /// Number of days before the end date to include
    #[arg(env = "COLDSLEEP_DAYS", long, default_value_t = ObservationWindow::DEFAULT_DAYS)]
    pub days: u32,
    /// Last day of the observation window, defaults to today
    #[arg(long)]
    pub end_date: Option<NaiveDate>,
    #[clap(subcommand)]
    pub subcommand: ColdSleepCommand,
}

#[derive(Subcommand)]
pub enum ColdSleepCommand {
    ///
    /// Correlate cold-bath days with a sleep metric
    ///
    Correlate {
        #[command(flatten)]
        sources: SourceArgs,
        #[command(flatten)]
        bounds: ClassifierArgs,
        #[arg(long, default_value_t)]
        metric: SleepMetric,
        /// How to pair sleep days that have no cold-bath information
        /// [default: no-bath for --baths-csv, exclude otherwise]
        #[arg(long)]
        missing_days: Option<MissingDays>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    ///
    /// List the days inferred as cold-bath days
    ///
    Classify {
        /// Workouts CSV (date,start_time,duration_minutes), otherwise the API
        #[arg(long)]
        activities_csv: Option<PathBuf>,
        #[command(flatten)]
        bounds: ClassifierArgs,
    },
    ///
    /// Generate shell completions
    ///
    Completions { shell: Shell },
}

#[derive(Args)]
pub struct SourceArgs {
    /// Sleep CSV (date,total_sleep_minutes,...), otherwise the API
    #[arg(long)]
    pub sleep_csv: Option<PathBuf>,
    /// Workouts CSV (date,start_time,duration_minutes), otherwise the API
    #[arg(long, conflicts_with = "baths_csv")]
    pub activities_csv: Option<PathBuf>,
    /// CSV log of cold-bath dates with a `date` column
    #[arg(long)]
    pub baths_csv: Option<PathBuf>,
}

#[derive(Args)]
pub struct ClassifierArgs {
    /// Earliest session start (inclusive)
    #[arg(long, default_value = "06:00", value_parser = loader::parse_time)]
    pub earliest: NaiveTime,
    /// Latest session start (exclusive)
    #[arg(long, default_value = "10:00", value_parser = loader::parse_time)]
    pub latest: NaiveTime,
    #[arg(long, default_value_t = ColdBathClassifier::MIN_MINUTES)]
    pub min_minutes: f64,
    #[arg(long, default_value_t = ColdBathClassifier::MAX_MINUTES)]
    pub max_minutes: f64,
}

impl ClassifierArgs {
    fn classifier(&self) -> anyhow::Result<ColdBathClassifier> {
        Ok(ColdBathClassifier::new(
            self.earliest,
            self.latest,
            self.min_minutes,
            self.max_minutes,
        )?)
    }
}

impl ColdSleepCli {
    fn window(&self) -> anyhow::Result<ObservationWindow> {
        let end = self.end_date.unwrap_or_else(|| Local::now().date_naive());
        ObservationWindow::trailing(end, self.days).ok_or_else(|| {
            anyhow!(
                "--days {} before {} is outside the supported date range",
                self.days,
                end
            )
        })
    }

    fn api_client(&self) -> anyhow::Result<OuraApiClient> {
        let token = self
            .oura_token
            .as_deref()
            .ok_or(anyhow!("OURA_TOKEN is required when no CSV source is given"))?;
        OuraApiClient::with_base_url(token, &self.oura_base_url)
    }

    async fn load_sleep(&self, sources: &SourceArgs) -> anyhow::Result<Vec<SleepRecord>> {
        match &sources.sleep_csv {
            Some(path) => loader::load_sleep(path),
            None => self.api_client()?.fetch_sleep(self.window()?).await,
        }
    }

    async fn load_activities(&self, csv: Option<&PathBuf>) -> anyhow::Result<Vec<DailyActivity>> {
        match csv {
            Some(path) => loader::load_activities(path),
            None => self.api_client()?.fetch_workouts(self.window()?).await,
        }
    }

    async fn load_baths(&self, sources: &SourceArgs) -> anyhow::Result<BathSource> {
        if let Some(path) = &sources.baths_csv {
            return Ok(BathSource::Log(loader::load_cold_bath_dates(path)?));
        }

        let activities = self.load_activities(sources.activities_csv.as_ref()).await?;
        Ok(BathSource::Activities(activities))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("reqwest", log::LevelFilter::Warn)
        .filter_module("hyper_util", log::LevelFilter::Warn)
        .init();

    if let Err(error) = env_file {
        debug!("no .env loaded: {}", error);
    }

    let cli = ColdSleepCli::parse();

    match &cli.subcommand {
        ColdSleepCommand::Correlate {
            sources,
            bounds,
            metric,
            missing_days,
            json,
        } => {
            let window = cli.window()?;
            info!("observation window {} to {}", window.start, window.end);

            let options = AnalysisOptions {
                window,
                metric: *metric,
                missing: *missing_days,
                classifier: bounds.classifier()?,
            };

            let sleep = cli.load_sleep(sources).await?;
            let baths = cli.load_baths(sources).await?;
            let analysis = Analysis::run(sleep, baths, &options);

            if let Err(e) = &analysis.correlation {
                warn!("correlation is undefined: {}", e);
            }

            if *json {
                println!("{}", serde_json::to_string_pretty(&analysis.report())?);
            } else {
                println!("{}", analysis);
            }

            Ok(())
        }
        ColdSleepCommand::Classify {
            activities_csv,
            bounds,
        } => {
            let window = cli.window()?;
            let classifier = bounds.classifier()?;
            let activities = cli
                .load_activities(activities_csv.as_ref())
                .await?
                .into_iter()
                .filter(|a| window.contains(a.date))
                .collect::<Vec<_>>();

            for flag in classifier.classify(&activities).iter().map(ColdBathFlag::from) {
                let mark = if flag.is_cold_bath { "cold bath" } else { "-" };
                println!("{}  {}", flag.date, mark);
            }

            Ok(())
        }
        ColdSleepCommand::Completions { shell } => {
            clap_complete::generate(
                *shell,
                &mut ColdSleepCli::command(),
                "coldsleep",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
