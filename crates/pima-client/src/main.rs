//! pima: command-line front end for the diabetes prediction service.
//!
//! Run with: cargo run -p pima-client -- predict --glucose 148 --bmi 33.6 ...

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use pima_client::{FormHandler, FormInput, HttpPredictionApi, PredictionApi, SubmitOutcome, TerminalView};
use pima_common::Feature;
use pima_config::{Config, NanPolicy};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pima")]
#[command(author, version, about = "Diabetes risk prediction client")]
struct Cli {
    /// Prediction service base URL (overrides pima.toml and API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file (default: $PIMA_CONFIG or ./pima.toml)
    #[arg(long, global = true, env = "PIMA_CONFIG")]
    config: Option<PathBuf>,

    /// What to do with fields that are not numbers: reject or pass_through
    #[arg(long, global = true)]
    nan_policy: Option<NanPolicy>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one patient record and show the prediction and model metrics
    Predict(PatientArgs),
    /// Show the model evaluation metrics
    Metrics,
    /// Check that the service is up
    Health,
    /// Print the resolved configuration
    Config,
}

/// Raw field text, coerced the same way the web form does.
#[derive(Args, Debug)]
struct PatientArgs {
    #[arg(long, allow_hyphen_values = true)]
    pregnancies: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    glucose: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    blood_pressure: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    skin_thickness: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    insulin: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    bmi: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    diabetes_pedigree_function: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    age: Option<String>,
}

impl PatientArgs {
    fn to_form(&self) -> FormInput {
        let mut form = FormInput::new();
        for feature in Feature::ALL {
            let value = match feature {
                Feature::Pregnancies              => &self.pregnancies,
                Feature::Glucose                  => &self.glucose,
                Feature::BloodPressure            => &self.blood_pressure,
                Feature::SkinThickness            => &self.skin_thickness,
                Feature::Insulin                  => &self.insulin,
                Feature::Bmi                      => &self.bmi,
                Feature::DiabetesPedigreeFunction => &self.diabetes_pedigree_function,
                Feature::Age                      => &self.age,
            };
            if let Some(text) = value {
                form.set(feature.name(), text.as_str());
            }
        }
        form
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pima_client=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let _ = dotenvy::dotenv();
    let mut config = Config::load_with_env(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        config.client.set_api_url(url)?;
    }
    if let Some(policy) = cli.nan_policy {
        config.client.nan_policy = policy;
    }
    if let Some(timeout) = cli.timeout {
        config.client.timeout_secs = timeout;
    }
    debug!(api_url = %config.client.api_url, nan_policy = %config.client.nan_policy, "Configuration resolved");

    let api = Arc::new(HttpPredictionApi::new(&config.client)?);

    match cli.command {
        Command::Predict(args) => {
            let view = Arc::new(TerminalView::stdio());
            let handler = FormHandler::new(&config.client, api, view);
            match handler.on_submit(&args.to_form()).await {
                SubmitOutcome::Predicted { .. } => Ok(ExitCode::SUCCESS),
                SubmitOutcome::Failed(_) | SubmitOutcome::Ignored => Ok(ExitCode::FAILURE),
            }
        }
        Command::Metrics => {
            let metrics = api.metrics().await?;
            println!("{metrics}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Health => {
            let health = api.health().await?;
            println!("{health}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
