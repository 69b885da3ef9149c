use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use moodmingle_core::{
    extract_json_candidate, normalize, render_recommendation_prompt, InvalidRequest, LlmConfig,
    RecommendationRequest, RecommendationService,
};
use tracing_subscriber::EnvFilter;

/// Exit status for a request rejected before reaching the model.
const EXIT_INVALID_REQUEST: u8 = 2;

#[derive(Parser)]
#[command(name = "moodmingle")]
#[command(about = "MoodMingle activity recommendations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the prompt that would be sent to the model
    Prompt(RequestArgs),
    /// Get recommendations using the provider configured in the environment
    Recommend(RequestArgs),
    /// Run extraction and normalization on a saved model reply
    Extract {
        /// File holding the raw reply, or "-" for stdin
        input: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
struct RequestArgs {
    /// An interest keyword (repeatable)
    #[arg(long = "interest", short = 'i')]
    interests: Vec<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    weather: Option<String>,
    /// Degrees Celsius
    #[arg(long, allow_hyphen_values = true)]
    temperature: Option<String>,
}

impl From<RequestArgs> for RecommendationRequest {
    fn from(args: RequestArgs) -> Self {
        let mut request = RecommendationRequest::new(args.interests);
        if let Some(location) = args.location {
            request = request.with_location(location);
        }
        if let Some(weather) = args.weather {
            request = request.with_weather(weather);
        }
        if let Some(temperature) = args.temperature {
            request = request.with_temperature(temperature);
        }
        request
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Prompt(args) => match render_prompt(&args.into()) {
            Ok(prompt) => println!("{}", prompt),
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(ExitCode::from(EXIT_INVALID_REQUEST));
            }
        },
        Commands::Recommend(args) => return recommend(args.into()).await,
        Commands::Extract { input } => extract(&input)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn render_prompt(request: &RecommendationRequest) -> Result<String, InvalidRequest> {
    let interests = request.cleaned_interests();
    if interests.is_empty() {
        return Err(InvalidRequest::NoInterests);
    }
    Ok(render_recommendation_prompt(
        &interests,
        &request.location,
        &request.weather,
        &request.temperature,
    ))
}

async fn recommend(request: RecommendationRequest) -> Result<ExitCode> {
    let config = LlmConfig::from_env()?;
    let service = RecommendationService::from_config(&config)?;

    match service.generate(&request).await {
        Ok(outcome) => {
            if let Some(reason) = &outcome.fallback {
                eprintln!("Model output unusable ({}); showing fallback catalog", reason);
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&outcome.recommendations)?
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(ExitCode::from(EXIT_INVALID_REQUEST))
        }
    }
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read stdin")?;
        Ok(raw)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))
    }
}

fn extract(input: &Path) -> Result<()> {
    let raw = read_input(input)?;
    let candidate = extract_json_candidate(&raw);
    let normalized = normalize(candidate.text)?;

    let report = serde_json::json!({
        "strategy": candidate.strategy,
        "substituted": normalized.substituted,
        "recommendations": normalized.recommendations,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_request_args_fill_unknowns() {
        let cli = Cli::try_parse_from([
            "moodmingle",
            "prompt",
            "--interest",
            "Hiking",
            "-i",
            "Gaming",
            "--temperature",
            "-5",
        ])
        .unwrap();

        let Commands::Prompt(args) = cli.command else {
            panic!("expected prompt subcommand");
        };
        let request = RecommendationRequest::from(args);
        assert_eq!(request.interests, vec!["Hiking", "Gaming"]);
        assert_eq!(request.location, "Unknown");
        assert_eq!(request.weather, "Unknown");
        assert_eq!(request.temperature, "-5");
    }

    #[test]
    fn test_prompt_requires_an_interest() {
        let cli = Cli::try_parse_from(["moodmingle", "prompt", "--location", "Calgary"]).unwrap();
        let Commands::Prompt(args) = cli.command else {
            panic!("expected prompt subcommand");
        };
        assert_eq!(
            render_prompt(&args.into()).unwrap_err(),
            InvalidRequest::NoInterests
        );

        let blank = RecommendationRequest::new(["  "]);
        assert_eq!(render_prompt(&blank).unwrap_err(), InvalidRequest::NoInterests);

        let prompt = render_prompt(&RecommendationRequest::new(["Hiking"])).unwrap();
        assert!(prompt.contains("Hiking"));
    }

    #[test]
    fn test_extract_takes_a_path() {
        let cli = Cli::try_parse_from(["moodmingle", "extract", "-"]).unwrap();
        assert!(matches!(cli.command, Commands::Extract { ref input } if input.as_os_str() == "-"));
    }
}
