use anyhow::Result;
use clap::{Parser, Subcommand};
use dermascan_core::Condition;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod engine;

use config::Config;
use engine::EngineError;

#[derive(Parser)]
#[command(name = "dermascan", about = "Dermascan skin-condition analysis CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a skin photo and print condition guidance
    Analyze {
        /// Path to the skin photo
        image: PathBuf,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a product's ingredient label against a condition
    Ingredients {
        /// Path to the ingredient label photo
        image: PathBuf,
        /// Condition label to evaluate against (e.g. "acne")
        #[arg(short, long)]
        condition: String,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List known conditions and their guidance
    Conditions,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let knowledge = config.knowledge()?;

    if let Commands::Conditions = cli.command {
        for condition in Condition::ALL {
            println!("{condition}:");
            println!("  {}", knowledge.profile(condition).guidance);
            println!();
        }
        return Ok(());
    }

    // Fail-fast: construct both adapters before spawning the engine.
    let classifier = dermascan_ml::SkinClassifier::load(&config.classifier_model_path())?;
    let recognizer = dermascan_ml::TesseractRecognizer::new(&config.tesseract_bin);
    let engine = engine::spawn_engine(classifier, recognizer, knowledge);

    match cli.command {
        Commands::Analyze { image, json } => match engine.analyze(image).await {
            Ok(result) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    println!(
                        "Condition: {} ({:.0}% confidence)",
                        result.label,
                        result.confidence * 100.0
                    );
                    println!();
                    println!("{}", result.guidance);
                }
            }
            Err(err) => report_failure(err),
        },
        Commands::Ingredients {
            image,
            condition,
            json,
        } => match engine.check_ingredients(image, condition).await {
            Ok(report) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!("{}", report.summary());
                }
            }
            Err(err) => report_failure(err),
        },
        Commands::Conditions => unreachable!("handled above"),
    }

    Ok(())
}

/// Adapter and image failures are terminal for this invocation only; the
/// user may rerun with a new photo. Never a panic, never an auto-retry.
fn report_failure(err: EngineError) {
    tracing::warn!(error = %err, "request failed");
    println!("Unable to process image.");
}
