use anyhow::{Context, Result};
use clap::{Args, Parser};
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use emotispace::constants::{
    DEFAULT_PORT, DESIGN_IMAGE_FILE, EXTERIOR_IMAGE_FILE, FLOOR_PLAN_IMAGE_FILE,
};
use emotispace::render::render_result;
use emotispace::web_server;
use emotispace::{
    BigFiveTraits, Budget, ConceptOptions, DesignOptions, GeminiConfig, GeneratedImage, Mood,
    Orchestrator, Personality, Room, RunRequest, RunResult, Style,
};

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

// Define the available subcommands
#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the EmotiSpace web server.
    Serve {
        #[arg(long, env = "EMOTISPACE_PORT", default_value_t = DEFAULT_PORT, help = "Port for the web server.")]
        port: u16,
    },
    /// Generate an interior design report and room visualization.
    Design {
        #[arg(long, value_enum, required_unless_present = "traits")]
        personality: Option<Personality>,
        #[arg(
            long,
            conflicts_with = "personality",
            help = "Big Five scores instead of a personality: O,C,E,A,N (0-100 each)."
        )]
        traits: Option<BigFiveTraits>,
        #[arg(long, value_enum)]
        mood: Mood,
        #[arg(long, value_enum)]
        room: Room,
        #[arg(long, value_enum)]
        style: Style,
        #[arg(long, value_enum)]
        budget: Budget,
        #[arg(long, default_value = "", help = "Architectural features or dimensions to incorporate.")]
        features: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Generate an architectural concept with exterior and floor plan images.
    Concept {
        #[arg(long, help = "Core emotion, e.g. Serenity.")]
        emotion: String,
        #[arg(long, help = "Location, e.g. \"Hyderabad, Telangana, India\".")]
        location: String,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    #[arg(long, help = "Directory to write the generated images into.")]
    out: Option<PathBuf>,
    #[arg(long, help = "Print the result as JSON instead of a text report.")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for environment variables like API keys)
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG (e.g., RUST_LOG=info,emotispace=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Without a credential nothing can run.
    let config = GeminiConfig::from_env().context("Configuration error")?;
    info!(?config, "Loaded configuration");
    let orchestrator = Arc::new(Orchestrator::from_config(config));

    match cli.command {
        Commands::Serve { port } => {
            info!("Starting EmotiSpace on port {}...", port);
            tokio::select! {
                res = web_server::start_web_server(port, orchestrator) => res?,
                _ = tokio::signal::ctrl_c() => info!("Ctrl-C received, shutting down."),
            }
        }
        Commands::Design {
            personality,
            traits,
            mood,
            room,
            style,
            budget,
            features,
            output,
        } => {
            let personality = personality
                .or_else(|| traits.map(|t| t.personality()))
                .context("either --personality or --traits is required")?;
            let request = RunRequest::Interior(DesignOptions {
                personality,
                mood,
                room,
                style,
                budget,
                features,
            });
            let result = orchestrator.run(request).await?;
            emit(&result, &output).await?;
        }
        Commands::Concept {
            emotion,
            location,
            output,
        } => {
            let options = ConceptOptions::new(emotion, location);
            options.validate()?;
            let result = orchestrator.run(RunRequest::Architecture(options)).await?;
            emit(&result, &output).await?;
        }
    }

    Ok(())
}

async fn emit(result: &RunResult, output: &OutputArgs) -> Result<()> {
    if let Some(dir) = &output.out {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        match result {
            RunResult::Interior(result) => {
                write_image(dir, DESIGN_IMAGE_FILE, &result.image).await?;
            }
            RunResult::Architecture(result) => {
                write_image(dir, EXTERIOR_IMAGE_FILE, &result.exterior).await?;
                write_image(dir, FLOOR_PLAN_IMAGE_FILE, &result.floor_plan).await?;
            }
        }
    }

    if output.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print!("{}", render_result(result));
    }
    Ok(())
}

async fn write_image(dir: &Path, name: &str, image: &GeneratedImage) -> Result<()> {
    let path = dir.join(name);
    tokio::fs::write(&path, &image.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
