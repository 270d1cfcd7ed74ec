mod cli;
mod config;
mod documents;
mod errors;
mod letter;
mod pipeline;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{CliArgs, Commands, ExtractArgs, GenerateArgs, OutputFormatArg, RenderArgs};
use crate::config::Config;
use crate::documents::pdf_text::{default_extractor, extract_resume_text};
use crate::documents::text_file::read_job_description;
use crate::letter::LetterConfig;
use crate::pipeline::{generate_from_files, GenerateParams};
use crate::render::{capability, default_renderer, text_to_pdf, RenderOutcome};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    let config = Config::from_env()?;

    // Initialize structured logging (stderr, so stdout stays clean for letters and JSON)
    tracing_subscriber::registry()
        .with(log_filter(args.log_level(), &config.rust_log))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let letter_config = LetterConfig::load_or_default(
        args.config
            .as_deref()
            .or(config.letter_config_path.as_deref()),
    )?;

    match args.command {
        Commands::Serve(serve) => {
            let config = Config {
                port: serve.port.unwrap_or(config.port),
                ..config
            };
            serve_http(config, letter_config).await
        }
        Commands::Generate(generate) => run_generate(&letter_config, &config, generate),
        Commands::Extract(extract) => run_extract(extract),
        Commands::Render(render) => run_render(render),
        Commands::Template => {
            println!("{}", letter_config.template.as_str());
            Ok(())
        }
    }
}

/// `--log-level`/`-v`/`-q` override `RUST_LOG`; without them `RUST_LOG` applies as a full filter.
fn log_filter(cli_level: Option<&str>, rust_log: &str) -> EnvFilter {
    let crate_directive = |level: &str| EnvFilter::new(format!("{}={level}", env!("CARGO_PKG_NAME")));
    match cli_level {
        Some(level) => crate_directive(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| crate_directive(rust_log)),
    }
}

async fn serve_http(config: Config, letter_config: LetterConfig) -> Result<()> {
    info!("Starting coverletter API v{}", env!("CARGO_PKG_VERSION"));

    let renderer = default_renderer();
    info!("{}", capability(renderer.as_ref()).message);
    info!("Writing letters under {}", config.output_dir.display());

    let state = AppState {
        config: config.clone(),
        letter_config: Arc::new(letter_config),
        renderer,
        extractor: Arc::new(default_extractor()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn generate_params(args: GenerateArgs, config: &Config) -> GenerateParams {
    GenerateParams {
        resume_pdf: args.resume,
        job_text: args.job,
        company: args.company,
        position: args.position,
        output: args.output,
        output_dir: args.output_dir.unwrap_or_else(|| config.output_dir.clone()),
        render_pdf: args.pdf,
    }
}

fn run_generate(letter_config: &LetterConfig, config: &Config, args: GenerateArgs) -> Result<()> {
    let renderer = default_renderer();
    let format = args.format;
    let report = generate_from_files(
        letter_config,
        &default_extractor(),
        renderer.as_ref(),
        generate_params(args, config),
    )?;

    match format {
        OutputFormatArg::Human => println!("{}", report.message()),
        OutputFormatArg::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    match &report.cover_letter.save {
        Some(save) if !save.is_saved() => anyhow::bail!("cover letter could not be saved"),
        _ => Ok(()),
    }
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    let is_pdf = args
        .path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    let (text, summary) = if is_pdf {
        let resume = extract_resume_text(&default_extractor(), &args.path)?;
        (resume.text, resume.summary)
    } else {
        let job = read_job_description(&args.path)?;
        (job.text, job.summary)
    };

    println!("{}", if args.summary { summary } else { text });
    Ok(())
}

fn run_render(args: RenderArgs) -> Result<()> {
    let renderer = default_renderer();
    if args.check {
        println!("{}", capability(renderer.as_ref()).message);
        return Ok(());
    }
    let Some(input) = args.input else {
        anyhow::bail!("a text file to render is required");
    };

    let outcome = text_to_pdf(renderer.as_ref(), &input, args.output.as_deref());
    println!("{}", outcome.message());
    match outcome {
        RenderOutcome::Failed { .. } => anyhow::bail!("PDF rendering failed"),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_dir_defaults_to_config() {
        let config = Config {
            output_dir: "letters".into(),
            ..Config::default()
        };
        let args = CliArgs::parse_from(["coverletter", "generate", "cv.pdf", "job.txt"]);
        let Commands::Generate(generate) = args.command else {
            panic!("Expected Generate command");
        };
        assert_eq!(generate_params(generate.clone(), &config).output_dir, config.output_dir);

        let overridden = GenerateArgs {
            output_dir: Some("elsewhere".into()),
            ..generate
        };
        assert_eq!(
            generate_params(overridden, &config).output_dir,
            std::path::PathBuf::from("elsewhere")
        );
    }

    #[test]
    fn test_cli_level_overrides_environment() {
        assert_eq!(log_filter(Some("warn"), "info").to_string(), "coverletter=warn");
        assert_eq!(log_filter(Some("debug"), "trace").to_string(), "coverletter=debug");
    }
}
