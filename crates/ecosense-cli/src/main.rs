use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ecosense_analysis::{
    AnalysisError, Analyzer, AnalyzerOptions, PageTypeRequest, ProductPageRequest, StubSearch,
    SustainabilityRequest,
};
use ecosense_llm::GeminiClient;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ecosense-cli")]
#[command(about = "Run one EcoSense analysis against the configured model and print the JSON result")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify a page and assess its main product from saved HTML.
    Analyze {
        #[arg(long)]
        url: String,
        /// File holding the page's HTML.
        #[arg(long)]
        html_file: PathBuf,
    },
    /// Decide from the URL alone whether it is a product detail page.
    PageType {
        #[arg(long)]
        url: String,
    },
    /// Assess a product by title and brand using looked-up sources.
    Sustainability {
        #[arg(long)]
        title: String,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Analyze { .. } => "analyze",
            Commands::PageType { .. } => "page-type",
            Commands::Sustainability { .. } => "sustainability",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ecosense_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let invoker = GeminiClient::from_config(&config)
        .map_err(|e| anyhow::anyhow!("failed to build model client: {e}"))?;
    let analyzer = Analyzer::new(
        Arc::new(invoker),
        Arc::new(StubSearch),
        AnalyzerOptions::from(&config),
    );

    let command = cli.command.name();
    tracing::info!(command, model = %config.llm_model, "running analysis");
    let output = run(&analyzer, cli.command).await.inspect_err(|e| {
        tracing::error!(command, error = %e, "analysis failed");
    })?;
    tracing::info!(command, "analysis complete");
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(analyzer: &Analyzer, command: Commands) -> anyhow::Result<serde_json::Value> {
    let value = match command {
        Commands::Analyze { url, html_file } => {
            let html = std::fs::read_to_string(&html_file)
                .with_context(|| format!("failed to read {}", html_file.display()))?;
            let analysis = analyzer
                .analyze_product_page(ProductPageRequest {
                    url: Some(url),
                    html_content: Some(html),
                })
                .await
                .map_err(describe)?;
            serde_json::to_value(analysis)?
        }
        Commands::PageType { url } => {
            let result = analyzer
                .check_page_type(PageTypeRequest {
                    product_url: Some(url),
                })
                .await
                .map_err(describe)?;
            serde_json::to_value(result)?
        }
        Commands::Sustainability { title, brand, url } => {
            let data = analyzer
                .analyze_sustainability(SustainabilityRequest {
                    product_title: Some(title),
                    brand_name: brand,
                    product_url: url,
                })
                .await
                .map_err(describe)?;
            serde_json::to_value(data)?
        }
    };
    Ok(value)
}

fn describe(err: AnalysisError) -> anyhow::Error {
    anyhow::anyhow!(err.public_message())
}
