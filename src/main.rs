use std::sync::Arc;

use clap::Parser;
use creatorstudio::clients::{AzureImageClient, GeminiClient, TavilyClient};
use creatorstudio::config::{load_env, setup_logging};
use creatorstudio::prompts::SystemPrompts;
use creatorstudio::research::ResearchPipeline;
use creatorstudio::thumbnail::{ThumbnailGenerator, load_font};
use creatorstudio::web::AppState;
use tracing::{error, info};

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let env_file = load_env();
    let cli = creatorstudio::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }
    if let Some(path) = env_file {
        info!("Loaded environment from {}", path.display());
    }

    let prompts = match cli.system_prompts.as_deref() {
        Some(path) => SystemPrompts::from_path(path),
        None => SystemPrompts::bundled(),
    };
    let prompts = match prompts {
        Ok(prompts) => prompts,
        Err(err) => {
            error!("Failed to load system prompts: {:#}", err);
            return;
        }
    };

    let http = reqwest::Client::new();
    let images = match AzureImageClient::new(
        http.clone(),
        &cli.azure_openai_api_key,
        &cli.azure_openai_endpoint,
        &cli.azure_image_deployment,
        &cli.azure_openai_api_version,
    ) {
        Ok(images) => images,
        Err(err) => {
            error!("Invalid Azure OpenAI configuration: {}", err);
            return;
        }
    };
    let model = GeminiClient::new(http.clone(), &cli.gemini_api_key, &cli.gemini_model);
    let web = TavilyClient::new(http, &cli.tavily_api_key);

    let font = load_font(cli.font_path.as_deref());

    let state = AppState::new(
        ThumbnailGenerator::new(Arc::new(images), font),
        ResearchPipeline::new(Arc::new(model), Arc::new(web), prompts),
    );

    if let Err(err) =
        creatorstudio::web::setup_server(&cli.listen_address, cli.port, &cli.allowed_origins, state)
            .await
    {
        error!("Application error: {}", err);
    }
}
