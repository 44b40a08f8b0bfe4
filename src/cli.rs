//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_AZURE_API_VERSION, DEFAULT_AZURE_IMAGE_DEPLOYMENT, DEFAULT_GEMINI_MODEL,
};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "STUDIO_DEBUG")]
    /// Enable debug logging. Env: STUDIO_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "8000", env = "STUDIO_PORT")]
    /// http listener, defaults to `8000`.
    /// Env: STUDIO_PORT
    pub port: NonZeroU16,
    #[clap(long, short, default_value = "localhost", env = "STUDIO_LISTEN_ADDRESS")]
    /// Listen address, defaults to `localhost`.
    /// Env: STUDIO_LISTEN_ADDRESS
    pub listen_address: String,
    #[clap(long, env = "STUDIO_ALLOWED_ORIGINS", value_delimiter = ',')]
    /// CORS origins, comma separated. Empty allows any origin.
    /// Env: STUDIO_ALLOWED_ORIGINS
    pub allowed_origins: Vec<String>,

    #[clap(long, env = "AZURE_OPENAI_API_KEY", hide_env_values = true)]
    /// Azure OpenAI key used for image generation.
    pub azure_openai_api_key: String,
    #[clap(long, env = "AZURE_OPENAI_ENDPOINT")]
    /// Azure OpenAI resource endpoint, eg `https://myresource.openai.azure.com/`.
    pub azure_openai_endpoint: String,
    #[clap(long, default_value = DEFAULT_AZURE_API_VERSION, env = "AZURE_OPENAI_API_VERSION")]
    /// Azure OpenAI REST API version.
    pub azure_openai_api_version: String,
    #[clap(long, default_value = DEFAULT_AZURE_IMAGE_DEPLOYMENT, env = "AZURE_OPENAI_IMAGE_DEPLOYMENT")]
    /// Name of the image model deployment.
    pub azure_image_deployment: String,

    #[clap(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    /// Gemini key used for all text completions.
    pub gemini_api_key: String,
    #[clap(long, default_value = DEFAULT_GEMINI_MODEL, env = "GEMINI_MODEL")]
    /// Gemini model name.
    pub gemini_model: String,

    #[clap(long, env = "TAVILY_API_KEY", hide_env_values = true)]
    /// Tavily key used for search, site mapping and crawling.
    pub tavily_api_key: String,

    #[clap(long, env = "THUMBNAIL_FONT_PATH")]
    /// Font used for text overlays, eg `/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf`.
    /// Env: THUMBNAIL_FONT_PATH
    pub font_path: Option<PathBuf>,

    #[clap(long, env = "STUDIO_SYSTEM_PROMPTS")]
    /// JSON file replacing the bundled system prompts.
    /// Env: STUDIO_SYSTEM_PROMPTS
    pub system_prompts: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 9] = [
        "creatorstudio",
        "--azure-openai-api-key",
        "az-key",
        "--azure-openai-endpoint",
        "https://example.openai.azure.com/",
        "--gemini-api-key",
        "gem-key",
        "--tavily-api-key",
        "tv-key",
    ];

    #[test]
    fn defaults_apply() {
        let cli = CliOptions::try_parse_from(REQUIRED).expect("parse");
        assert_eq!(cli.port.get(), 8000);
        assert_eq!(cli.listen_address, "localhost");
        assert_eq!(cli.azure_openai_api_version, "2024-02-01");
        assert_eq!(cli.azure_image_deployment, "dall-e-3");
        assert_eq!(cli.gemini_model, "gemini-2.5-flash");
        assert!(cli.font_path.is_none());
    }

    #[test]
    fn origins_split_on_commas() {
        let mut args = REQUIRED.to_vec();
        args.extend(["--allowed-origins", "http://localhost:5173,http://127.0.0.1:3000"]);
        let cli = CliOptions::try_parse_from(args).expect("parse");
        assert_eq!(
            cli.allowed_origins,
            vec!["http://localhost:5173", "http://127.0.0.1:3000"]
        );
    }
}
