//! System prompts for the language model, bundled as JSON with an optional
//! on-disk override.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;

/// Key of the system instruction used when turning a request into a search query.
pub const SEARCH_QUERY_PROMPT: &str = "gemini_search";

/// Named system prompts.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SystemPrompts {
    prompts: BTreeMap<String, String>,
}

impl SystemPrompts {
    /// The prompts shipped with the binary.
    pub fn bundled() -> anyhow::Result<Self> {
        let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/system_prompts.json"));
        Self::parse(raw).context("Failed to parse bundled system prompts")
    }

    /// Reads prompts from a JSON object of `name: prompt` pairs.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn parse(raw: &str) -> anyhow::Result<Self> {
        let prompts: BTreeMap<String, String> = serde_json::from_str(raw)?;
        Ok(Self { prompts })
    }

    /// Returns the named prompt, or an empty string when it isn't defined.
    pub fn get(&self, name: &str) -> &str {
        self.prompts.get(name).map(String::as_str).unwrap_or_default()
    }
}

impl FromIterator<(String, String)> for SystemPrompts {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            prompts: iter.into_iter().collect(),
        }
    }
}
