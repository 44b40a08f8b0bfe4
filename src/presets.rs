//! Named thumbnail looks, selectable by the preset endpoint.

use serde::{Serialize, Serializer};

/// A bundle of style, theme and extra prompt elements.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Preset {
    /// Lookup key, eg `tech`.
    #[serde(skip)]
    pub name: &'static str,
    /// Visual style handed to the prompt builder.
    pub style: &'static str,
    /// Theme/genre handed to the prompt builder.
    pub theme: &'static str,
    /// Extra things the image should contain.
    pub additional_elements: &'static [&'static str],
}

static PRESETS: [Preset; 6] = [
    Preset {
        name: "tech",
        style: "modern and professional",
        theme: "technology",
        additional_elements: &[
            "computer screens",
            "code",
            "tech gadgets",
            "blue/purple color scheme",
        ],
    },
    Preset {
        name: "gaming",
        style: "dynamic and energetic",
        theme: "gaming",
        additional_elements: &[
            "gaming controllers",
            "neon lights",
            "action effects",
            "bold colors",
        ],
    },
    Preset {
        name: "educational",
        style: "clean and informative",
        theme: "educational",
        additional_elements: &[
            "books",
            "learning materials",
            "bright lighting",
            "professional appearance",
        ],
    },
    Preset {
        name: "lifestyle",
        style: "bright and inspirational",
        theme: "lifestyle",
        additional_elements: &[
            "natural lighting",
            "modern decor",
            "positive atmosphere",
            "clean aesthetic",
        ],
    },
    Preset {
        name: "cooking",
        style: "appetizing and warm",
        theme: "food and cooking",
        additional_elements: &[
            "delicious food",
            "kitchen setting",
            "warm colors",
            "mouth-watering presentation",
        ],
    },
    Preset {
        name: "fitness",
        style: "energetic and motivational",
        theme: "fitness and health",
        additional_elements: &[
            "gym equipment",
            "active poses",
            "bright colors",
            "motivational atmosphere",
        ],
    },
];

/// Returns every preset in declaration order.
pub fn presets() -> &'static [Preset] {
    &PRESETS
}

/// Looks up a preset by name.
pub fn preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.name == name)
}

/// Comma-separated preset names, for error messages.
pub fn preset_names() -> String {
    PRESETS
        .iter()
        .map(|preset| preset.name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Serializes the presets as a name-keyed map, keeping declaration order.
#[derive(Clone, Copy, Debug, Default)]
pub struct PresetTable;

impl Serialize for PresetTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(PRESETS.iter().map(|preset| (preset.name, preset)))
    }
}
