// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::TryFrom;
use std::fmt;

use colorous::Gradient;
use serde::de::{Deserialize, Deserializer, Error as _};

const GRADIENTS: &[(&str, Gradient)] = &[
    ("blues", colorous::BLUES),
    ("blue_green", colorous::BLUE_GREEN),
    ("blue_purple", colorous::BLUE_PURPLE),
    ("brown_green", colorous::BROWN_GREEN),
    ("cividis", colorous::CIVIDIS),
    ("cool", colorous::COOL),
    ("cubehelix", colorous::CUBEHELIX),
    ("greens", colorous::GREENS),
    ("green_blue", colorous::GREEN_BLUE),
    ("greys", colorous::GREYS),
    ("inferno", colorous::INFERNO),
    ("magma", colorous::MAGMA),
    ("oranges", colorous::ORANGES),
    ("orange_red", colorous::ORANGE_RED),
    ("pink_green", colorous::PINK_GREEN),
    ("plasma", colorous::PLASMA),
    ("purples", colorous::PURPLES),
    ("purple_blue", colorous::PURPLE_BLUE),
    ("purple_blue_green", colorous::PURPLE_BLUE_GREEN),
    ("purple_green", colorous::PURPLE_GREEN),
    ("purple_orange", colorous::PURPLE_ORANGE),
    ("purple_red", colorous::PURPLE_RED),
    ("rainbow", colorous::RAINBOW),
    ("reds", colorous::REDS),
    ("red_blue", colorous::RED_BLUE),
    ("red_grey", colorous::RED_GREY),
    ("red_purple", colorous::RED_PURPLE),
    ("red_yellow_blue", colorous::RED_YELLOW_BLUE),
    ("red_yellow_green", colorous::RED_YELLOW_GREEN),
    ("sinebow", colorous::SINEBOW),
    ("spectral", colorous::SPECTRAL),
    ("turbo", colorous::TURBO),
    ("viridis", colorous::VIRIDIS),
    ("warm", colorous::WARM),
    ("yellow_green", colorous::YELLOW_GREEN),
    ("yellow_green_blue", colorous::YELLOW_GREEN_BLUE),
    ("yellow_orange_brown", colorous::YELLOW_ORANGE_BROWN),
    ("yellow_orange_red", colorous::YELLOW_ORANGE_RED),
];

/// One of the [`colorous`] gradients, chosen by name.
///
/// Names are case-insensitive, and spaces or dashes can be used in place of underscores.
#[derive(Clone, Copy)]
pub(crate) struct GradientName {
    name: &'static str,
    gradient: Gradient,
}

impl GradientName {
    pub(crate) fn gradient(&self) -> Gradient {
        self.gradient
    }
}

impl TryFrom<String> for GradientName {
    type Error = String;

    fn try_from(requested: String) -> Result<Self, Self::Error> {
        let normalized = requested
            .trim()
            .to_lowercase()
            .replace(|c: char| c == ' ' || c == '-', "_");
        GRADIENTS
            .iter()
            .find(|(known, _)| *known == normalized)
            .map(|&(name, gradient)| Self { name, gradient })
            .ok_or_else(|| format!("unknown color gradient {:?}", requested))
    }
}

impl<'de> Deserialize<'de> for GradientName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let requested = String::deserialize(deserializer)?;
        Self::try_from(requested).map_err(D::Error::custom)
    }
}

impl fmt::Debug for GradientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GradientName").field(&self.name).finish()
    }
}

impl PartialEq for GradientName {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

#[cfg(test)]
mod test {
    use std::convert::TryFrom;

    use super::GradientName;

    fn name(name: &str) -> Result<GradientName, String> {
        GradientName::try_from(name.to_string())
    }

    #[test]
    fn separators_and_case() {
        let expected = name("red_yellow_blue").unwrap();
        for variant in &["RED YELLOW BLUE", "Red-Yellow-Blue", " red yellow_blue "] {
            assert_eq!(name(variant).unwrap(), expected, "{:?}", variant);
        }
        assert_ne!(name("turbo").unwrap(), expected);
    }

    #[test]
    fn unknown_gradient() {
        let err = name("Not A Gradient").unwrap_err();
        assert!(err.contains("Not A Gradient"));
    }

    #[test]
    fn from_toml() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            palette: GradientName,
        }
        let parsed: Wrapper = toml::from_str("palette = \"Inferno\"").unwrap();
        assert_eq!(parsed.palette, name("inferno").unwrap());
        assert!(toml::from_str::<Wrapper>("palette = \"mauve\"").is_err());
    }
}
