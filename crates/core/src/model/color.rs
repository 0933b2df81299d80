use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fixed palette for tagging skills.
///
/// The palette is closed: store documents carry the lowercase name and are
/// rejected during mapping if the name is not one of these eight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    #[default]
    Blue,
    Purple,
    Green,
    Red,
    Yellow,
    Indigo,
    Pink,
    Teal,
}

impl ColorTag {
    /// Every palette color, in presentation order.
    pub const PALETTE: [ColorTag; 8] = [
        ColorTag::Blue,
        ColorTag::Purple,
        ColorTag::Green,
        ColorTag::Red,
        ColorTag::Yellow,
        ColorTag::Indigo,
        ColorTag::Pink,
        ColorTag::Teal,
    ];

    /// Lowercase name used in serialized documents.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTag::Blue => "blue",
            ColorTag::Purple => "purple",
            ColorTag::Green => "green",
            ColorTag::Red => "red",
            ColorTag::Yellow => "yellow",
            ColorTag::Indigo => "indigo",
            ColorTag::Pink => "pink",
            ColorTag::Teal => "teal",
        }
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown color tag: {0}")]
pub struct ParseColorError(String);

impl FromStr for ColorTag {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorTag::PALETTE
            .iter()
            .copied()
            .find(|color| color.as_str() == s)
            .ok_or_else(|| ParseColorError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_palette_color_round_trips_through_its_name() {
        for color in ColorTag::PALETTE {
            assert_eq!(color.as_str().parse::<ColorTag>().unwrap(), color);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!("bg-blue-500".parse::<ColorTag>().is_err());
        assert!("".parse::<ColorTag>().is_err());
    }

    #[test]
    fn default_is_blue() {
        assert_eq!(ColorTag::default(), ColorTag::Blue);
    }
}
