//! cattag library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod core;
pub mod service;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Size variant requested from the image service (`?type=`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Xsmall,
    Small,
    #[default]
    Medium,
    Square,
}

impl ImageSize {
    /// Value sent in the `type` query parameter.
    pub fn as_query(self) -> &'static str {
        match self {
            ImageSize::Xsmall => "xsmall",
            ImageSize::Small => "small",
            ImageSize::Medium => "medium",
            ImageSize::Square => "square",
        }
    }
}
