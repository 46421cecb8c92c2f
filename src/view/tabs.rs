//! Dashboard tabs.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Markets,
    Charts,
    Trending,
}

impl Tab {
    /// Display order.
    pub const ALL: [Tab; 3] = [Tab::Markets, Tab::Charts, Tab::Trending];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Markets => "Markets",
            Tab::Charts => "Charts",
            Tab::Trending => "Trending",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Markets => "Markets",
            Tab::Charts => "Charts",
            Tab::Trending => "Trending",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Tab::Markets => "Coins ranked by market capitalization",
            Tab::Charts => "Bitcoin price over the last 7 days",
            Tab::Trending => "Most searched coins on CoinGecko in the last 24 hours",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Markets => 0,
            Tab::Charts => 1,
            Tab::Trending => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Tab> {
        Tab::ALL.get(index).copied()
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
