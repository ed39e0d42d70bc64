//! Dataset catalogue shared by the CLI commands.

use clap::ValueEnum;
use std::path::{Path, PathBuf};

/// A synchronizable dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Dataset {
    /// Price candles
    Candles,
    /// Open interest history
    OpenInterest,
    /// Funding-rate settlements
    FundingRate,
    /// Fear & Greed index readings
    FearGreed,
}

impl Dataset {
    /// The dataset name used in table and export file names.
    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Candles => "candles",
            Self::OpenInterest => "open_interest",
            Self::FundingRate => "funding_rate",
            Self::FearGreed => "fear_greed_index",
        }
    }

    /// Whether the dataset is keyed by trading pair. The Fear & Greed
    /// index is market-wide.
    pub(crate) const fn per_symbol(self) -> bool {
        !matches!(self, Self::FearGreed)
    }

    /// Path of the canonical table under `data_dir`.
    pub(crate) fn table_path(self, data_dir: &Path, symbol: &str) -> PathBuf {
        if self.per_symbol() {
            data_dir.join(format!("{}_{symbol}.csv", self.name()))
        } else {
            data_dir.join(format!("{}.csv", self.name()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_paths() {
        let dir = Path::new("data");
        assert_eq!(
            Dataset::OpenInterest.table_path(dir, "BTCUSDT"),
            Path::new("data/open_interest_BTCUSDT.csv")
        );
        assert_eq!(
            Dataset::FearGreed.table_path(dir, "BTCUSDT"),
            Path::new("data/fear_greed_index.csv")
        );
    }
}
