//! # models::flow
//!
//! Institutional buy/sell flow ("chips" on the dashboard).
//!
//! The flow provider reports several sub-categories per trading date; they
//! collapse into three [`InstitutionalActor`]s before scaling to lots.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Shares per lot on the Taiwan exchange.
pub const SHARES_PER_LOT: i64 = 1000;

/// Class of large market participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstitutionalActor {
    /// Foreign institutional investors (外資)
    ForeignInvestor,
    /// Domestic investment trusts / mutual funds (投信)
    InvestmentTrust,
    /// Proprietary trading desks of securities dealers (自營商)
    Dealer,
}

impl InstitutionalActor {
    /// Display order of the chips table.
    pub const ALL: [InstitutionalActor; 3] = [
        InstitutionalActor::ForeignInvestor,
        InstitutionalActor::InvestmentTrust,
        InstitutionalActor::Dealer,
    ];

    /// Maps a provider sub-category name to its actor.
    ///
    /// `Foreign_Dealer_Self` is a foreign desk and `Dealer_Hedging` is still a
    /// dealer; unknown names (e.g. the `total` rows some datasets add) are
    /// ignored.
    pub fn from_provider_name(name: &str) -> Option<Self> {
        match name {
            "Foreign_Investor" | "Foreign_Dealer_Self" => Some(Self::ForeignInvestor),
            "Investment_Trust" => Some(Self::InvestmentTrust),
            "Dealer_self" | "Dealer_Hedging" | "Dealer" => Some(Self::Dealer),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ForeignInvestor => "外資",
            Self::InvestmentTrust => "投信",
            Self::Dealer => "自營商",
        }
    }
}

/// One row of the chips table. `val` is `None` when the data is unavailable,
/// which the frontend must render differently from a genuine zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipEntry {
    pub name: String,
    /// Net buy (positive) or sell (negative) in lots.
    pub val: Option<i64>,
}

/// Net flow per actor for the latest trading date available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstitutionalFlow {
    /// `None` when the provider returned nothing usable.
    pub as_of: Option<NaiveDate>,
    pub entries: Vec<ChipEntry>,
}

impl InstitutionalFlow {
    /// Every actor present, every value null.
    pub fn unavailable() -> Self {
        Self {
            as_of: None,
            entries: InstitutionalActor::ALL
                .iter()
                .map(|actor| ChipEntry { name: actor.label().to_string(), val: None })
                .collect(),
        }
    }
}
