//! Fallback tiers for the historical search.
//!
//! Tiers run from most to least specific. When a terminal is supplied, the
//! four terminal-scoped tiers are tried before the five terminal-less ones.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One level of the fallback search, reported back as `match_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// make, model, year and terminal.
    ExactWithTerminal,
    /// make, model and terminal.
    MakeModelWithTerminal,
    /// make, year and terminal.
    MakeYearWithTerminal,
    /// make and terminal.
    MakeWithTerminal,
    /// make, model and year.
    Exact,
    /// make and model.
    MakeAndModel,
    /// make and year.
    MakeAndYear,
    /// make.
    MakeOnly,
    /// year.
    YearOnly,
}

const TERMINAL_TIERS: [MatchTier; 4] = [
    MatchTier::ExactWithTerminal,
    MatchTier::MakeModelWithTerminal,
    MatchTier::MakeYearWithTerminal,
    MatchTier::MakeWithTerminal,
];

const BASE_TIERS: [MatchTier; 5] = [
    MatchTier::Exact,
    MatchTier::MakeAndModel,
    MatchTier::MakeAndYear,
    MatchTier::MakeOnly,
    MatchTier::YearOnly,
];

impl MatchTier {
    /// Tiers to try, in order.
    #[must_use]
    pub fn hierarchy(with_terminal: bool) -> Vec<Self> {
        let mut tiers = Vec::with_capacity(TERMINAL_TIERS.len() + BASE_TIERS.len());
        if with_terminal {
            tiers.extend_from_slice(&TERMINAL_TIERS);
        }
        tiers.extend_from_slice(&BASE_TIERS);
        tiers
    }

    /// Identifier reported to callers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExactWithTerminal => "exact_with_terminal",
            Self::MakeModelWithTerminal => "make_model_with_terminal",
            Self::MakeYearWithTerminal => "make_year_with_terminal",
            Self::MakeWithTerminal => "make_with_terminal",
            Self::Exact => "exact",
            Self::MakeAndModel => "make_and_model",
            Self::MakeAndYear => "make_and_year",
            Self::MakeOnly => "make_only",
            Self::YearOnly => "year_only",
        }
    }

    /// Returns true for the terminal-scoped tiers.
    #[must_use]
    pub const fn uses_terminal(self) -> bool {
        matches!(
            self,
            Self::ExactWithTerminal
                | Self::MakeModelWithTerminal
                | Self::MakeYearWithTerminal
                | Self::MakeWithTerminal
        )
    }

    const fn uses_make(self) -> bool {
        !matches!(self, Self::YearOnly)
    }

    const fn uses_model(self) -> bool {
        matches!(
            self,
            Self::ExactWithTerminal | Self::MakeModelWithTerminal | Self::Exact | Self::MakeAndModel
        )
    }

    const fn uses_year(self) -> bool {
        matches!(
            self,
            Self::ExactWithTerminal
                | Self::MakeYearWithTerminal
                | Self::Exact
                | Self::MakeAndYear
                | Self::YearOnly
        )
    }

    /// Filter this tier applies for `query`.
    #[must_use]
    pub fn criteria(self, query: &EstimateQuery) -> TierCriteria<'_> {
        TierCriteria {
            make: self.uses_make().then_some(query.make.as_str()),
            model: self.uses_model().then_some(query.model.as_str()),
            year: self.uses_year().then_some(query.year),
            terminal: if self.uses_terminal() {
                query.terminal()
            } else {
                None
            },
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle attributes to estimate for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateQuery {
    /// Manufacturer.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Model year.
    pub year: i32,
    /// Port terminal, if known.
    #[serde(default)]
    pub terminal: Option<String>,
}

impl EstimateQuery {
    /// Creates a query without a terminal.
    #[must_use]
    pub fn new(make: impl Into<String>, model: impl Into<String>, year: i32) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            year,
            terminal: None,
        }
    }

    /// Sets the terminal.
    #[must_use]
    pub fn with_terminal(mut self, terminal: impl Into<String>) -> Self {
        self.terminal = Some(terminal.into());
        self
    }

    /// Terminal to search on; a blank terminal counts as not supplied.
    #[must_use]
    pub fn terminal(&self) -> Option<&str> {
        self.terminal
            .as_deref()
            .filter(|terminal| !terminal.trim().is_empty())
    }

    /// Tiers to try for this query, in order.
    #[must_use]
    pub fn tiers(&self) -> Vec<MatchTier> {
        MatchTier::hierarchy(self.terminal().is_some())
    }
}

/// Equality filters for one tier; `None` fields are not constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierCriteria<'a> {
    /// Required make.
    pub make: Option<&'a str>,
    /// Required model.
    pub model: Option<&'a str>,
    /// Required year.
    pub year: Option<i32>,
    /// Required terminal.
    pub terminal: Option<&'a str>,
}

impl TierCriteria<'_> {
    /// Returns true if a vehicle with these attributes satisfies the filter.
    #[must_use]
    pub fn matches(&self, make: &str, model: &str, year: i32, terminal: Option<&str>) -> bool {
        self.make.is_none_or(|m| m == make)
            && self.model.is_none_or(|m| m == model)
            && self.year.is_none_or(|y| y == year)
            && self.terminal.is_none_or(|t| terminal == Some(t))
    }
}
