//! Financial connotation of accounting terms.
//!
//! Terms like "הכנסות" (revenue) read as positive, "הוצאות" (expenses) as
//! negative. The classification drives the colour, icon and background
//! decoration of a term in the UI.

use serde::Serialize;

/// Direction a term points in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Favourable.
    Up,
    /// Unfavourable.
    Down,
    /// Neither.
    Neutral,
}

impl Trend {
    /// Returns `true` if the term gets a decorative background.
    #[must_use]
    pub const fn shows_background(self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

/// Styling for a classified term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connotation {
    /// Direction.
    pub trend: Trend,
    /// Text colour class.
    pub color_class: &'static str,
    /// Background class.
    pub bg_class: &'static str,
    /// Border class.
    pub border_class: &'static str,
    /// Icon name.
    pub icon: &'static str,
}

/// A keyword list and the styling it maps to.
#[derive(Debug, Clone, Copy)]
pub struct ConnotationRule {
    /// Substrings that select this rule.
    pub keywords: &'static [&'static str],
    /// Resulting styling.
    pub connotation: Connotation,
}

/// Revenue, assets, equity, profit.
pub const POSITIVE: ConnotationRule = ConnotationRule {
    keywords: &["הכנסות", "נכסים", "הון", "רווח", "זכות", "נכס"],
    connotation: Connotation {
        trend: Trend::Up,
        color_class: "text-emerald-400",
        bg_class: "bg-emerald-500/10",
        border_class: "border-emerald-500/30",
        icon: "trending-up",
    },
};

/// Expenses, liabilities, loss.
pub const NEGATIVE: ConnotationRule = ConnotationRule {
    keywords: &["הוצאות", "התחייבויות", "הפסד", "חובה", "התחייבות"],
    connotation: Connotation {
        trend: Trend::Down,
        color_class: "text-rose-400",
        bg_class: "bg-rose-500/10",
        border_class: "border-rose-500/30",
        icon: "trending-down",
    },
};

/// Styling for terms that match no keyword.
pub const NEUTRAL: Connotation = Connotation {
    trend: Trend::Neutral,
    color_class: "text-teal-400",
    bg_class: "bg-teal-500/10",
    border_class: "border-teal-500/30",
    icon: "activity",
};

/// Classifies a term by keyword.
///
/// The trimmed term is checked for positive keywords first, then negative
/// ones; the first substring hit wins. Everything else is neutral.
#[must_use]
pub fn classify(term: &str) -> Connotation {
    let term = term.trim();
    [POSITIVE, NEGATIVE]
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| term.contains(keyword)))
        .map_or(NEUTRAL, |rule| rule.connotation)
}
