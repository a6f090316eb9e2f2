//! Compile-time tables shared across the desk.

/// Stamped on every Signal and Draft for forward-compatibility tracking.
pub const CONFIG_VERSION: &str = "v1.0.1";

/// Official / regulatory sources (tier 1).
pub const OFFICIAL_DOMAINS: &[&str] = &[
    "binance.com",
    "okx.com",
    "sec.gov",
    "ethereum.org",
    "solana.com",
];

/// First-line media (tier 2).
pub const TIER1_MEDIA_DOMAINS: &[&str] = &[
    "coindesk.com",
    "theblock.co",
    "reuters.com",
    "bloomberg.com",
];

/// Second-line media and aggregators (tier 3). Anything else is community.
pub const TIER2_MEDIA_DOMAINS: &[&str] = &[
    "odaily.news",
    "foresightnews.pro",
    "panewslab.com",
];

/// Canned rejection reasons offered to operators.
pub const REJECT_REASONS: &[&str] = &[
    "Duplicate content",
    "Low credibility",
    "Low impact",
    "Risk too high",
    "Off topic",
    "Already known",
];
