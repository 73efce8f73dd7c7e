//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the backend sends, so they can be used directly in wire types
//! without conversion overhead.

pub mod fmt;
pub mod serde_util;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── ThemeId ─────────────────────────────────────────────────────────────────

/// Newtype for theme identifiers (UUIDs on the backend).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThemeId(String);

impl ThemeId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for ThemeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ThemeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ThemeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Serialize for ThemeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ThemeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ThemeId(s))
    }
}

// ─── StockCode ───────────────────────────────────────────────────────────────

/// A six-digit KRX short code (e.g. `"005930"`).
///
/// Serializes transparently as a JSON string. Can be used as a HashMap key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StockCode(String);

impl StockCode {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for StockCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for StockCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for StockCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Serialize for StockCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StockCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(StockCode(s))
    }
}

// ─── MarketSegment ───────────────────────────────────────────────────────────

/// Which venue's trading to include.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketSegment {
    /// Every venue combined.
    #[default]
    #[serde(rename = "ALL")]
    All,
    /// Korea Exchange regular session.
    #[serde(rename = "KRX")]
    Krx,
    /// Nextrade alternative venue.
    #[serde(rename = "NXT")]
    Nxt,
}

impl MarketSegment {
    pub const ALL_SEGMENTS: [MarketSegment; 3] =
        [MarketSegment::All, MarketSegment::Krx, MarketSegment::Nxt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Krx => "KRX",
            Self::Nxt => "NXT",
        }
    }
}

impl std::fmt::Display for MarketSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MarketSegment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "KRX" => Ok(Self::Krx),
            "NXT" => Ok(Self::Nxt),
            other => Err(format!("unknown market segment: {other}")),
        }
    }
}

// ─── PriceDirection ──────────────────────────────────────────────────────────

/// Sign of a price change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceDirection {
    Up,
    Down,
    Flat,
}

impl PriceDirection {
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            Self::Up
        } else if change < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }

    /// Korean market convention: rising red, falling blue.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Up => "red",
            Self::Down => "blue",
            Self::Flat => "gray",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
            Self::Flat => "-",
        }
    }
}
