//! # ThemeBoard SDK
//!
//! A Rust client SDK for the ThemeBoard stock-theme dashboard backend.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: Market clock, shared newtypes, domain models (no I/O)
//! 2. **HTTP API**: `ThemeBoardHttp`, one typed method per endpoint
//! 3. **Query Cache**: keyed, deduplicated, market-aware polling with snapshots
//! 4. **High-Level Client**: `ThemeBoardClient` with nested sub-clients
//! 5. **Views**: pure presentation helpers over snapshots
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use themeboard_sdk::prelude::*;
//!
//! let client = ThemeBoardClient::builder()
//!     .base_url("http://localhost:8000")
//!     .build()?;
//!
//! let mut rankings = client.rankings().watch_by_theme(MarketSegment::All)?;
//! let snap = rankings.wait_for(|s| !s.is_initial_loading()).await;
//! if let ViewState::Ready(sections) = theme_sections(&snap) {
//!     for section in sections {
//!         println!("{} {}", section.name, section.total_trading_value_text);
//!     }
//! }
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Trading calendar and market-open checks.
pub mod clock;

/// Domain modules (vertical slices): types, wire types, conversions, sub-clients.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

/// Synchronization settings and environment overrides.
pub mod config;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// HTTP client, one request per call.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: Query Cache ─────────────────────────────────────────────────────

/// Query cache: subscriptions, snapshots, refresh policies, retry.
pub mod query;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `ThemeBoardClient`, the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Layer 5: Views ───────────────────────────────────────────────────────────

/// Presentation helpers: top-N sections, formatting, view states.
pub mod view;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{MarketSegment, PriceDirection, StockCode, ThemeId};

    // Clock
    pub use crate::clock::{Clock, ManualClock, MarketClock, SystemClock, TradingCalendar};

    // Domain types
    pub use crate::domain::health::Health;
    pub use crate::domain::index::{IndexQuote, Indices, MarketIndex};
    pub use crate::domain::quote::StockQuote;
    pub use crate::domain::ranking::{StockRanking, ThemeRanking, ThemeRankings};
    pub use crate::domain::theme::{StockInTheme, Theme, ThemeDetail};

    // Errors
    pub use crate::error::{FetchErrorKind, HttpError, SdkError};

    // Network + config
    pub use crate::config::SyncConfig;
    pub use crate::network::DEFAULT_API_URL;

    // Query cache
    pub use crate::query::{
        QueryCache, QueryKey, QueryOptions, QuerySnapshot, QueryStatus, RefreshInterval,
        RetryConfig, RetryPolicy, Subscription,
    };

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        IndexClient, QuotesClient, RankingsClient, ThemeBoardClient, ThemeBoardClientBuilder,
        ThemesClient,
    };

    // Views
    pub use crate::view::{
        index_bar, theme_page, theme_section, theme_sections, IndexBarView, IndexItemView,
        StockRowView, ThemePageView, ThemeSectionView, ViewState, PAGE_LIMIT, SECTION_LIMIT,
    };
}
