//! Presentation helpers over query snapshots.
//!
//! Everything here is a pure function of a [`QuerySnapshot`]: no I/O, no
//! cache access. Cached payloads are only read; derived orderings are copies.

use crate::domain::index::{IndexQuote, Indices};
use crate::domain::ranking::{StockRanking, ThemeRanking, ThemeRankings};
use crate::error::SdkError;
use crate::query::{QuerySnapshot, QueryStatus};
use crate::shared::fmt::{abbreviate_krw, format_index_level, format_price, format_rate};
use crate::shared::PriceDirection;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Stocks shown per theme on the dashboard.
pub const SECTION_LIMIT: usize = 4;

/// Stocks shown on a theme's own page.
pub const PAGE_LIMIT: usize = 15;

/// What a view should render for a query.
#[derive(Debug, Clone)]
pub enum ViewState<V> {
    /// Disabled and never fetched.
    Idle,
    /// First fetch in flight; nothing to show yet.
    Loading,
    Ready(V),
    /// Data from an earlier fetch; the latest one failed.
    Stale { data: V, error: Arc<SdkError> },
    /// Failed with no data to fall back on.
    Failed(Arc<SdkError>),
    /// Data arrived but the requested item is not in it.
    NotFound,
}

impl<V> ViewState<V> {
    pub fn data(&self) -> Option<&V> {
        match self {
            ViewState::Ready(v) | ViewState::Stale { data: v, .. } => Some(v),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ViewState::NotFound)
    }

    pub fn error(&self) -> Option<&SdkError> {
        match self {
            ViewState::Stale { error, .. } | ViewState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Maps a snapshot onto a view state. `project` returning `None` means the
/// requested item is missing from otherwise valid data.
pub fn project<T, V>(
    snapshot: &QuerySnapshot<T>,
    project: impl FnOnce(&T) -> Option<V>,
) -> ViewState<V> {
    match snapshot.data() {
        Some(data) => match project(data) {
            None => ViewState::NotFound,
            Some(view) => match (&snapshot.status, &snapshot.error) {
                (QueryStatus::Error, Some(error)) => ViewState::Stale {
                    data: view,
                    error: error.clone(),
                },
                _ => ViewState::Ready(view),
            },
        },
        None => match (&snapshot.status, &snapshot.error) {
            (QueryStatus::Error, Some(error)) => ViewState::Failed(error.clone()),
            (QueryStatus::Idle, _) => ViewState::Idle,
            _ => ViewState::Loading,
        },
    }
}

// ─── Stock rows ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct StockRowView {
    /// 1-based position within the displayed list.
    pub position: usize,
    pub code: String,
    pub name: String,
    pub price: String,
    /// `"▲+1.23%"`, `"▼-0.50%"`, or `"0.00%"`.
    pub change: String,
    pub trading_value: String,
    pub direction: PriceDirection,
}

impl StockRowView {
    pub fn new(position: usize, stock: &StockRanking) -> Self {
        let direction = stock.direction();
        let arrow = match direction {
            PriceDirection::Flat => "",
            other => other.arrow(),
        };
        Self {
            position,
            code: stock.code.to_string(),
            name: stock.name.clone(),
            price: format_price(stock.current_price),
            change: format!("{}{}", arrow, format_rate(stock.change_rate)),
            trading_value: abbreviate_krw(stock.trading_value),
            direction,
        }
    }
}

fn rows(stocks: &[StockRanking]) -> Vec<StockRowView> {
    stocks
        .iter()
        .enumerate()
        .map(|(i, s)| StockRowView::new(i + 1, s))
        .collect()
}

// ─── Theme section (dashboard) ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeSectionView {
    pub name: String,
    pub stocks: Vec<StockRowView>,
    pub total_trading_value: i64,
    pub total_trading_value_text: String,
}

impl ThemeSectionView {
    pub fn new(theme: &ThemeRanking) -> Self {
        let total = theme.total_trading_value();
        Self {
            name: theme.name.clone(),
            stocks: rows(theme.top_n(SECTION_LIMIT)),
            total_trading_value: total,
            total_trading_value_text: abbreviate_krw(total),
        }
    }
}

/// Dashboard sections for every theme with at least one ranked stock, in
/// backend order.
pub fn theme_sections(snapshot: &QuerySnapshot<ThemeRankings>) -> ViewState<Vec<ThemeSectionView>> {
    project(snapshot, |rankings| {
        Some(
            rankings
                .themes
                .iter()
                .filter(|t| !t.is_empty())
                .map(ThemeSectionView::new)
                .collect(),
        )
    })
}

/// The dashboard section for one theme.
pub fn theme_section(
    snapshot: &QuerySnapshot<ThemeRankings>,
    theme: &str,
) -> ViewState<ThemeSectionView> {
    project(snapshot, |rankings| rankings.get(theme).map(ThemeSectionView::new))
}

// ─── Theme page ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ThemePageView {
    pub name: String,
    pub stocks: Vec<StockRowView>,
}

pub fn theme_page(snapshot: &QuerySnapshot<ThemeRankings>, theme: &str) -> ViewState<ThemePageView> {
    project(snapshot, |rankings| {
        rankings.get(theme).map(|t| ThemePageView {
            name: t.name.clone(),
            stocks: rows(t.top_n(PAGE_LIMIT)),
        })
    })
}

// ─── Index bar ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct IndexItemView {
    pub name: String,
    pub level: String,
    /// Arrow plus absolute change, e.g. `"▲12.50"`.
    pub change: String,
    pub direction: PriceDirection,
}

impl IndexItemView {
    pub fn new(quote: &IndexQuote) -> Self {
        let direction = quote.direction();
        Self {
            name: quote.display_name().to_string(),
            level: format_index_level(quote.current_price),
            change: format!(
                "{}{}",
                direction.arrow(),
                format_index_level(quote.change_price.abs())
            ),
            direction,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexBarView {
    pub items: Vec<IndexItemView>,
    /// Quote time shown as "last updated"; `None` when there are no items.
    pub updated_at: Option<DateTime<Utc>>,
}

pub fn index_bar(snapshot: &QuerySnapshot<Indices>) -> ViewState<IndexBarView> {
    project(snapshot, |indices| {
        Some(IndexBarView {
            items: indices.items.iter().map(IndexItemView::new).collect(),
            updated_at: indices.updated_at(),
        })
    })
}
