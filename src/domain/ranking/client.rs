//! Rankings sub-client: per-theme trading-value rankings.

use crate::client::ThemeBoardClient;
use crate::domain::ranking::{self, ThemeRankings};
use crate::error::SdkError;
use crate::http::ThemeBoardHttp;
use crate::query::{QueryOptions, Subscription};
use crate::shared::MarketSegment;

pub struct Rankings<'a> {
    pub(crate) client: &'a ThemeBoardClient,
}

async fn fetch_by_theme(
    http: &ThemeBoardHttp,
    segment: MarketSegment,
) -> Result<ThemeRankings, SdkError> {
    let resp = http.get_volume_rank_by_theme(segment).await?;
    ThemeRankings::try_from((segment, resp))
        .map_err(|e| SdkError::invalid_response(ranking::rankings_key(segment), e))
}

impl<'a> Rankings<'a> {
    pub async fn by_theme(&self, segment: MarketSegment) -> Result<ThemeRankings, SdkError> {
        fetch_by_theme(&self.client.http, segment).await
    }

    /// Subscribe to the rankings of `segment`, polling while it trades.
    ///
    /// Each segment is a separate cache entry; switching segments means
    /// subscribing to the new one and dropping the old handle.
    pub fn watch_by_theme(
        &self,
        segment: MarketSegment,
    ) -> Result<Subscription<ThemeRankings>, SdkError> {
        self.watch_by_theme_with(segment, self.client.sync.ranking_options(segment))
    }

    pub fn watch_by_theme_with(
        &self,
        segment: MarketSegment,
        options: QueryOptions,
    ) -> Result<Subscription<ThemeRankings>, SdkError> {
        let http = self.client.http.clone();
        self.client.cache.subscribe(
            ranking::rankings_key(segment),
            move || {
                let http = http.clone();
                async move { fetch_by_theme(&http, segment).await }
            },
            options,
        )
    }

    /// Refetch the rankings of every subscribed segment.
    pub fn invalidate(&self) -> usize {
        self.client.cache.invalidate_matching("volume-rank-by-theme")
    }
}
