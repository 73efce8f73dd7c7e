//! Themes sub-client: theme list and theme detail.

use crate::client::ThemeBoardClient;
use crate::domain::theme::{self, Theme, ThemeDetail};
use crate::error::SdkError;
use crate::http::ThemeBoardHttp;
use crate::query::{QueryOptions, Subscription};
use crate::shared::ThemeId;

/// Sub-client for theme operations.
pub struct Themes<'a> {
    pub(crate) client: &'a ThemeBoardClient,
}

async fn fetch_list(http: &ThemeBoardHttp) -> Result<Vec<Theme>, SdkError> {
    let resp = http.get_themes().await?;
    resp.into_iter()
        .map(|t| {
            Theme::try_from(t).map_err(|e| SdkError::invalid_response(theme::list_key(), e))
        })
        .collect()
}

async fn fetch_detail(http: &ThemeBoardHttp, id: &ThemeId) -> Result<ThemeDetail, SdkError> {
    if id.is_empty() {
        return Err(SdkError::Validation("theme id must not be empty".to_string()));
    }
    let resp = http.get_theme(id.as_str()).await?;
    ThemeDetail::try_from(resp)
        .map_err(|e| SdkError::invalid_response(theme::detail_key(id), e))
}

impl<'a> Themes<'a> {
    /// All themes, in backend order.
    pub async fn list(&self) -> Result<Vec<Theme>, SdkError> {
        fetch_list(&self.client.http).await
    }

    /// One theme with its member stocks.
    pub async fn get(&self, id: &ThemeId) -> Result<ThemeDetail, SdkError> {
        fetch_detail(&self.client.http, id).await
    }

    /// Subscribe to the theme list.
    pub fn watch_list(&self) -> Result<Subscription<Vec<Theme>>, SdkError> {
        self.watch_list_with(self.client.sync.theme_options())
    }

    pub fn watch_list_with(
        &self,
        options: QueryOptions,
    ) -> Result<Subscription<Vec<Theme>>, SdkError> {
        let http = self.client.http.clone();
        self.client.cache.subscribe(
            theme::list_key(),
            move || {
                let http = http.clone();
                async move { fetch_list(&http).await }
            },
            options,
        )
    }

    /// Subscribe to one theme's detail. An empty id yields a disabled
    /// (idle) subscription rather than a request.
    pub fn watch(&self, id: &ThemeId) -> Result<Subscription<ThemeDetail>, SdkError> {
        self.watch_with(id, self.client.sync.theme_options())
    }

    pub fn watch_with(
        &self,
        id: &ThemeId,
        options: QueryOptions,
    ) -> Result<Subscription<ThemeDetail>, SdkError> {
        let options = if id.is_empty() {
            options.enabled(false)
        } else {
            options
        };
        let http = self.client.http.clone();
        let owned = id.clone();
        self.client.cache.subscribe(
            theme::detail_key(id),
            move || {
                let http = http.clone();
                let id = owned.clone();
                async move { fetch_detail(&http, &id).await }
            },
            options,
        )
    }

    /// Force the theme list and every cached theme detail to refetch.
    pub fn invalidate(&self) -> usize {
        let cache = &self.client.cache;
        usize::from(cache.invalidate(&theme::list_key())) + cache.invalidate_matching("theme")
    }
}
