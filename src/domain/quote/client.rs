//! Quotes sub-client: single-stock quotes.

use crate::client::ThemeBoardClient;
use crate::domain::quote::{self, StockQuote};
use crate::error::SdkError;
use crate::http::ThemeBoardHttp;
use crate::query::{QueryOptions, Subscription};
use crate::shared::StockCode;

pub struct Quotes<'a> {
    pub(crate) client: &'a ThemeBoardClient,
}

async fn fetch_quote(http: &ThemeBoardHttp, code: &StockCode) -> Result<StockQuote, SdkError> {
    if code.is_empty() {
        return Err(SdkError::Validation("stock code must not be empty".to_string()));
    }
    let resp = http.get_stock_quote(code.as_str()).await?;
    StockQuote::try_from(resp)
        .map_err(|e| SdkError::invalid_response(quote::quote_key(code), e))
}

impl<'a> Quotes<'a> {
    pub async fn get(&self, code: &StockCode) -> Result<StockQuote, SdkError> {
        fetch_quote(&self.client.http, code).await
    }

    /// Subscribe to `code`, polling while the market is open.
    pub fn watch(&self, code: &StockCode) -> Result<Subscription<StockQuote>, SdkError> {
        self.watch_with(code, self.client.sync.quote_options())
    }

    /// Subscribe with explicit options. An empty code yields a disabled
    /// subscription.
    pub fn watch_with(
        &self,
        code: &StockCode,
        options: QueryOptions,
    ) -> Result<Subscription<StockQuote>, SdkError> {
        let options = if code.is_empty() {
            options.enabled(false)
        } else {
            options
        };
        let http = self.client.http.clone();
        let owned = code.clone();
        self.client.cache.subscribe(
            quote::quote_key(code),
            move || {
                let http = http.clone();
                let code = owned.clone();
                async move { fetch_quote(&http, &code).await }
            },
            options,
        )
    }
}
