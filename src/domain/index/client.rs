//! Indices sub-client.

use crate::client::ThemeBoardClient;
use crate::domain::index::{self, Indices};
use crate::error::SdkError;
use crate::http::ThemeBoardHttp;
use crate::query::{QueryOptions, Subscription};

pub struct IndicesClient<'a> {
    pub(crate) client: &'a ThemeBoardClient,
}

async fn fetch_indices(http: &ThemeBoardHttp) -> Result<Indices, SdkError> {
    Ok(Indices::from(http.get_indices().await?))
}

impl<'a> IndicesClient<'a> {
    pub async fn get(&self) -> Result<Indices, SdkError> {
        fetch_indices(&self.client.http).await
    }

    pub fn watch(&self) -> Result<Subscription<Indices>, SdkError> {
        self.watch_with(self.client.sync.index_options())
    }

    pub fn watch_with(&self, options: QueryOptions) -> Result<Subscription<Indices>, SdkError> {
        let http = self.client.http.clone();
        self.client.cache.subscribe(
            index::indices_key(),
            move || {
                let http = http.clone();
                async move { fetch_indices(&http).await }
            },
            options,
        )
    }
}
