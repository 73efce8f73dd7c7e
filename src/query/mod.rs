//! Query cache: keyed, deduplicated, self-refreshing server data.
//!
//! A [`QueryCache`] holds one entry per [`QueryKey`]. Subscribers to the same
//! key share a single fetch and a single stream of [`QuerySnapshot`]s. After
//! every completed fetch the entry re-arms its refresh timer from the
//! subscription's [`RefreshInterval`], which is evaluated against the
//! [`MarketClock`](crate::clock::MarketClock) each time.
//!
//! Results are gated by a per-key generation counter: only the most recently
//! issued fetch may update an entry, so a slow response can never overwrite
//! a newer one.

pub mod cache;
mod entry;
pub mod key;
pub mod options;
pub mod retry;
pub mod snapshot;
pub mod subscription;

pub use cache::QueryCache;
pub use key::QueryKey;
pub use options::{QueryOptions, RefreshInterval};
pub use retry::{RetryConfig, RetryPolicy};
pub use snapshot::{QuerySnapshot, QueryStatus};
pub use subscription::Subscription;
