//! Query snapshots: what subscribers observe.

use crate::error::SdkError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// Lifecycle status of a query entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStatus {
    /// Never fetched because the query is disabled.
    Idle,
    /// A fetch is in flight (prior data may still be present).
    Loading,
    /// The latest fetch succeeded.
    Success,
    /// The latest fetch failed (prior data may still be present).
    Error,
}

/// Immutable view of a query entry at one point in time.
pub struct QuerySnapshot<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<Arc<SdkError>>,
    /// When `data` was last replaced by a successful fetch.
    pub data_updated_at: Option<DateTime<Utc>>,
    /// When `error` was last set.
    pub error_updated_at: Option<DateTime<Utc>>,
}

impl<T> QuerySnapshot<T> {
    pub(crate) fn initial(enabled: bool) -> Self {
        Self {
            status: if enabled {
                QueryStatus::Loading
            } else {
                QueryStatus::Idle
            },
            data: None,
            error: None,
            data_updated_at: None,
            error_updated_at: None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_deref()
    }

    pub fn error(&self) -> Option<&SdkError> {
        self.error.as_deref()
    }

    /// Loading with nothing to show yet.
    pub fn is_initial_loading(&self) -> bool {
        self.status == QueryStatus::Loading && self.data.is_none()
    }

    /// Refreshing in the background over existing data.
    pub fn is_refetching(&self) -> bool {
        self.status == QueryStatus::Loading && self.data.is_some()
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    /// The latest fetch failed but earlier data is still available.
    pub fn is_stale_error(&self) -> bool {
        self.status == QueryStatus::Error && self.data.is_some()
    }
}

impl<T> Clone for QuerySnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            data_updated_at: self.data_updated_at,
            error_updated_at: self.error_updated_at,
        }
    }
}

impl<T> fmt::Debug for QuerySnapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySnapshot")
            .field("status", &self.status)
            .field("has_data", &self.data.is_some())
            .field("error", &self.error.as_ref().map(|e| e.to_string()))
            .field("data_updated_at", &self.data_updated_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status_follows_enabled() {
        assert_eq!(QuerySnapshot::<u32>::initial(true).status, QueryStatus::Loading);
        assert_eq!(QuerySnapshot::<u32>::initial(false).status, QueryStatus::Idle);
    }

    #[test]
    fn test_stale_error_needs_data() {
        let mut snap = QuerySnapshot::<u32>::initial(true);
        snap.status = QueryStatus::Error;
        snap.error = Some(Arc::new(SdkError::Other("boom".into())));
        assert!(!snap.is_stale_error());
        snap.data = Some(Arc::new(7));
        assert!(snap.is_stale_error());
        assert_eq!(snap.data(), Some(&7));
    }

    #[test]
    fn test_loading_flavours() {
        let mut snap = QuerySnapshot::<u32>::initial(true);
        assert!(snap.is_initial_loading());
        snap.data = Some(Arc::new(1));
        assert!(snap.is_refetching());
        assert!(!snap.is_initial_loading());
    }
}
