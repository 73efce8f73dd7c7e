//! Network URL constants for the ThemeBoard SDK.

/// Default backend origin (the dashboard proxies `/api` to the backend).
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Path prefix every REST resource lives under.
pub const API_PREFIX: &str = "/api";
