//! HTTP client layer: `ThemeBoardHttp`, one request per call.

pub mod client;

pub use client::{ThemeBoardHttp, DEFAULT_TIMEOUT};
