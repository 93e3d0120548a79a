//! HTTP transport for localprice.
//!
//! Implements [`localprice_core::currency::JsonFetcher`] on top of `reqwest`.

pub mod fetcher;

pub use fetcher::ReqwestFetcher;
