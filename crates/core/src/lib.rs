//! Core logic for localprice.
//!
//! No web dependencies live here. HTTP access goes through the
//! [`currency::JsonFetcher`] trait so callers choose the transport.
//!
//! # Modules
//!
//! - `currency` - Locale and currency resolution, USD rates, price formatting
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use localprice_core::currency::{CurrencyState, JsonFetcher, RequestOverrides};
//! use localprice_shared::AppConfig;
//! use rust_decimal_macros::dec;
//!
//! async fn price(fetcher: Arc<dyn JsonFetcher>, config: &AppConfig) -> String {
//!     let state = CurrencyState::new(
//!         fetcher,
//!         RequestOverrides::default(),
//!         config.currency.clone(),
//!         config.providers.clone(),
//!     );
//!     state.ensure_loaded().await;
//!     state.format(dec!(19.99))
//! }
//! ```

pub mod currency;
