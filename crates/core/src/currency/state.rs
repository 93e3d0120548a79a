//! Per-session locale, currency and exchange-rate state.
//!
//! A [`CurrencyState`] starts with configured defaults and is resolved once:
//!
//! ```text
//! culture:  ?culture= ──▶ ?cc= ──▶ geolocation country ──▶ Accept-Language ──▶ default
//! currency: ?currency= (stop) ──▶ geolocation currency ──▶ culture's region data
//! rate:     forced refresh unless the currency is USD
//! ```
//!
//! Every step degrades silently; `is_ready` always ends up true.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use localprice_shared::{CurrencyCode, CurrencySettings, ProviderSettings};

use super::context::RequestOverrides;
use super::culture::culture_for_country;
use super::error::CurrencyError;
use super::format::{CurrencyFormat, checked_convert_amount, convert_amount, format_currency};
use super::provider::{GeoLocation, JsonFetcher, RatesResponse, geolocation_url, rates_url};
use super::rate::RateCache;
use super::region::region_for;

type LoadTask = Shared<BoxFuture<'static, ()>>;

/// Point-in-time copy of the observable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencySnapshot {
    /// Resolved culture, e.g. `pt-BR`.
    pub culture_name: String,
    /// Uppercase ISO 4217 code.
    pub currency_code: CurrencyCode,
    /// Symbol used when formatting.
    pub currency_symbol: String,
    /// USD→local multiplier, always positive.
    pub usd_to_local: Decimal,
    /// Whether resolution has finished.
    pub is_ready: bool,
    /// Last successful rate fetch.
    pub last_rate_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct Fields {
    culture_name: String,
    currency_code: CurrencyCode,
    currency_symbol: String,
    rate: RateCache,
}

struct Inner {
    fields: RwLock<Fields>,
    ready: AtomicBool,
    load_task: Mutex<Option<LoadTask>>,
    fetcher: Arc<dyn JsonFetcher>,
    overrides: RequestOverrides,
    settings: CurrencySettings,
    providers: ProviderSettings,
}

/// Sets the ready flag when dropped, including during unwinding.
struct MarkReadyOnDrop<'a>(&'a AtomicBool);

impl Drop for MarkReadyOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Locale, currency and USD rate for one request scope.
///
/// Cloning is cheap and every clone shares the same state, so concurrent
/// handlers in a scope can each call [`CurrencyState::ensure_loaded`].
#[derive(Clone)]
pub struct CurrencyState {
    inner: Arc<Inner>,
}

impl CurrencyState {
    /// Creates an unresolved state seeded from `settings`.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn JsonFetcher>,
        overrides: RequestOverrides,
        settings: CurrencySettings,
        providers: ProviderSettings,
    ) -> Self {
        let currency_code = CurrencyCode::new(&settings.default_currency).unwrap_or_else(|err| {
            warn!(error = %err, "invalid default currency, using USD");
            CurrencyCode::usd()
        });

        let fields = Fields {
            culture_name: settings.default_culture.clone(),
            currency_code,
            currency_symbol: settings.default_symbol.clone(),
            rate: RateCache::new(),
        };

        Self {
            inner: Arc::new(Inner {
                fields: RwLock::new(fields),
                ready: AtomicBool::new(false),
                load_task: Mutex::new(None),
                fetcher,
                overrides,
                settings,
                providers,
            }),
        }
    }

    /// Resolves locale, currency and rate exactly once.
    ///
    /// The first call starts resolution on the tokio runtime; every call,
    /// concurrent or later, waits for that same run. Never fails.
    pub async fn ensure_loaded(&self) {
        let task = {
            let mut slot = self
                .inner
                .load_task
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            slot.get_or_insert_with(|| self.start_resolution()).clone()
        };
        task.await;
    }

    fn start_resolution(&self) -> LoadTask {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move { inner.resolve().await });
        async move {
            if let Err(err) = handle.await {
                warn!(error = %err, "currency resolution task failed");
            }
        }
        .boxed()
        .shared()
    }

    /// Refreshes the USD rate for the current currency.
    ///
    /// Without `force`, a rate younger than the configured TTL is kept.
    /// Failures keep the previous rate.
    pub async fn refresh_rate(&self, force: bool) {
        self.inner.refresh_rate(force).await;
    }

    /// Converts a USD amount and renders it in the resolved locale.
    #[must_use]
    pub fn format(&self, usd_amount: Decimal) -> String {
        let (format, rate) = self.currency_format();
        let local = convert_amount(usd_amount, rate, format.conventions.fraction_digits);
        format_currency(local, &format)
    }

    /// Converts a USD amount, rounded to the locale's fraction digits.
    ///
    /// Saturates at the `Decimal` range; see [`CurrencyState::checked_convert`].
    #[must_use]
    pub fn convert(&self, usd_amount: Decimal) -> Decimal {
        let (format, rate) = self.currency_format();
        convert_amount(usd_amount, rate, format.conventions.fraction_digits)
    }

    /// Converts a USD amount, or `None` if the current rate overflows it.
    #[must_use]
    pub fn checked_convert(&self, usd_amount: Decimal) -> Option<Decimal> {
        let (format, rate) = self.currency_format();
        checked_convert_amount(usd_amount, rate, format.conventions.fraction_digits)
    }

    fn currency_format(&self) -> (CurrencyFormat, Decimal) {
        let fields = self.inner.read();
        let format = CurrencyFormat::for_culture(
            &fields.culture_name,
            fields.currency_symbol.clone(),
            &self.inner.settings.default_culture,
        );
        (format, fields.rate.usd_to_local())
    }

    /// Resolved culture identifier.
    #[must_use]
    pub fn culture_name(&self) -> String {
        self.inner.read().culture_name.clone()
    }

    /// Resolved currency code.
    #[must_use]
    pub fn currency_code(&self) -> CurrencyCode {
        self.inner.read().currency_code.clone()
    }

    /// Resolved currency symbol.
    #[must_use]
    pub fn currency_symbol(&self) -> String {
        self.inner.read().currency_symbol.clone()
    }

    /// Current USD→local multiplier.
    #[must_use]
    pub fn usd_to_local(&self) -> Decimal {
        self.inner.read().rate.usd_to_local()
    }

    /// Time of the last successful rate fetch.
    #[must_use]
    pub fn last_rate_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().rate.last_rate_at()
    }

    /// Whether resolution has finished.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::Acquire)
    }

    /// Copies every observable field at once.
    #[must_use]
    pub fn snapshot(&self) -> CurrencySnapshot {
        let fields = self.inner.read();
        CurrencySnapshot {
            culture_name: fields.culture_name.clone(),
            currency_code: fields.currency_code.clone(),
            currency_symbol: fields.currency_symbol.clone(),
            usd_to_local: fields.rate.usd_to_local(),
            is_ready: self.is_ready(),
            last_rate_at: fields.rate.last_rate_at(),
        }
    }
}

impl std::fmt::Debug for CurrencyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrencyState")
            .field("snapshot", &self.snapshot())
            .field("overrides", &self.inner.overrides)
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn read(&self) -> RwLockReadGuard<'_, Fields> {
        self.fields.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Fields> {
        self.fields.write().unwrap_or_else(PoisonError::into_inner)
    }

    async fn resolve(&self) {
        let _ready = MarkReadyOnDrop(&self.ready);

        let forced_culture = self.overrides.forced_culture();
        if let Some(culture) = &forced_culture {
            debug!(culture = %culture, "culture set by request");
            self.write().culture_name.clone_from(culture);
        }

        if let Some(code) = self.overrides.forced_currency() {
            info!(currency = %code, "currency set by request, skipping geolocation");
            {
                let mut fields = self.write();
                fields.currency_code = code;
                apply_region(&mut fields, false);
            }
            self.refresh_rate(true).await;
            return;
        }

        match self.geolocate().await {
            Some(location) => self.apply_geolocation(&location, forced_culture.is_some()),
            None => self.apply_local_hints(forced_culture.is_some()),
        }

        let code = self.read().currency_code.clone();
        if !code.is_usd() {
            self.refresh_rate(true).await;
        }

        let fields = self.read();
        info!(
            culture = %fields.culture_name,
            currency = %fields.currency_code,
            rate = %fields.rate.usd_to_local(),
            "currency resolved"
        );
    }

    async fn geolocate(&self) -> Option<GeoLocation> {
        let url = geolocation_url(&self.providers.geo_url, self.overrides.client_ip);
        let timeout = Duration::from_millis(self.settings.geo_timeout_ms);

        match self
            .fetch_json(&url, timeout)
            .await
            .and_then(GeoLocation::from_json)
        {
            Ok(location) => {
                debug!(
                    country = ?location.country(),
                    currency = ?location.currency(),
                    "geolocation succeeded"
                );
                Some(location)
            }
            Err(err) => {
                warn!(error = %err, "geolocation failed, falling back to Accept-Language");
                None
            }
        }
    }

    /// A culture set by `culture` or `cc` outranks the geolocated country.
    fn apply_geolocation(&self, location: &GeoLocation, culture_forced: bool) {
        let mut fields = self.write();
        if !culture_forced && let Some(country) = location.country() {
            fields.culture_name = culture_for_country(country).to_string();
        }

        match location.currency().and_then(|c| CurrencyCode::new(c).ok()) {
            Some(code) => {
                fields.currency_code = code;
                apply_region(&mut fields, false);
            }
            None => apply_region(&mut fields, true),
        }
    }

    fn apply_local_hints(&self, culture_forced: bool) {
        let mut fields = self.write();
        if !culture_forced {
            fields.culture_name = self
                .overrides
                .preferred_language()
                .unwrap_or_else(|| self.settings.default_culture.clone());
        }
        apply_region(&mut fields, true);
    }

    async fn refresh_rate(&self, force: bool) {
        let (code, cache) = {
            let fields = self.read();
            (fields.currency_code.clone(), fields.rate)
        };

        if !force && cache.is_fresh(Utc::now(), self.rate_ttl()) {
            debug!(currency = %code, "exchange rate still fresh");
            return;
        }

        match self.fetch_rate(&code).await {
            Ok(rate) => {
                self.write().rate.accept(rate, Utc::now());
                info!(currency = %code, rate = %rate, "exchange rate updated");
            }
            Err(err) => {
                warn!(currency = %code, error = %err, "exchange rate refresh failed, keeping previous rate");
            }
        }
    }

    async fn fetch_rate(&self, code: &CurrencyCode) -> Result<Decimal, CurrencyError> {
        let url = rates_url(&self.providers.rates_url, code.as_str());
        let timeout = Duration::from_millis(self.settings.rate_timeout_ms);
        let body = self.fetch_json(&url, timeout).await?;
        RatesResponse::from_json(body)?.rate_for(code.as_str())
    }

    async fn fetch_json(&self, url: &str, timeout: Duration) -> Result<Value, CurrencyError> {
        tokio::time::timeout(timeout, self.fetcher.get_json(url, timeout))
            .await
            .map_err(|_| CurrencyError::Timeout {
                url: url.to_string(),
                millis: timeout.as_millis(),
            })?
    }

    fn rate_ttl(&self) -> TimeDelta {
        TimeDelta::from_std(Duration::from_secs(self.settings.rate_ttl_secs))
            .unwrap_or(TimeDelta::MAX)
    }
}

/// Copies the culture's region symbol, and its currency code when `with_code`.
///
/// Unknown cultures leave both fields as they were.
fn apply_region(fields: &mut Fields, with_code: bool) {
    match region_for(&fields.culture_name) {
        Ok(region) => {
            if with_code && let Ok(code) = CurrencyCode::new(region.currency_code) {
                fields.currency_code = code;
            }
            region.currency_symbol.clone_into(&mut fields.currency_symbol);
        }
        Err(err) => {
            debug!(error = %err, "no region data, keeping currency fields");
        }
    }
}
