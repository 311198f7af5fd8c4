use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::storage::{KeyValueStore, STREAK_CACHE_KEY, scoped_key};

const REQUEST_TIMEOUT_SECS: u64 = 5;

/// The streak as the remote service last told it to us. `effective_streak`
/// already has the service's missed-day decay applied; this crate never
/// recomputes that rule, it only caches and displays the value. The same
/// shape is used on the wire and in the local cache.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    #[serde(rename = "effectiveStreak")]
    pub effective_streak: u32,
    #[serde(rename = "lastWinDate", default)]
    pub last_win_date: Option<NaiveDate>,
}

#[derive(Debug, Error)]
pub enum StreakError {
    #[error("streak service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("streak service unavailable: {0}")]
    Unavailable(String),
}

/// The remote streak service boundary. The service is the single authority
/// for increment, duplicate-win and reset semantics.
pub trait StreakService {
    fn status(&self, player: &str) -> Result<StreakRecord, StreakError>;
    fn report_win(&self, player: &str, date: NaiveDate) -> Result<StreakRecord, StreakError>;
    fn report_reset(&self, player: &str) -> Result<(), StreakError>;
}

/// Blocking JSON client for the streak endpoints. No retries, no backoff:
/// a failed call is reported once and the caller falls back to its cache.
pub struct HttpStreakService {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpStreakService {
    pub fn new(base_url: &str) -> Result<Self, StreakError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl StreakService for HttpStreakService {
    fn status(&self, player: &str) -> Result<StreakRecord, StreakError> {
        let record = self
            .client
            .get(format!("{}/streak-status", self.base_url))
            .query(&[("player", player)])
            .send()?
            .error_for_status()?
            .json()?;
        Ok(record)
    }

    fn report_win(&self, player: &str, date: NaiveDate) -> Result<StreakRecord, StreakError> {
        let record = self
            .client
            .post(format!("{}/streak-win", self.base_url))
            .json(&json!({ "player": player, "dateISO": date }))
            .send()?
            .error_for_status()?
            .json()?;
        Ok(record)
    }

    fn report_reset(&self, player: &str) -> Result<(), StreakError> {
        self.client
            .post(format!("{}/streak-reset", self.base_url))
            .json(&json!({ "player": player }))
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

/// Keeps the displayed streak consistent with the service while staying
/// playable offline. The local cache is provisional: any successful
/// reconcile overwrites it wholesale.
pub struct StreakTracker {
    service: Option<Box<dyn StreakService>>,
    player: String,
    cache_key: String,
    record: StreakRecord,
    win_reported: bool,
}

impl StreakTracker {
    pub fn new(service: Option<Box<dyn StreakService>>, player: Option<&str>) -> Self {
        Self {
            service,
            player: player.unwrap_or("guest").to_string(),
            cache_key: scoped_key(player, STREAK_CACHE_KEY),
            record: StreakRecord::default(),
            win_reported: false,
        }
    }

    pub fn effective_streak(&self) -> u32 {
        self.record.effective_streak
    }

    pub fn record(&self) -> &StreakRecord {
        &self.record
    }

    /// Session-start reconciliation: adopt the service's answer and write it
    /// through to the cache; on failure keep whatever the cache last said.
    /// Never an error to the caller.
    pub fn reconcile(&mut self, store: &mut dyn KeyValueStore) {
        self.record = store
            .get(&self.cache_key)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        if let Some(service) = &self.service {
            match service.status(&self.player) {
                Ok(record) => {
                    self.record = record;
                    self.write_cache(store);
                }
                Err(e) => {
                    log::warn!("streak reconciliation failed, showing cached value: {e}");
                }
            }
        }
    }

    /// Report today's win at most once for the lifetime of this tracker,
    /// no matter how many times the win path fires. When the service cannot
    /// be reached the cache is bumped provisionally so the display is not
    /// stale; the service stays authoritative at the next reconcile.
    pub fn record_win(&mut self, store: &mut dyn KeyValueStore, today: NaiveDate) {
        if self.win_reported {
            return;
        }
        self.win_reported = true;

        let mut adopted = false;
        if let Some(service) = &self.service {
            match service.report_win(&self.player, today) {
                Ok(record) => {
                    self.record.effective_streak = record.effective_streak;
                    self.record.last_win_date = Some(today);
                    adopted = true;
                }
                Err(e) => {
                    log::warn!("win report failed, bumping streak locally: {e}");
                }
            }
        }
        if !adopted {
            self.record.effective_streak += 1;
            self.record.last_win_date = Some(today);
        }
        self.write_cache(store);
    }

    /// A loss zeroes the cached streak immediately, before and regardless of
    /// the reset call, so the UI never shows a stale nonzero streak. The
    /// reset report itself is fire-and-forget.
    pub fn record_loss(&mut self, store: &mut dyn KeyValueStore) {
        self.record = StreakRecord::default();
        self.write_cache(store);

        if let Some(service) = &self.service
            && let Err(e) = service.report_reset(&self.player)
        {
            log::warn!("streak reset report failed: {e}");
        }
    }

    fn write_cache(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(&self.record) {
            Ok(raw) => store.set(&self.cache_key, &raw),
            Err(e) => log::warn!("failed to encode streak cache: {e}"),
        }
    }
}
