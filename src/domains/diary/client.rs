//! Account client.
//!
//! [`DiaryClient`] is constructed once at process start and shared by every
//! tool call. It holds no per-request state: each call fetches fresh data
//! from its [`DiarySource`].

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::stream::{self, Stream};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::cookies::CookieStore;
use super::error::{DiaryError, DiaryResult};
use super::http::HttpDiarySource;
use super::model::Day;
use crate::core::config::DiaryConfig;

/// Something that can produce one day's complete diary record.
#[async_trait]
pub trait DiarySource: Send + Sync {
    /// Fetch the record for `date`.
    async fn fetch_day(&self, date: NaiveDate) -> DiaryResult<Day>;
}

/// Façade over an authenticated [`DiarySource`].
#[derive(Clone)]
pub struct DiaryClient {
    source: Arc<dyn DiarySource>,
}

impl DiaryClient {
    /// Wrap an already-authenticated source.
    pub fn new(source: Arc<dyn DiarySource>) -> Self {
        Self { source }
    }

    /// Authenticate against the remote service.
    ///
    /// Credentials come from `MFP_COOKIES` when it parses to a non-empty
    /// map, otherwise from the exported browser cookie file. Fails when
    /// neither yields a session or the service rejects it.
    pub async fn connect(config: &DiaryConfig) -> DiaryResult<Self> {
        let cookies = load_session_cookies(config)?;
        let source = HttpDiarySource::connect(config, &cookies).await?;
        Ok(Self::new(Arc::new(source)))
    }

    /// Fetch one day's complete record. Errors are passed through untouched.
    pub async fn fetch_day(&self, date: NaiveDate) -> DiaryResult<Day> {
        self.source.fetch_day(date).await
    }

    /// Fetch every day from `start` to `end` inclusive, in ascending order.
    ///
    /// Each day is fetched only when the stream is polled for it. A day
    /// whose fetch fails is skipped so one bad day does not abort the range.
    pub fn fetch_range(&self, start: NaiveDate, end: NaiveDate) -> impl Stream<Item = Day> + '_ {
        stream::unfold(Some(start), move |cursor| async move {
            let mut current = cursor?;
            loop {
                if current > end {
                    return None;
                }
                let next = current.succ_opt();
                match self.source.fetch_day(current).await {
                    Ok(day) => return Some((day, next)),
                    Err(e) => {
                        debug!("Skipping {}: {}", current, e);
                        current = next?;
                    }
                }
            }
        })
    }
}

/// Pick the session cookies: environment first, exported file second.
pub fn load_session_cookies(config: &DiaryConfig) -> DiaryResult<CookieStore> {
    if let Some(store) = CookieStore::from_env_json(config.cookies_json.as_deref()) {
        info!("Using {} cookies from MFP_COOKIES", store.len());
        return Ok(store);
    }

    match CookieStore::from_export_file(&config.cookie_file) {
        Ok(Some(store)) => {
            info!(
                "Using {} cookies from {}",
                store.len(),
                config.cookie_file.display()
            );
            Ok(store)
        }
        Ok(None) => Err(DiaryError::MissingCredentials {
            cookie_file: config.cookie_file.clone(),
        }),
        Err(e) => {
            warn!("{}", e);
            Err(e)
        }
    }
}
