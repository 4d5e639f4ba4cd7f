//! Follower directory synchronization
//!
//! Enumerates every follower id via cursor pagination, then hydrates them into
//! full profiles in batches of 100 with a bounded number of batches in flight.
//!
//! ```text
//! list_page(None) ─► list_page(cursor) ─► ... ─► DirectorySnapshot (deduplicated)
//!                                                      │
//!                      batches(100) ─► buffered(limit) ─► AggregationResult
//! ```

use std::time::Instant;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument, warn};
use wxkit_domain::constants::{DIRECTORY_PAGE_SIZE, HYDRATION_BATCH_SIZE};
use wxkit_domain::{
    AggregationResult, DirectoryPage, DirectorySnapshot, HydrationRequest, HydrationResponse,
    Result, UserListResponse, UserRecord, WxError,
};

use super::ApiContext;
use crate::http::ApiRequest;

pub(crate) const USER_LIST_PATH: &str = "/cgi-bin/user/get";
pub(crate) const USER_BATCH_PATH: &str = "/cgi-bin/user/info/batchget";

/// Directory enumeration and hydration for one official account.
#[derive(Clone)]
pub struct DirectorySync {
    ctx: ApiContext,
    concurrency: usize,
}

impl DirectorySync {
    /// Concurrency comes from `hydration_concurrency` in the tenant config.
    pub fn new(ctx: ApiContext) -> Self {
        let concurrency = ctx.config().hydration_concurrency.max(1);
        Self { ctx, concurrency }
    }

    /// Override the number of hydration batches in flight (minimum 1).
    #[must_use]
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Fetch one listing page, starting after `cursor` when given.
    pub async fn list_page(&self, cursor: Option<&str>) -> Result<DirectoryPage> {
        let mut request = ApiRequest::get(self.ctx.url(USER_LIST_PATH));
        if let Some(cursor) = cursor {
            request = request.query("next_openid", cursor);
        }

        let response: UserListResponse = self.ctx.call(request).await?.into_json()?;
        let page = DirectoryPage::from(response);
        debug!(
            items = page.items.len(),
            total = page.total_count,
            has_next = page.next_cursor.is_some(),
            "directory page fetched"
        );
        Ok(page)
    }

    /// Walk the listing until the cursor runs out or `total_count` is covered.
    ///
    /// `total_count` is taken from the first page. The walk also stops on an
    /// empty page and once `pages * 10_000 >= total_count`, so a server that
    /// keeps handing out cursors cannot loop it forever.
    #[instrument(skip(self), fields(tenant = %self.ctx.config().app_id))]
    pub async fn enumerate_all(&self) -> Result<DirectorySnapshot> {
        let first = self.list_page(None).await?;
        let total_count = first.total_count;
        let mut identifiers = first.items;
        let mut cursor = first.next_cursor;
        let mut pages = 1usize;

        while let Some(next) = cursor.take() {
            if identifiers.len() >= total_count
                || pages.saturating_mul(DIRECTORY_PAGE_SIZE) >= total_count
            {
                break;
            }

            let page = self.list_page(Some(&next)).await?;
            pages += 1;
            if page.items.is_empty() {
                break;
            }
            identifiers.extend(page.items);
            cursor = page.next_cursor;
        }

        let snapshot = DirectorySnapshot::new(total_count, identifiers);
        info!(total_count, pages, unique = snapshot.len(), "directory enumerated");
        Ok(snapshot)
    }

    /// Hydrate up to 100 ids in one call.
    pub async fn hydrate_batch(&self, openids: &[String]) -> Result<Vec<UserRecord>> {
        if openids.is_empty() {
            return Ok(Vec::new());
        }
        if openids.len() > HYDRATION_BATCH_SIZE {
            return Err(WxError::InvalidInput(format!(
                "at most {HYDRATION_BATCH_SIZE} ids per hydration call, got {}",
                openids.len()
            )));
        }

        let body = HydrationRequest::new(openids, &self.ctx.config().lang);
        let response: HydrationResponse = self.ctx.post(USER_BATCH_PATH, &body).await?;
        Ok(response.user_info_list)
    }

    /// Hydrate every id of `snapshot`, all or nothing.
    ///
    /// Records come back in batch-submission order. The first failing batch
    /// aborts the others and is reported as [`WxError::Aggregation`].
    #[instrument(skip(self, snapshot), fields(ids = snapshot.len(), concurrency = self.concurrency))]
    pub async fn hydrate_all(&self, snapshot: &DirectorySnapshot) -> Result<AggregationResult> {
        let started = Instant::now();
        let batches: Vec<&[String]> = snapshot.batches(HYDRATION_BATCH_SIZE).collect();
        let batch_count = batches.len();

        let hydrated: Vec<Vec<UserRecord>> =
            stream::iter(batches.into_iter().enumerate().map(|(index, batch)| async move {
                self.hydrate_batch(batch).await.map_err(|err| {
                    warn!(batch = index + 1, batches = batch_count, error = %err, "hydration batch failed");
                    WxError::Aggregation {
                        batch: index + 1,
                        batches: batch_count,
                        message: err.to_string(),
                    }
                })
            }))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let records: Vec<UserRecord> = hydrated.into_iter().flatten().collect();
        debug!(batches = batch_count, records = records.len(), "hydration complete");
        Ok(AggregationResult::new(records, elapsed_millis(started)))
    }

    /// Enumerate then hydrate; `elapsed_millis` covers both phases.
    #[instrument(skip(self), fields(tenant = %self.ctx.config().app_id))]
    pub async fn sync_all(&self) -> Result<AggregationResult> {
        let started = Instant::now();
        let snapshot = self.enumerate_all().await?;
        let hydrated = self.hydrate_all(&snapshot).await?;

        let result = AggregationResult::new(hydrated.records, elapsed_millis(started));
        info!(count = result.count, elapsed_millis = result.elapsed_millis, "directory synchronised");
        Ok(result)
    }
}

fn elapsed_millis(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
