//! Pagination control: drive fetch + extract across successive result
//! pages until a target count is reached or the page budget runs out.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::client::SourceClient;
use crate::extract::extract;
use crate::types::{CandidateRecord, ExternalSource};

/// Page budget and stop conditions for one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagePolicy {
    /// Stop once this many records have accumulated.
    pub target_count: usize,

    /// Hard cap on page fetches.
    pub max_pages: usize,

    /// Pause between page requests. A throttle to stay under anti-scraping
    /// defenses, not a correctness requirement.
    pub inter_page_delay: Duration,
}

impl Default for PagePolicy {
    /// The case-law default: five pages of roughly ten results each.
    fn default() -> Self {
        Self {
            target_count: 50,
            max_pages: 5,
            inter_page_delay: Duration::from_millis(200),
        }
    }
}

impl PagePolicy {
    /// Policy for sources without result pages: one fetch, no target.
    pub fn single_page() -> Self {
        Self {
            target_count: usize::MAX,
            max_pages: 1,
            inter_page_delay: Duration::ZERO,
        }
    }

    pub fn with_target_count(mut self, target_count: usize) -> Self {
        self.target_count = target_count;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_inter_page_delay(mut self, delay: Duration) -> Self {
        self.inter_page_delay = delay;
        self
    }
}

/// What one source's page loop produced.
#[derive(Debug, Default)]
pub struct PageHarvest {
    /// Records in first-seen order across pages.
    pub records: Vec<CandidateRecord>,

    /// Pages actually requested.
    pub pages_fetched: usize,

    /// True when the run deadline cut the loop short.
    pub timed_out: bool,

    /// Per-page failures, recorded rather than raised.
    pub errors: Vec<String>,
}

/// Drive pages `0..max_pages` sequentially for one source.
///
/// A failed page contributes zero records and does not abort the loop.
/// When `deadline` passes, in-flight work is abandoned and whatever has
/// accumulated is returned with `timed_out` set.
pub async fn paginate<C>(
    source: &ExternalSource,
    client: &C,
    policy: &PagePolicy,
    deadline: Option<Instant>,
) -> PageHarvest
where
    C: SourceClient + ?Sized,
{
    let mut harvest = PageHarvest::default();

    for page in 0..policy.max_pages {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            warn!(source = %source.name, page, "run deadline reached, abandoning remaining pages");
            harvest.timed_out = true;
            break;
        }

        let url = match source.page_url(page) {
            Ok(url) => url,
            Err(e) => {
                harvest.errors.push(format!("{}: bad page URL: {e}", source.name));
                break;
            }
        };

        let fetch = client.fetch(&url, source.headers);
        let body = match deadline {
            Some(d) => match tokio::time::timeout_at(d, fetch).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(source = %source.name, page, "fetch abandoned at run deadline");
                    harvest.timed_out = true;
                    break;
                }
            },
            None => fetch.await,
        };
        harvest.pages_fetched += 1;

        match body {
            Ok(text) => {
                let records = extract(&text, source);
                debug!(
                    source = %source.name,
                    page,
                    page_records = records.len(),
                    total = harvest.records.len() + records.len(),
                    "page extracted"
                );
                harvest.records.extend(records);
            }
            Err(e) => {
                warn!(source = %source.name, page, error = %e, "page fetch failed");
                harvest
                    .errors
                    .push(format!("{}: page {page}: {e}", source.name));
            }
        }

        if harvest.records.len() >= policy.target_count {
            break;
        }
        if page + 1 < policy.max_pages && !policy.inter_page_delay.is_zero() {
            tokio::time::sleep(policy.inter_page_delay).await;
        }
    }

    harvest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSourceClient;

    fn case_page(page: usize, per_page: usize) -> String {
        (0..per_page)
            .map(|i| {
                let id = page * 100 + i;
                format!(r#"<a href="/doc/{id}/">Accused No {id} vs State on 1 May, 2020</a>"#)
            })
            .collect()
    }

    #[tokio::test]
    async fn stops_early_once_target_reached() {
        let source = ExternalSource::case_search("302");
        let mut client = MockSourceClient::new();
        for page in 0..8 {
            client = client.with_response(source.page_url(page).unwrap(), case_page(page, 12));
        }

        let policy = PagePolicy::default()
            .with_target_count(50)
            .with_max_pages(8)
            .with_inter_page_delay(Duration::ZERO);
        let harvest = paginate(&source, &client, &policy, None).await;

        // ceil(50 / 12) = 5 pages, even though the budget allows 8
        assert_eq!(harvest.pages_fetched, 5);
        assert_eq!(client.fetch_count(), 5);
        assert_eq!(harvest.records.len(), 60);
        assert!(!harvest.timed_out);
    }

    #[tokio::test]
    async fn failed_page_contributes_zero_records_and_loop_continues() {
        let source = ExternalSource::case_search("420");
        // Page 1 has no canned response, so the mock answers 404.
        let client = MockSourceClient::new()
            .with_response(source.page_url(0).unwrap(), case_page(0, 3))
            .with_response(source.page_url(2).unwrap(), case_page(2, 3));

        let policy = PagePolicy::default()
            .with_max_pages(3)
            .with_inter_page_delay(Duration::ZERO);
        let harvest = paginate(&source, &client, &policy, None).await;

        assert_eq!(harvest.pages_fetched, 3);
        assert_eq!(harvest.records.len(), 6);
        assert_eq!(harvest.errors.len(), 1);
        assert!(harvest.errors[0].contains("page 1"));
    }

    #[tokio::test]
    async fn expired_deadline_returns_accumulated_records() {
        let source = ExternalSource::case_search("302");
        let mut client = MockSourceClient::new();
        for page in 0..5 {
            client = client.with_response(source.page_url(page).unwrap(), case_page(page, 2));
        }

        let policy = PagePolicy::default().with_inter_page_delay(Duration::ZERO);
        let deadline = Instant::now(); // already past
        let harvest = paginate(&source, &client, &policy, Some(deadline)).await;

        assert!(harvest.timed_out);
        assert_eq!(harvest.pages_fetched, 0);
        assert!(harvest.records.is_empty());
    }

    #[tokio::test]
    async fn single_page_policy_fetches_once() {
        let source = ExternalSource::case_search("302");
        let client =
            MockSourceClient::new().with_response(source.page_url(0).unwrap(), case_page(0, 4));

        let harvest = paginate(&source, &client, &PagePolicy::single_page(), None).await;

        assert_eq!(harvest.pages_fetched, 1);
        assert_eq!(harvest.records.len(), 4);
    }
}
