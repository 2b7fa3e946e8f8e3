//! Fetch, match, dedup and notify for every watched site.
//!
//! A run has one [`RunContext`] holding the state shared by all site
//! workers: the dedup store and the "an alert went out" flag. [`Monitor`]
//! owns the context together with the fetcher and the notifier and drives
//! the run:
//!
//! 1. **Dispatch**: one worker per site, all running concurrently
//! 2. **Worker**: fetch → extract → dedup check → notify, strictly in order
//! 3. **Summary**: after every worker is done, post "No new openings found"
//!    if no alert was accepted by Slack
//!
//! Workers never fail the run. A page that cannot be fetched is logged and
//! the worker returns with nothing sent.

use crate::fetch::PageSource;
use crate::history::DedupStore;
use crate::models::{Candidate, Site};
use crate::notify::{ChatSink, Notifier};
use crate::scrapers;
use crate::utils::append_match_log;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, instrument};

/// Message posted when a run found nothing new.
pub const SUMMARY_MESSAGE: &str = "No new openings found";

/// State shared by the workers of one run.
#[derive(Debug)]
pub struct RunContext {
    store: DedupStore,
    alerted: AtomicBool,
}

impl RunContext {
    pub fn new(store: DedupStore) -> Self {
        Self {
            store,
            alerted: AtomicBool::new(false),
        }
    }

    pub fn should_emit(&self, fingerprint: &str) -> bool {
        self.store.should_emit(fingerprint)
    }

    /// Record that Slack accepted a match alert.
    pub fn mark_alerted(&self) {
        self.alerted.store(true, Ordering::SeqCst);
    }

    pub fn any_alerts_emitted(&self) -> bool {
        self.alerted.load(Ordering::SeqCst)
    }

    pub fn store(&self) -> &DedupStore {
        &self.store
    }
}

/// Outcome of [`Monitor::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of sites dispatched.
    pub sites: usize,
    /// Match alerts accepted by Slack.
    pub alerts: usize,
    /// Whether the summary message was accepted by Slack.
    pub summary_sent: bool,
}

pub struct Monitor<F, C> {
    fetcher: F,
    notifier: Notifier<C>,
    ctx: RunContext,
    matches_log: Option<String>,
    concurrency: Option<usize>,
}

impl<F, C> Monitor<F, C>
where
    F: PageSource,
    C: ChatSink,
{
    pub fn new(fetcher: F, sink: C, ctx: RunContext) -> Self {
        Self {
            fetcher,
            notifier: Notifier::new(sink),
            ctx,
            matches_log: None,
            concurrency: None,
        }
    }

    /// Append every emitted match line to `path`.
    pub fn with_matches_log(mut self, path: impl Into<String>) -> Self {
        self.matches_log = Some(path.into());
        self
    }

    /// Cap the number of sites scraped at once; `None` runs them all together.
    pub fn with_concurrency(mut self, limit: Option<usize>) -> Self {
        self.concurrency = limit;
        self
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    #[cfg(test)]
    pub fn notifier(&self) -> &Notifier<C> {
        &self.notifier
    }

    /// Dispatch every site, wait for all of them, then post the summary if
    /// nothing was alerted.
    #[instrument(level = "info", skip_all, fields(sites = sites.len()))]
    pub async fn run(&self, sites: &[Site]) -> RunSummary {
        let t0 = Instant::now();
        let alerts = self.dispatch(sites).await;

        let summary_sent = if self.ctx.any_alerts_emitted() {
            false
        } else {
            info!("No new openings; sending summary");
            self.notifier.send(SUMMARY_MESSAGE).await
        };

        info!(
            alerts,
            summary_sent,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Run complete"
        );
        RunSummary {
            sites: sites.len(),
            alerts,
            summary_sent,
        }
    }

    /// Run one worker per site and return the number of alerts sent.
    ///
    /// Workers are independent: no ordering between them, and one failing
    /// does not cancel the others.
    pub async fn dispatch(&self, sites: &[Site]) -> usize {
        let limit = self.concurrency.unwrap_or(sites.len()).max(1);
        debug!(limit, "Dispatching site workers");

        stream::iter(sites)
            .map(|site| self.run_site(site))
            .buffer_unordered(limit)
            .collect::<Vec<usize>>()
            .await
            .into_iter()
            .sum()
    }

    /// Scrape one site and alert on every new candidate.
    #[instrument(level = "info", skip_all, fields(site = site.name, kind = site.extractor.kind()))]
    pub async fn run_site(&self, site: &Site) -> usize {
        info!(url = site.url, "Scraping");

        let html = match self.fetcher.fetch(site.url).await {
            Ok(html) => html,
            Err(e) => {
                error!(url = site.url, error = %e, "Error visiting site");
                return 0;
            }
        };

        let candidates = scrapers::extract(site, &html);
        debug!(candidates = candidates.len(), "Extracted candidates");

        let mut sent = 0;
        for candidate in &candidates {
            if self.emit(candidate).await {
                sent += 1;
            }
        }
        sent
    }

    async fn emit(&self, candidate: &Candidate) -> bool {
        let fp = candidate.fingerprint();
        if !self.ctx.should_emit(&fp) {
            debug!(fingerprint = %fp, link = %candidate.link, "Already alerted within window");
            return false;
        }

        let msg = candidate.message();
        println!("{msg}");
        if let Some(path) = &self.matches_log {
            append_match_log(path, &msg);
        }

        let accepted = self.notifier.send(&msg).await;
        if accepted {
            self.ctx.mark_alerted();
        }
        accepted
    }
}
