//! The scan-render-publish reconciliation loop.

use crate::{core, k8s};
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::time::{self, Duration};
use tracing::{debug, error, info, warn};

pub(crate) struct Reconciler {
    client: k8s::Client,
    filter: core::FilterSpec,
    settings: core::DashboardSettings,
    publisher: k8s::Publisher,
}

impl Reconciler {
    pub(crate) fn new(
        client: k8s::Client,
        filter: core::FilterSpec,
        settings: core::DashboardSettings,
        publisher: k8s::Publisher,
    ) -> Self {
        Self {
            client,
            filter,
            settings,
            publisher,
        }
    }

    /// Runs scan cycles until shutdown, pausing for `interval` after each
    /// cycle completes. A failed cycle is logged and never stops the loop.
    pub(crate) async fn run(self, interval: Duration) -> Result<()> {
        let mut shutdown = Shutdown::new()?;
        loop {
            if let Err(error) = self.run_once().await {
                error!(%error, "scan failed; will retry after interval");
            }
            debug!(seconds = interval.as_secs(), "sleeping until next scan");
            tokio::select! {
                _ = time::sleep(interval) => {}
                _ = shutdown.recv() => {
                    info!("shutdown signal received");
                    return Ok(());
                }
            }
        }
    }

    /// One full scan cycle: fetch, filter, extract, render, publish.
    ///
    /// Listing failures degrade (default group resolution, or an empty
    /// route set); render and publish failures fail the cycle.
    pub(crate) async fn run_once(&self) -> Result<()> {
        info!("starting scan");

        let namespaces = match k8s::fetch_namespaces(&self.client).await {
            Ok(namespaces) => namespaces,
            Err(error) => {
                warn!(%error, "failed to list namespaces; groups fall back to defaults");
                core::NamespaceMap::new()
            }
        };

        let routes = match k8s::fetch_routes(&self.client).await {
            Ok(routes) => routes,
            Err(error) => {
                error!(%error, "failed to list httproutes");
                Vec::new()
            }
        };
        debug!(count = routes.len(), "found httproutes");

        let mut cache = core::GroupIconCache::default();
        let items = routes
            .iter()
            .filter(|route| self.filter.admits(route))
            .filter_map(|route| core::extract(route, &namespaces, &mut cache))
            .collect::<Vec<_>>();

        let groups = items
            .iter()
            .map(|item| item.group.as_str())
            .collect::<BTreeSet<_>>();
        info!(
            services = items.len(),
            groups = groups.len(),
            "collected services"
        );

        let manifest = core::render(items, &self.settings).context("render config")?;
        let outcome = self
            .publisher
            .publish(&manifest)
            .await
            .context("sync configmap")?;

        info!(?outcome, "scan complete");
        Ok(())
    }
}

/// Latched SIGINT/SIGTERM streams; signals arriving mid-cycle are observed
/// at the next poll.
struct Shutdown {
    interrupt: Signal,
    terminate: Signal,
}

impl Shutdown {
    fn new() -> Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt()).context("install SIGINT handler")?,
            terminate: signal(SignalKind::terminate()).context("install SIGTERM handler")?,
        })
    }

    async fn recv(&mut self) {
        tokio::select! {
            _ = self.interrupt.recv() => {}
            _ = self.terminate.recv() => {}
        }
    }
}
