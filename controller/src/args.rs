use crate::{
    core::{DashboardSettings, FilterSpec},
    k8s,
    sync::Reconciler,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::time::Duration;
use tracing::info;

const SA_NAMESPACE_FILE: &str = "/var/run/secrets/kubernetes.io/serviceaccount/namespace";

/// Generates a Homer dashboard configuration from Gateway API HTTPRoutes.
#[derive(Debug, Parser)]
#[clap(name = "homer-controller", version, about)]
pub struct Args {
    #[clap(long, env = "HOMER_CONTROLLER_LOG", default_value = "info")]
    log_level: kubert::LogFilter,

    #[clap(long, env = "HOMER_CONTROLLER_LOG_FORMAT", default_value = "plain")]
    log_format: kubert::LogFormat,

    /// Gateway names that admit routes (enables opt-out mode when set).
    #[clap(long, env = "HOMER_CONTROLLER_GATEWAY_NAMES", default_value = "")]
    gateway_names: NameList,

    /// Hostname suffixes that admit routes, e.g. `.home.example.com`
    /// (enables opt-out mode when set).
    #[clap(long, env = "HOMER_CONTROLLER_DOMAIN_SUFFIXES", default_value = "")]
    domain_suffixes: NameList,

    /// Name of the ConfigMap that receives the rendered configuration.
    #[clap(
        long,
        env = "HOMER_CONTROLLER_CONFIGMAP_NAME",
        default_value = "homer-config"
    )]
    configmap_name: String,

    /// Namespace of the ConfigMap; detected from the service account mount
    /// when empty.
    #[clap(long, env = "HOMER_CONTROLLER_CONFIGMAP_NAMESPACE", default_value = "")]
    configmap_namespace: String,

    /// Run continuously, rescanning on a fixed interval; set to false to
    /// exit after one scan.
    #[clap(
        long,
        env = "HOMER_CONTROLLER_DAEMON",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    daemon: bool,

    /// Seconds to pause between scans in daemon mode.
    #[clap(long, env = "HOMER_CONTROLLER_SCAN_INTERVAL", default_value = "300")]
    scan_interval: u64,

    /// Dashboard title.
    #[clap(
        long,
        env = "HOMER_CONTROLLER_TITLE",
        default_value = "Home Dashboard"
    )]
    title: String,

    /// Dashboard subtitle.
    #[clap(long, env = "HOMER_CONTROLLER_SUBTITLE", default_value = "")]
    subtitle: String,

    /// Number of service columns in the dashboard layout.
    #[clap(long, env = "HOMER_CONTROLLER_COLUMNS", default_value = "5")]
    columns: usize,

    /// Custom template file overriding the built-in one.
    #[clap(long, env = "HOMER_CONTROLLER_TEMPLATE_PATH")]
    template_path: Option<PathBuf>,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            gateway_names: NameList(gateway_names),
            domain_suffixes: NameList(domain_suffixes),
            configmap_name,
            configmap_namespace,
            daemon,
            scan_interval,
            title,
            subtitle,
            columns,
            template_path,
        } = self;

        log_format
            .try_init(log_level)
            .expect("must configure logging");

        let filter = FilterSpec {
            gateway_names,
            domain_suffixes,
        };
        let settings = DashboardSettings {
            title,
            subtitle,
            columns,
            template_path,
        };
        let configmap_namespace = if configmap_namespace.is_empty() {
            detect_namespace()
        } else {
            configmap_namespace
        };

        info!(
            daemon,
            interval = scan_interval,
            gateways = ?filter.gateway_names,
            domain_suffixes = ?filter.domain_suffixes,
            configmap_namespace = %configmap_namespace,
            configmap_name = %configmap_name,
            "homer-controller starting"
        );

        let client = kube::Client::try_default()
            .await
            .context("initialize kubernetes client")?;
        let publisher = k8s::Publisher::new(client.clone(), configmap_namespace, configmap_name);
        let reconciler = Reconciler::new(client, filter, settings, publisher);

        if daemon {
            reconciler.run(Duration::from_secs(scan_interval)).await
        } else {
            reconciler.run_once().await
        }
    }
}

/// Reads the pod's own namespace from the service-account volume mount,
/// falling back to `default`.
fn detect_namespace() -> String {
    std::fs::read_to_string(SA_NAMESPACE_FILE)
        .map(|ns| ns.trim().to_string())
        .unwrap_or_else(|_| "default".to_string())
}

/// Comma-separated name list, trimmed, with empty entries dropped.
#[derive(Clone, Debug, Default)]
struct NameList(Vec<String>);

impl std::str::FromStr for NameList {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(
            s.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_list_splits_and_trims() {
        let NameList(names) = " envoy, nginx ,,".parse().unwrap();
        assert_eq!(names, ["envoy", "nginx"]);
    }

    #[test]
    fn name_list_empty_input_is_empty() {
        let NameList(names) = "".parse().unwrap();
        assert!(names.is_empty());
    }
}
