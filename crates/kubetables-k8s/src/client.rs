use std::pin::Pin;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::AsyncBufRead;
use k8s_openapi::api::core::v1::Pod;
use kube::Api;
use kube::api::{ListParams, LogParams};
use kube::config::KubeConfigOptions;
use tracing::debug;

use kubetables_types::{ContainerInfo, PodInfo};

/// Byte stream of one container's log
pub type LogStream<'a> = Pin<Box<dyn AsyncBufRead + 'a>>;

/// Kubernetes client wrapper
pub struct KubeClient {
    client: kube::Client,
}

impl KubeClient {
    /// Connect using the named kubeconfig context, or infer the config
    /// (kubeconfig default loading rules, then in-cluster) when none is given
    pub async fn new(context: Option<&str>) -> Result<Self> {
        let config = match context {
            Some(context_name) => kube::Config::from_kubeconfig(&KubeConfigOptions {
                context: Some(context_name.to_string()),
                ..Default::default()
            })
            .await
            .context(format!(
                "Failed to create config for context: {}",
                context_name
            ))?,
            None => kube::Config::infer()
                .await
                .context("Failed to infer cluster config. Is kubectl configured?")?,
        };

        let client =
            kube::Client::try_from(config).context("Failed to create Kubernetes client")?;

        Ok(Self { client })
    }

    /// Fetch all pods in a namespace along with their declared containers
    pub async fn list_pods(&self, namespace: &str) -> Result<Vec<PodInfo>> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = pods
            .list(&ListParams::default())
            .await
            .context(format!("Failed to list pods in {}", namespace))?;

        debug!(namespace, count = list.items.len(), "listed pods");

        Ok(list
            .items
            .into_iter()
            .map(|pod| {
                let name = pod.metadata.name.unwrap_or_default();
                let mut info = PodInfo::new(name);

                if let Some(spec) = pod.spec {
                    info.containers = spec
                        .containers
                        .into_iter()
                        .map(|c| ContainerInfo::new(c.name))
                        .collect();
                }

                info
            })
            .collect())
    }

    /// Log handle for one container; nothing is requested until it is opened
    pub fn container_logs(
        &self,
        namespace: &str,
        pod_name: &str,
        container: &str,
        since: Option<Duration>,
    ) -> ContainerLogs {
        ContainerLogs {
            api: Api::namespaced(self.client.clone(), namespace),
            pod_name: pod_name.to_string(),
            params: LogParams {
                container: Some(container.to_string()),
                timestamps: true,
                since_seconds: since.and_then(since_seconds),
                ..Default::default()
            },
        }
    }
}

/// Where to read one container's log from
pub struct ContainerLogs {
    api: Api<Pod>,
    pod_name: String,
    params: LogParams,
}

impl ContainerLogs {
    /// Open a non-following, timestamped log stream.
    ///
    /// The stream borrows this handle and is closed when dropped.
    pub async fn open(&self) -> Result<LogStream<'_>> {
        let container = self.params.container.as_deref().unwrap_or_default();
        let stream = self
            .api
            .log_stream(&self.pod_name, &self.params)
            .await
            .context(format!(
                "Failed to open log stream for {}/{}",
                self.pod_name, container
            ))?;

        debug!(pod = %self.pod_name, container, "opened log stream");

        Ok(Box::pin(stream))
    }
}

/// Whole seconds for the `sinceSeconds` log parameter.
///
/// Fractional seconds are truncated. A zero window means "no limit"; a
/// non-zero window shorter than a second is raised to one second because the
/// API rejects zero.
pub fn since_seconds(since: Duration) -> Option<i64> {
    if since.is_zero() {
        return None;
    }
    Some(i64::try_from(since.as_secs()).unwrap_or(i64::MAX).max(1))
}
