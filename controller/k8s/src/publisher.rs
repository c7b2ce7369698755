//! Idempotent ConfigMap publishing.

use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::{
    api::{Api, PostParams},
    Client,
};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Key under which the manifest is stored in the ConfigMap.
const CONFIG_KEY: &str = "config.yml";

/// Result of a publish attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Unchanged,
}

/// Writes the rendered manifest into a single ConfigMap, creating it when
/// absent and rewriting it only when the content digest changed.
#[derive(Clone)]
pub struct Publisher {
    client: Client,
    namespace: String,
    name: String,
}

impl Publisher {
    pub fn new(client: Client, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Publishes the manifest. API failures are surfaced to the caller;
    /// retrying is the next scan cycle's job.
    pub async fn publish(&self, manifest: &str) -> Result<Outcome> {
        let api = Api::<ConfigMap>::namespaced(self.client.clone(), &self.namespace);

        let existing = api
            .get_opt(&self.name)
            .await
            .with_context(|| format!("get configmap {}/{}", self.namespace, self.name))?;

        let Some(mut configmap) = existing else {
            api.create(&PostParams::default(), &self.render_configmap(manifest))
                .await
                .with_context(|| format!("create configmap {}/{}", self.namespace, self.name))?;
            tracing::info!(namespace = %self.namespace, name = %self.name, "created configmap");
            return Ok(Outcome::Created);
        };

        if content_unchanged(&configmap, manifest) {
            tracing::debug!(
                namespace = %self.namespace,
                name = %self.name,
                "configmap already up to date"
            );
            return Ok(Outcome::Unchanged);
        }

        // Only the data field is rewritten; everything else on the object
        // is carried over as-is.
        configmap.data = Some(manifest_data(manifest));
        api.replace(&self.name, &PostParams::default(), &configmap)
            .await
            .with_context(|| format!("update configmap {}/{}", self.namespace, self.name))?;
        tracing::info!(namespace = %self.namespace, name = %self.name, "updated configmap");
        Ok(Outcome::Updated)
    }

    fn render_configmap(&self, manifest: &str) -> ConfigMap {
        ConfigMap {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                namespace: Some(self.namespace.clone()),
                ..Default::default()
            },
            data: Some(manifest_data(manifest)),
            ..Default::default()
        }
    }
}

fn manifest_data(manifest: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(CONFIG_KEY.to_string(), manifest.to_string())])
}

/// Digest equality over the exact bytes of the stored and proposed text.
fn content_unchanged(configmap: &ConfigMap, manifest: &str) -> bool {
    let stored = configmap
        .data
        .as_ref()
        .and_then(|data| data.get(CONFIG_KEY))
        .map(String::as_str)
        .unwrap_or("");
    digest(stored) == digest(manifest)
}

fn digest(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stored(manifest: &str) -> ConfigMap {
        ConfigMap {
            data: Some(manifest_data(manifest)),
            ..Default::default()
        }
    }

    #[test]
    fn digest_is_stable_and_content_sensitive() {
        assert_eq!(digest("services:\n"), digest("services:\n"));
        assert_ne!(digest("services:\n"), digest("services: []\n"));
        // sha256 of the empty string.
        assert_eq!(
            digest(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn identical_content_is_unchanged() {
        // A second publish of the same text must decide "no write".
        let manifest = "title: \"Home Dashboard\"\nservices:\n";
        assert!(content_unchanged(&stored(manifest), manifest));
    }

    #[test]
    fn differing_content_requires_a_write() {
        let manifest = "title: \"Home Dashboard\"\nservices:\n";
        assert!(!content_unchanged(&stored("title: \"Old\"\n"), manifest));
    }

    #[test]
    fn missing_key_requires_a_write() {
        let configmap = ConfigMap::default();
        assert!(!content_unchanged(&configmap, "services:\n"));

        // Unless the proposed manifest is itself empty.
        assert!(content_unchanged(&configmap, ""));
    }
}
