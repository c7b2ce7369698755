//! Cluster-wide listing of namespaces and HTTPRoutes.

use anyhow::{Context, Result};
use homer_controller_core::{NamespaceMap, Route};
use k8s_gateway_api::HttpRoute;
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{Api, ListParams},
    Client, ResourceExt,
};

/// Lists all namespaces, keyed by name with their annotations.
pub async fn fetch_namespaces(client: &Client) -> Result<NamespaceMap> {
    let api = Api::<Namespace>::all(client.clone());
    let list = api
        .list(&ListParams::default())
        .await
        .context("list namespaces")?;

    Ok(list
        .into_iter()
        .map(|ns| {
            let name = ns.name_unchecked();
            let annotations = ns.metadata.annotations.unwrap_or_default();
            (name, annotations)
        })
        .collect())
}

/// Lists HTTPRoutes cluster-wide, snapshotting the fields the extractor
/// needs.
pub async fn fetch_routes(client: &Client) -> Result<Vec<Route>> {
    let api = Api::<HttpRoute>::all(client.clone());
    let list = api
        .list(&ListParams::default())
        .await
        .context("list httproutes")?;

    Ok(list.into_iter().map(snapshot).collect())
}

fn snapshot(route: HttpRoute) -> Route {
    let namespace = route.namespace().unwrap_or_default();
    let name = route.name_unchecked();
    let parent_gateways = route
        .spec
        .inner
        .parent_refs
        .unwrap_or_default()
        .into_iter()
        .map(|parent| parent.name)
        .collect();

    Route {
        namespace,
        name,
        annotations: route.metadata.annotations.unwrap_or_default(),
        hostnames: route.spec.hostnames.unwrap_or_default(),
        parent_gateways,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_gateway_api::{CommonRouteSpec, HttpRouteSpec, ParentReference};
    use kube::core::ObjectMeta;
    use pretty_assertions::assert_eq;

    #[test]
    fn snapshot_captures_route_fields() {
        let route = HttpRoute {
            metadata: ObjectMeta {
                namespace: Some("media-apps".to_string()),
                name: Some("jellyfin".to_string()),
                annotations: Some(
                    [("homer.sh/enabled".to_string(), "true".to_string())]
                        .into_iter()
                        .collect(),
                ),
                ..Default::default()
            },
            spec: HttpRouteSpec {
                inner: CommonRouteSpec {
                    parent_refs: Some(vec![ParentReference {
                        group: None,
                        kind: None,
                        namespace: Some("envoy-gateway".to_string()),
                        name: "envoy".to_string(),
                        section_name: None,
                        port: None,
                    }]),
                },
                hostnames: Some(vec![
                    "tv.example.com".to_string(),
                    "jellyfin.example.com".to_string(),
                ]),
                rules: None,
            },
            status: None,
        };

        let snapshot = snapshot(route);
        assert_eq!(
            snapshot,
            Route {
                namespace: "media-apps".to_string(),
                name: "jellyfin".to_string(),
                annotations: [("homer.sh/enabled".to_string(), "true".to_string())]
                    .into_iter()
                    .collect(),
                hostnames: vec![
                    "tv.example.com".to_string(),
                    "jellyfin.example.com".to_string(),
                ],
                parent_gateways: vec!["envoy".to_string()],
            }
        );
    }

    #[test]
    fn snapshot_tolerates_sparse_specs() {
        let route = HttpRoute {
            metadata: ObjectMeta {
                namespace: Some("tools".to_string()),
                name: Some("wiki".to_string()),
                ..Default::default()
            },
            spec: HttpRouteSpec {
                inner: CommonRouteSpec { parent_refs: None },
                hostnames: None,
                rules: None,
            },
            status: None,
        };

        let snapshot = snapshot(route);
        assert!(snapshot.annotations.is_empty());
        assert!(snapshot.hostnames.is_empty());
        assert!(snapshot.parent_gateways.is_empty());
    }
}
