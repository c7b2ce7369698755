//! Builds dashboard items from filtered routes.

use ahash::AHashMap;
use serde::Serialize;

use crate::{annotations, AnnotationMap, NamespaceMap, Route};

/// Resolved display metadata for a single dashboard entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DashboardItem {
    pub name: String,
    pub subtitle: String,
    pub url: String,
    pub icon: String,
    pub group: String,
    pub group_icon: String,
    pub sort: i64,
}

/// Per-cycle memo of group display name to resolved icon.
///
/// Scoped to a single scan cycle so that annotation changes take effect on
/// the next scan.
pub type GroupIconCache = AHashMap<String, String>;

/// Builds a [`DashboardItem`] from a route and its namespace metadata.
///
/// Returns `None` for routes without hostnames. A malformed `sort`
/// annotation is logged and treated as 0; the item is kept.
pub fn extract(
    route: &Route,
    namespaces: &NamespaceMap,
    cache: &mut GroupIconCache,
) -> Option<DashboardItem> {
    let Some(hostname) = route.hostnames.first() else {
        tracing::warn!(
            namespace = %route.namespace,
            name = %route.name,
            "skipping route: no hostnames defined"
        );
        return None;
    };
    let url = format!("https://{hostname}");

    let empty = AnnotationMap::new();
    let ns_annotations = namespaces.get(&route.namespace).unwrap_or(&empty);

    // Group resolution: route annotation, then namespace annotation, then
    // the prettified namespace name. The icon for an overridden group comes
    // from the first namespace (lexically) whose derived group name matches.
    let (group, group_icon) = match route.annotation(annotations::GROUP) {
        Some(group) => {
            let icon = cache
                .entry(group.to_string())
                .or_insert_with(|| icon_for_group(group, namespaces))
                .clone();
            (group.to_string(), icon)
        }
        None => {
            let group = annotations::group_name(&route.namespace, ns_annotations);
            let icon = cache
                .entry(group.clone())
                .or_insert_with(|| annotations::group_icon(ns_annotations))
                .clone();
            (group, icon)
        }
    };

    let sort = match route.annotation(annotations::SORT) {
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(
                namespace = %route.namespace,
                name = %route.name,
                %value,
                "malformed sort annotation; defaulting to 0"
            );
            0
        }),
        None => 0,
    };

    Some(DashboardItem {
        name: route
            .annotation(annotations::NAME)
            .unwrap_or(&route.name)
            .to_string(),
        subtitle: route
            .annotation(annotations::SUBTITLE)
            .unwrap_or_default()
            .to_string(),
        url,
        icon: route
            .annotation(annotations::ICON)
            .unwrap_or_default()
            .to_string(),
        group,
        group_icon,
        sort,
    })
}

/// Finds the icon for an overridden group name by scanning all namespaces
/// in lexical order and taking the first whose derived group name matches.
fn icon_for_group(group: &str, namespaces: &NamespaceMap) -> String {
    for (ns_name, ns_annotations) in namespaces {
        if annotations::group_name(ns_name, ns_annotations) == group {
            return annotations::group_icon(ns_annotations);
        }
    }
    annotations::DEFAULT_GROUP_ICON.to_string()
}
