//! Annotation keys and namespace-level metadata resolution.
//!
//! All annotations share the `homer.sh` prefix. Route-level annotations
//! override namespace-level ones, which override computed defaults.

use crate::AnnotationMap;

/// Marks a route as visible (opt-in mode) or hidden (opt-out mode).
pub const ENABLED: &str = "homer.sh/enabled";

/// Overrides the group display name. Valid on routes and namespaces.
pub const GROUP: &str = "homer.sh/group";

/// Overrides the group icon. Valid on namespaces.
pub const GROUP_ICON: &str = "homer.sh/group-icon";

/// Overrides the item display name.
pub const NAME: &str = "homer.sh/name";

/// Sets the item subtitle.
pub const SUBTITLE: &str = "homer.sh/subtitle";

/// Sets the item logo, as a bare icon name (e.g. `jellyfin`).
pub const ICON: &str = "homer.sh/icon";

/// Sets the item sort order within its group.
pub const SORT: &str = "homer.sh/sort";

/// Icon applied to groups whose namespace carries no `group-icon` annotation.
pub const DEFAULT_GROUP_ICON: &str = "fas fa-globe";

/// Derives a namespace's group display name.
///
/// A non-empty `homer.sh/group` annotation wins; otherwise the namespace
/// name is prettified, e.g. `media-apps` becomes `Media Apps`.
pub fn group_name(namespace: &str, annotations: &AnnotationMap) -> String {
    if let Some(group) = nonempty(annotations, GROUP) {
        return group.to_string();
    }
    title_case(&namespace.replace('-', " "))
}

/// Derives a namespace's group icon, falling back to [`DEFAULT_GROUP_ICON`].
pub fn group_icon(annotations: &AnnotationMap) -> String {
    nonempty(annotations, GROUP_ICON)
        .unwrap_or(DEFAULT_GROUP_ICON)
        .to_string()
}

fn nonempty<'a>(annotations: &'a AnnotationMap, key: &str) -> Option<&'a str> {
    annotations
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

/// Uppercases the first letter of each whitespace-separated word.
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
