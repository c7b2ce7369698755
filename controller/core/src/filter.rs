use crate::{annotations, Route};

/// Route inclusion policy, derived once from process configuration.
///
/// With no filters configured the controller runs in opt-in mode: only
/// routes annotated `homer.sh/enabled: "true"` appear on the dashboard.
/// Once a gateway or domain-suffix filter is set the controller switches
/// to opt-out mode: every route matching the filters appears unless it is
/// annotated `homer.sh/enabled: "false"`.
#[derive(Clone, Debug, Default)]
pub struct FilterSpec {
    /// Gateway names that admit routes referencing them as a parent.
    pub gateway_names: Vec<String>,

    /// Hostname suffixes that admit routes, e.g. `.home.example.com`.
    pub domain_suffixes: Vec<String>,
}

impl FilterSpec {
    /// True when at least one opt-out filter is active.
    pub fn has_filters(&self) -> bool {
        !self.gateway_names.is_empty() || !self.domain_suffixes.is_empty()
    }

    /// Decides whether a route is eligible for the dashboard.
    ///
    /// Exclusions are checked in a fixed order and the first match wins:
    /// the `enabled` annotation, then the gateway filter, then the domain
    /// suffix filter. A route without hostnames passes the filter; it is
    /// dropped later, at extraction.
    pub fn admits(&self, route: &Route) -> bool {
        let enabled = route
            .annotation(annotations::ENABLED)
            .map(str::to_ascii_lowercase);

        if !self.has_filters() {
            return enabled.as_deref() == Some("true");
        }

        if enabled.as_deref() == Some("false") {
            tracing::debug!(
                namespace = %route.namespace,
                name = %route.name,
                "excluding route: disabled by annotation"
            );
            return false;
        }

        if !self.gateway_names.is_empty()
            && !route
                .parent_gateways
                .iter()
                .any(|gateway| self.gateway_names.contains(gateway))
        {
            tracing::debug!(
                namespace = %route.namespace,
                name = %route.name,
                gateways = ?self.gateway_names,
                "excluding route: no matching gateway"
            );
            return false;
        }

        if !self.domain_suffixes.is_empty()
            && !route.hostnames.iter().any(|hostname| {
                self.domain_suffixes
                    .iter()
                    .any(|suffix| hostname.ends_with(suffix))
            })
        {
            tracing::debug!(
                namespace = %route.namespace,
                name = %route.name,
                suffixes = ?self.domain_suffixes,
                "excluding route: no hostname matches suffixes"
            );
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::ENABLED;

    fn route(annotations: &[(&str, &str)], gateways: &[&str], hostnames: &[&str]) -> Route {
        Route {
            namespace: "apps".to_string(),
            name: "app".to_string(),
            annotations: annotations
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            hostnames: hostnames.iter().map(|h| h.to_string()).collect(),
            parent_gateways: gateways.iter().map(|g| g.to_string()).collect(),
        }
    }

    fn gateway_filter(names: &[&str]) -> FilterSpec {
        FilterSpec {
            gateway_names: names.iter().map(|n| n.to_string()).collect(),
            domain_suffixes: vec![],
        }
    }

    #[test]
    fn opt_in_requires_enabled_annotation() {
        let filter = FilterSpec::default();
        assert!(!filter.has_filters());

        assert!(filter.admits(&route(&[(ENABLED, "true")], &[], &["a.example.com"])));
        assert!(filter.admits(&route(&[(ENABLED, "True")], &[], &["a.example.com"])));
        assert!(filter.admits(&route(&[(ENABLED, "TRUE")], &[], &["a.example.com"])));

        assert!(!filter.admits(&route(&[], &[], &["a.example.com"])));
        assert!(!filter.admits(&route(&[(ENABLED, "false")], &[], &["a.example.com"])));
        assert!(!filter.admits(&route(&[(ENABLED, "yes")], &[], &["a.example.com"])));
        assert!(!filter.admits(&route(&[(ENABLED, "")], &[], &["a.example.com"])));
    }

    #[test]
    fn opt_out_disabled_annotation_always_excludes() {
        let filter = gateway_filter(&["envoy"]);
        assert!(filter.has_filters());

        // Matches the gateway filter but is explicitly disabled.
        let r = route(&[(ENABLED, "false")], &["envoy"], &["a.example.com"]);
        assert!(!filter.admits(&r));
        let r = route(&[(ENABLED, "False")], &["envoy"], &["a.example.com"]);
        assert!(!filter.admits(&r));
    }

    #[test]
    fn opt_out_includes_by_default() {
        let filter = gateway_filter(&["envoy"]);
        assert!(filter.admits(&route(&[], &["envoy"], &["a.example.com"])));
    }

    #[test]
    fn gateway_filter_matches_parent_references() {
        let filter = gateway_filter(&["envoy"]);
        assert!(!filter.admits(&route(&[], &["nginx"], &["a.example.com"])));
        assert!(filter.admits(&route(&[], &["envoy"], &["a.example.com"])));
        assert!(filter.admits(&route(&[], &["nginx", "envoy"], &["a.example.com"])));
        assert!(!filter.admits(&route(&[], &[], &["a.example.com"])));
    }

    #[test]
    fn suffix_filter_matches_hostname_tails() {
        let filter = FilterSpec {
            gateway_names: vec![],
            domain_suffixes: vec![".example.com".to_string()],
        };
        assert!(filter.admits(&route(&[], &[], &["app.example.com"])));
        assert!(!filter.admits(&route(&[], &[], &["app.example.org"])));
        assert!(filter.admits(&route(&[], &[], &["app.example.org", "app.example.com"])));
    }

    #[test]
    fn hostnameless_route_passes_the_filter() {
        // Hostname absence is an extraction concern, not a filter concern.
        let filter = gateway_filter(&["envoy"]);
        assert!(filter.admits(&route(&[], &["envoy"], &[])));
    }
}
