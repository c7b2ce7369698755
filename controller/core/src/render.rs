//! Renders the grouped item set into Homer's `config.yml`.

use std::{collections::BTreeMap, fs, path::PathBuf};

use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

use crate::{annotations, DashboardItem};

/// Built-in configuration template, used unless an operator supplies an
/// override via `template_path`.
const DEFAULT_TEMPLATE: &str = include_str!("templates/config.yml.j2");

const TEMPLATE_NAME: &str = "config.yml";

/// Global display settings fed to the template alongside the grouped items.
#[derive(Clone, Debug)]
pub struct DashboardSettings {
    pub title: String,
    pub subtitle: String,
    pub columns: usize,

    /// Custom template file overriding the built-in one.
    pub template_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read template {path}: {source}")]
    ReadTemplate {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render template: {0}")]
    Template(#[from] minijinja::Error),
}

#[derive(Serialize)]
struct GroupContext<'a> {
    name: &'a str,
    icon: &'a str,
    items: &'a [DashboardItem],
}

/// Renders the manifest deterministically: groups ordered lexically by
/// display name, items within a group ordered by `(sort, name)`.
///
/// Template failures are fatal for the cycle; no partial manifest is ever
/// produced.
pub fn render(
    items: Vec<DashboardItem>,
    settings: &DashboardSettings,
) -> Result<String, RenderError> {
    let mut groups = BTreeMap::<String, Vec<DashboardItem>>::new();
    for item in items {
        groups.entry(item.group.clone()).or_default().push(item);
    }
    for members in groups.values_mut() {
        members.sort_by(|a, b| a.sort.cmp(&b.sort).then_with(|| a.name.cmp(&b.name)));
    }

    let source = match &settings.template_path {
        Some(path) => fs::read_to_string(path).map_err(|source| RenderError::ReadTemplate {
            path: path.display().to_string(),
            source,
        })?,
        None => DEFAULT_TEMPLATE.to_string(),
    };

    let groups = groups
        .iter()
        .map(|(name, members)| GroupContext {
            name,
            icon: members
                .first()
                .map(|item| item.group_icon.as_str())
                .unwrap_or(annotations::DEFAULT_GROUP_ICON),
            items: members,
        })
        .collect::<Vec<_>>();

    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template(TEMPLATE_NAME, &source)?;

    let manifest = env.get_template(TEMPLATE_NAME)?.render(minijinja::context! {
        title => &settings.title,
        subtitle => &settings.subtitle,
        columns => settings.columns,
        groups => groups,
    })?;
    Ok(manifest)
}
