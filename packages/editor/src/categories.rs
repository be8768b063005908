//! Display grouping for component blocks.
//!
//! Each block lands in the first category whose keywords occur anywhere in
//! its selector name (so `.bp-status` is typography because of `stat`).

use blueprint_parser::ComponentBlock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ComponentCategory {
    Typography,
    Buttons,
    Inputs,
    Navigation,
    #[serde(rename = "Containers & Layout")]
    ContainersAndLayout,
    Other,
}

impl ComponentCategory {
    /// All categories in display order
    pub const ALL: [ComponentCategory; 6] = [
        ComponentCategory::Typography,
        ComponentCategory::Buttons,
        ComponentCategory::Inputs,
        ComponentCategory::Navigation,
        ComponentCategory::ContainersAndLayout,
        ComponentCategory::Other,
    ];

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            ComponentCategory::Typography => &["title", "subtitle", "body", "caption", "overline", "stat"],
            ComponentCategory::Buttons => &["btn"],
            ComponentCategory::Inputs => &["input"],
            ComponentCategory::Navigation => &["nav"],
            ComponentCategory::ContainersAndLayout => &["container", "shape", "page", "grid"],
            ComponentCategory::Other => &[],
        }
    }

    /// Category for a selector name
    pub fn of(selector_name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|category| category.keywords().iter().any(|k| selector_name.contains(k)))
            .unwrap_or(ComponentCategory::Other)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComponentCategory::Typography => "Typography",
            ComponentCategory::Buttons => "Buttons",
            ComponentCategory::Inputs => "Inputs",
            ComponentCategory::Navigation => "Navigation",
            ComponentCategory::ContainersAndLayout => "Containers & Layout",
            ComponentCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Group blocks by category. Every category is present, possibly empty,
/// and blocks keep their input order within a group.
pub fn categorize(components: &[ComponentBlock]) -> BTreeMap<ComponentCategory, Vec<&ComponentBlock>> {
    let mut groups: BTreeMap<_, Vec<_>> = ComponentCategory::ALL
        .into_iter()
        .map(|category| (category, Vec::new()))
        .collect();

    for block in components {
        groups
            .entry(ComponentCategory::of(&block.selector_name))
            .or_default()
            .push(block);
    }
    groups
}
