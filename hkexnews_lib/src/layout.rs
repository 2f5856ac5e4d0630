//! Structural positions and selectors of the portal's pages.
//!
//! The portal gives its tables no ids, so the parsers locate data by position
//! ("third table of the form, second row"). All of those positions live here,
//! loaded from `seed_data/portal_layout.yml`, so a portal redesign is fixed
//! in one file. Follows the compile-time `include_str!` pattern; a replacement
//! file can be loaded at runtime with [`PortalLayout::load`].

use std::path::Path;

use scraper::Selector;
use serde::Deserialize;
use thiserror::Error;

/// Error types for layout loading.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Failed to parse portal layout YAML: {0}")]
    YamlParse(#[from] serde_yml::Error),
    #[error("Failed to read portal layout file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid selector '{selector}' in portal layout")]
    Selector { selector: String },
}

/// Top-level structure of the layout YAML file.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PortalLayout {
    pub search: SearchLayout,
    pub latest: LatestLayout,
    pub record: RecordLayout,
}

/// Positions on the advanced-search results page.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchLayout {
    pub form: String,
    pub layout_table_index: usize,
    pub records_row_index: usize,
    pub navigation_row_index: usize,
    pub data_row_attribute: String,
    pub navigation_cell_align: String,
    pub next_control_marker: String,
}

/// Selectors on the latest-announcements listing.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LatestLayout {
    pub row: String,
    pub stock_name: String,
    pub document_link: String,
    pub headline: String,
}

/// Conventions shared by both pages.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    pub market_suffix: String,
    pub datetime_format: String,
    pub line_break_separator: String,
}

impl PortalLayout {
    /// Parse a layout from YAML content and check that every selector compiles.
    pub fn from_yaml(yaml_content: &str) -> Result<Self, LayoutError> {
        let layout: PortalLayout = serde_yml::from_str(yaml_content)?;
        layout.check_selectors()?;
        Ok(layout)
    }

    /// Load the layout embedded at compile time.
    pub fn embedded() -> Result<Self, LayoutError> {
        Self::from_yaml(include_str!("../seed_data/portal_layout.yml"))
    }

    /// Load a replacement layout from disk.
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    fn check_selectors(&self) -> Result<(), LayoutError> {
        for css in [
            &self.search.form,
            &self.latest.row,
            &self.latest.stock_name,
            &self.latest.document_link,
            &self.latest.headline,
        ] {
            compile(css)?;
        }
        Ok(())
    }
}

/// Compile a CSS selector from the layout table.
pub(crate) fn compile(css: &str) -> Result<Selector, LayoutError> {
    Selector::parse(css).map_err(|_| LayoutError::Selector {
        selector: css.to_string(),
    })
}
