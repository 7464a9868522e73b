//! Ordered set of status options. Catalog order is both the cycle order and the sort rank.

use std::collections::{HashMap, HashSet};

use crate::error::{WidgetError, WidgetResult};
use crate::model::{StatusColor, StatusOption};

/// Color shown for a status id the catalog does not know.
pub const UNRESOLVED_COLOR: StatusColor = StatusColor::Gray;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusCatalog {
    options: Vec<StatusOption>,
    index: HashMap<String, usize>,
}

impl StatusCatalog {
    pub fn load(options: Vec<StatusOption>) -> WidgetResult<Self> {
        let mut seen = HashSet::new();
        for opt in &options {
            if opt.id.trim().is_empty() {
                return Err(WidgetError::Validation(format!(
                    "status option {:?} has an empty id",
                    opt.name
                )));
            }
            if !seen.insert(opt.id.as_str()) {
                return Err(WidgetError::Validation(format!(
                    "duplicate status option id {}",
                    opt.id
                )));
            }
        }

        let index = options
            .iter()
            .enumerate()
            .map(|(i, o)| (o.id.clone(), i))
            .collect();
        Ok(Self { options, index })
    }

    pub fn options(&self) -> &[StatusOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn position(&self, status_id: &str) -> Option<usize> {
        self.index.get(status_id).copied()
    }

    pub fn get(&self, status_id: &str) -> Option<&StatusOption> {
        self.position(status_id).map(|i| &self.options[i])
    }

    pub fn contains(&self, status_id: &str) -> bool {
        self.index.contains_key(status_id)
    }

    /// Sort rank. Unknown ids rank after every known status.
    pub fn rank_of(&self, status_id: &str) -> usize {
        self.position(status_id).unwrap_or(self.options.len())
    }

    /// Next option in cycle order. An unknown id counts as index 0 before advancing.
    /// Returns `None` only for an empty catalog.
    pub fn next(&self, status_id: &str) -> Option<&StatusOption> {
        if self.options.is_empty() {
            return None;
        }
        let idx = self.position(status_id).unwrap_or(0);
        Some(&self.options[(idx + 1) % self.options.len()])
    }

    pub fn color_of(&self, status_id: &str) -> StatusColor {
        self.get(status_id)
            .map(|o| o.color)
            .unwrap_or(UNRESOLVED_COLOR)
    }

    pub fn name_of(&self, status_id: &str) -> Option<&str> {
        self.get(status_id).map(|o| o.name.as_str())
    }

    /// Resolve user input as a status id, falling back to a case-insensitive name match.
    pub fn resolve(&self, id_or_name: &str) -> Option<&StatusOption> {
        self.get(id_or_name).or_else(|| {
            self.options
                .iter()
                .find(|o| o.name.eq_ignore_ascii_case(id_or_name.trim()))
        })
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
