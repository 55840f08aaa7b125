use std::collections::{HashMap, HashSet};

use chatdash_core::category::SettingValue;

/// Per-session snapshot of the last displayed value of every setting.
///
/// Values are stored per category, aligned with the category's settings.
/// A category is *primed* once a fetch pass over it fully succeeded; only
/// primed categories are rendered without fetching again.
#[derive(Debug, Default)]
pub struct SettingValueCache {
    values: HashMap<usize, Vec<SettingValue>>,
    primed: HashSet<usize>,
}

impl SettingValueCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the category has a complete, successfully fetched snapshot.
    pub fn is_primed(&self, category: usize) -> bool {
        self.primed.contains(&category)
    }

    /// All cached values of a category.
    pub fn values(&self, category: usize) -> Option<&[SettingValue]> {
        self.values.get(&category).map(Vec::as_slice)
    }

    /// The cached value of one setting.
    pub fn get(&self, category: usize, setting: usize) -> Option<&SettingValue> {
        self.values.get(&category).and_then(|v| v.get(setting))
    }

    /// Replaces the snapshot of a category.
    ///
    /// # Arguments
    ///
    /// * `category` - Position of the category
    /// * `values` - Values aligned with the category's settings
    /// * `complete` - Whether every value was fetched successfully
    pub fn store(&mut self, category: usize, values: Vec<SettingValue>, complete: bool) {
        self.values.insert(category, values);
        if complete {
            self.primed.insert(category);
        } else {
            self.primed.remove(&category);
        }
    }

    /// Number of categories with any cached values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
