//! Recipe lookup.
//!
//! The engine never owns recipes; it asks a registry for them by name.

use crate::config::{Config, Recipe};
use std::collections::BTreeMap;

/// Name-to-recipe lookup supplied to the engine.
pub trait RecipeRegistry {
    fn recipe(&self, name: &str) -> Option<&Recipe>;

    /// Every registered recipe name, sorted.
    fn names(&self) -> Vec<String>;
}

impl RecipeRegistry for BTreeMap<String, Recipe> {
    fn recipe(&self, name: &str) -> Option<&Recipe> {
        self.get(name)
    }

    fn names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }
}

impl RecipeRegistry for Config {
    fn recipe(&self, name: &str) -> Option<&Recipe> {
        self.recipes.recipe(name)
    }

    fn names(&self) -> Vec<String> {
        self.recipes.names()
    }
}
