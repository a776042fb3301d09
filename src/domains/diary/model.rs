//! Diary data model.
//!
//! These types mirror what the remote service records for one calendar day.
//! They are fetched fresh for every request and never cached.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Nutrient name → amount mapping with lookup-with-default semantics.
///
/// Keys use the service's display names (`calories`, `carbohydrates`,
/// `saturated fat`, `vitamin a`, ...). For exercise entries the same map
/// carries activity figures such as `minutes` and `calories burned`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nutrients(BTreeMap<String, f64>);

impl Nutrients {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount for `key`, or zero when the key is absent.
    pub fn get_or_zero(&self, key: &str) -> f64 {
        self.get(key).unwrap_or(0.0)
    }

    /// Amount for `key`, if recorded at all.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Whether `key` is present, regardless of its value.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set `key` to `amount`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, amount: f64) {
        self.0.insert(key.into(), amount);
    }

    /// Add `amount` to `key`, treating an absent key as zero.
    pub fn add(&mut self, key: impl Into<String>, amount: f64) {
        *self.0.entry(key.into()).or_insert(0.0) += amount;
    }

    /// Add every amount of `other` into this mapping.
    pub fn accumulate(&mut self, other: &Nutrients) {
        for (key, amount) in &other.0 {
            self.add(key.clone(), *amount);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Nutrients {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// One logged food item or one logged exercise activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub nutrition: Nutrients,
}

/// A named group of food entries within a day (e.g. "Breakfast").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    /// Summed over the meal's entries by the remote source.
    pub totals: Nutrients,
    pub entries: Vec<Entry>,
}

/// An exercise category (e.g. "Cardiovascular") and its logged activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub entries: Vec<Entry>,
}

/// One calendar date's complete diary record.
///
/// `totals` is authoritative as delivered by the remote source and is not
/// required to equal the sum of the meals' totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    pub totals: Nutrients,
    pub goals: Nutrients,
    /// Water intake in milliliters.
    pub water_ml: f64,
    pub meals: Vec<Meal>,
    pub exercises: Vec<Exercise>,
    pub notes: String,
    /// Whether the user marked the day complete.
    pub complete: bool,
}

impl Day {
    /// An empty record for `date`: no meals, no exercise, no water.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            totals: Nutrients::new(),
            goals: Nutrients::new(),
            water_ml: 0.0,
            meals: Vec::new(),
            exercises: Vec::new(),
            notes: String::new(),
            complete: false,
        }
    }

    /// Every exercise entry across all categories, in category order.
    pub fn exercise_entries(&self) -> impl Iterator<Item = &Entry> {
        self.exercises.iter().flat_map(|e| e.entries.iter())
    }
}
