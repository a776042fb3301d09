//! In-memory diary source for tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::client::{DiaryClient, DiarySource};
use super::error::{DiaryError, DiaryResult};
use super::model::{Day, Entry, Exercise, Meal, Nutrients};

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn nutrients(pairs: &[(&str, f64)]) -> Nutrients {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

pub fn entry(name: &str, quantity: f64, unit: &str, pairs: &[(&str, f64)]) -> Entry {
    Entry {
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
        nutrition: nutrients(pairs),
    }
}

pub fn meal(name: &str, totals: &[(&str, f64)], entries: Vec<Entry>) -> Meal {
    Meal {
        name: name.to_string(),
        totals: nutrients(totals),
        entries,
    }
}

pub fn exercise(name: &str, entries: Vec<Entry>) -> Exercise {
    Exercise {
        name: name.to_string(),
        entries,
    }
}

/// Serves configured days, an empty day for anything else, and fails on
/// the dates it was told to fail on. Records every requested date.
#[derive(Default)]
pub struct StubSource {
    days: HashMap<NaiveDate, Day>,
    failing: HashSet<NaiveDate>,
    requested: Mutex<Vec<NaiveDate>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day(mut self, day: Day) -> Self {
        self.days.insert(day.date, day);
        self
    }

    pub fn failing_on(mut self, date: NaiveDate) -> Self {
        self.failing.insert(date);
        self
    }

    pub fn requested(&self) -> Vec<NaiveDate> {
        self.requested.lock().unwrap().clone()
    }

    pub fn into_client(self) -> Arc<DiaryClient> {
        Arc::new(DiaryClient::new(Arc::new(self)))
    }
}

#[async_trait]
impl DiarySource for StubSource {
    async fn fetch_day(&self, date: NaiveDate) -> DiaryResult<Day> {
        self.requested.lock().unwrap().push(date);
        if self.failing.contains(&date) {
            return Err(DiaryError::unexpected(format!("no diary for {}", date)));
        }
        Ok(self
            .days
            .get(&date)
            .cloned()
            .unwrap_or_else(|| Day::empty(date)))
    }
}
