//! Remote diary source over HTTP.
//!
//! Session cookies are exchanged for an API access token once, at
//! construction. Every [`DiarySource::fetch_day`] call then performs its
//! requests sequentially and assembles a [`Day`] from the JSON answers:
//! diary entries, nutrient goals and water. The food note is fetched on a
//! best-effort basis.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::client::DiarySource;
use super::cookies::CookieStore;
use super::dates::DATE_FORMAT;
use super::error::{DiaryError, DiaryResult};
use super::model::{Day, Entry, Exercise, Meal, Nutrients};
use crate::core::config::DiaryConfig;

/// Client id the web frontend presents to the JSON API.
const CLIENT_ID: &str = "mfp-main-js";

const USER_AGENT: &str = concat!("mfp-mcp-server/", env!("CARGO_PKG_VERSION"));

/// Meals every diary shows, in diary order, even when empty.
pub const DEFAULT_MEALS: &[&str] = &["Breakfast", "Lunch", "Dinner", "Snacks"];

pub const CARDIO_CATEGORY: &str = "Cardiovascular";
pub const STRENGTH_CATEGORY: &str = "Strength Training";

const KILOJOULES_PER_KCAL: f64 = 4.184;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct AccessToken {
    access_token: String,
    #[serde(deserialize_with = "string_or_number")]
    user_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct DiaryResponse {
    #[serde(default)]
    items: Vec<DiaryItem>,
    #[serde(default)]
    completed: bool,
}

#[derive(Debug, Deserialize)]
struct DiaryItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    meal_name: Option<String>,
    #[serde(default)]
    food: Option<FoodDto>,
    #[serde(default)]
    servings: Option<f64>,
    #[serde(default)]
    serving_size: Option<ServingSizeDto>,
    #[serde(default)]
    nutritional_contents: Option<Map<String, Value>>,
    #[serde(default)]
    exercise: Option<ExerciseDto>,
    /// Seconds.
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    energy: Option<EnergyDto>,
    #[serde(default)]
    sets: Option<f64>,
    #[serde(default)]
    reps_per_set: Option<f64>,
    #[serde(default)]
    weight_per_set: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FoodDto {
    description: String,
    #[serde(default)]
    brand_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServingSizeDto {
    unit: String,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct ExerciseDto {
    description: String,
    #[serde(rename = "type", default)]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct EnergyDto {
    value: f64,
    #[serde(default)]
    unit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GoalsResponse {
    #[serde(default)]
    items: Vec<GoalItem>,
}

#[derive(Debug, Deserialize)]
struct GoalItem {
    #[serde(default)]
    default_goal: Option<Map<String, Value>>,
    #[serde(default)]
    daily_goals: Vec<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct WaterResponse {
    #[serde(default)]
    item: Option<WaterItem>,
}

#[derive(Debug, Deserialize)]
struct WaterItem {
    #[serde(default)]
    milliliters: f64,
}

#[derive(Debug, Default, Deserialize)]
struct NoteResponse {
    #[serde(default)]
    item: Option<NoteItem>,
}

#[derive(Debug, Deserialize)]
struct NoteItem {
    #[serde(default)]
    body: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

// ============================================================================
// Source
// ============================================================================

/// Diary source backed by the remote service's web and JSON API origins.
pub struct HttpDiarySource {
    http: reqwest::Client,
    web_base: String,
    api_base: String,
    token: AccessToken,
}

impl HttpDiarySource {
    /// Build the HTTP client around `cookies` and obtain an access token.
    pub async fn connect(config: &DiaryConfig, cookies: &CookieStore) -> DiaryResult<Self> {
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::new(cookies.to_jar()))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        let web_base = config.web_base_url.trim_end_matches('/').to_string();
        let api_base = config.api_base_url.trim_end_matches('/').to_string();

        let url = format!("{}/user/auth_token", web_base);
        let response = http
            .get(&url)
            .query(&[("refresh", "true")])
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DiaryError::auth(format!(
                "session cookies were rejected (status {})",
                response.status().as_u16()
            )));
        }

        let token: AccessToken = response
            .json()
            .await
            .map_err(|e| DiaryError::auth(format!("no access token in response: {}", e)))?;

        info!("Authenticated as user {}", token.user_id);

        Ok(Self {
            http,
            web_base,
            api_base,
            token,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> DiaryResult<T> {
        let response = request.header(ACCEPT, "application/json").send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DiaryError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        response
            .json()
            .await
            .map_err(|e| DiaryError::unexpected(e.to_string()))
    }

    fn api(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.token.access_token)
            .header("mfp-client-id", CLIENT_ID)
            .header("mfp-user-id", &self.token.user_id)
    }

    fn web(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.get(format!("{}{}", self.web_base, path))
    }
}

#[async_trait]
impl DiarySource for HttpDiarySource {
    #[instrument(skip(self))]
    async fn fetch_day(&self, date: NaiveDate) -> DiaryResult<Day> {
        let day = date.format(DATE_FORMAT).to_string();

        let diary: DiaryResponse = self
            .get_json(self.api("/v2/diary").query(&[
                ("entry_date", day.as_str()),
                ("types", "food_entry,exercise_entry"),
                ("fields[]", "nutritional_contents"),
            ]))
            .await?;

        let goals: GoalsResponse = self
            .get_json(self.api("/v2/nutrient-goals").query(&[("date", day.as_str())]))
            .await?;

        let water: WaterResponse = self
            .get_json(self.web(&format!("/food/water/{}", day)))
            .await?;

        // Best-effort: a missing note leaves the day's notes empty.
        let note: NoteResponse = self
            .get_json(
                self.web("/food/note")
                    .query(&[("date", day.as_str()), ("type", "food")]),
            )
            .await
            .unwrap_or_else(|e| {
                debug!("No food note for {}: {}", day, e);
                NoteResponse::default()
            });

        debug!("Fetched {} diary items for {}", diary.items.len(), day);
        Ok(assemble_day(date, diary, goals, water, note))
    }
}

// ============================================================================
// Assembly
// ============================================================================

fn assemble_day(
    date: NaiveDate,
    diary: DiaryResponse,
    goals: GoalsResponse,
    water: WaterResponse,
    note: NoteResponse,
) -> Day {
    let mut meals: Vec<Meal> = DEFAULT_MEALS
        .iter()
        .map(|name| Meal {
            name: name.to_string(),
            totals: Nutrients::new(),
            entries: Vec::new(),
        })
        .collect();
    let mut cardio = Vec::new();
    let mut strength = Vec::new();

    for item in diary.items {
        match item.kind.as_str() {
            "food_entry" => {
                let meal_name = item.meal_name.clone().unwrap_or_else(|| "Snacks".to_string());
                let entry = food_entry(item);
                let index = match meals.iter().position(|m| m.name == meal_name) {
                    Some(index) => index,
                    None => {
                        meals.push(Meal {
                            name: meal_name,
                            totals: Nutrients::new(),
                            entries: Vec::new(),
                        });
                        meals.len() - 1
                    }
                };
                let meal = &mut meals[index];
                meal.totals.accumulate(&entry.nutrition);
                meal.entries.push(entry);
            }
            "exercise_entry" => {
                let is_strength = item
                    .exercise
                    .as_ref()
                    .is_some_and(|e| e.kind.eq_ignore_ascii_case("strength"));
                let entry = exercise_entry(item, is_strength);
                if is_strength {
                    strength.push(entry);
                } else {
                    cardio.push(entry);
                }
            }
            other => debug!("Ignoring diary item of type {}", other),
        }
    }

    let mut totals = Nutrients::new();
    for meal in &meals {
        totals.accumulate(&meal.totals);
    }

    Day {
        date,
        totals,
        goals: goals_for(date, goals),
        water_ml: water.item.map(|w| w.milliliters).unwrap_or(0.0),
        meals,
        exercises: vec![
            Exercise {
                name: CARDIO_CATEGORY.to_string(),
                entries: cardio,
            },
            Exercise {
                name: STRENGTH_CATEGORY.to_string(),
                entries: strength,
            },
        ],
        notes: note.item.map(|n| n.body).unwrap_or_default(),
        complete: diary.completed,
    }
}

fn food_entry(item: DiaryItem) -> Entry {
    let name = match item.food {
        Some(FoodDto {
            description,
            brand_name: Some(brand),
        }) if !brand.is_empty() => format!("{} - {}", brand, description),
        Some(food) => food.description,
        None => "Unknown food".to_string(),
    };
    let servings = item.servings.unwrap_or(1.0);
    let (quantity, unit) = match item.serving_size {
        Some(size) => (servings * size.value, size.unit),
        None => (servings, "servings".to_string()),
    };

    Entry {
        name,
        quantity,
        unit,
        nutrition: item
            .nutritional_contents
            .as_ref()
            .map(nutrients_from_contents)
            .unwrap_or_default(),
    }
}

fn exercise_entry(item: DiaryItem, is_strength: bool) -> Entry {
    let name = item
        .exercise
        .map(|e| e.description)
        .unwrap_or_else(|| "Unknown exercise".to_string());

    let mut nutrition = Nutrients::new();
    let minutes = item.duration.map(|secs| secs / 60.0);
    if let Some(minutes) = minutes {
        nutrition.insert("minutes", minutes);
    }
    if let Some(energy) = &item.energy {
        nutrition.insert("calories burned", energy_kcal(energy));
    }
    if is_strength {
        if let Some(sets) = item.sets {
            nutrition.insert("sets", sets);
        }
        if let Some(reps) = item.reps_per_set {
            nutrition.insert("reps/set", reps);
        }
        if let Some(weight) = item.weight_per_set {
            nutrition.insert("weight/set", weight);
        }
    }

    let (quantity, unit) = if is_strength {
        (item.sets.unwrap_or(0.0), "sets")
    } else {
        (minutes.unwrap_or(0.0), "minutes")
    };

    Entry {
        name,
        quantity,
        unit: unit.to_string(),
        nutrition,
    }
}

fn energy_kcal(energy: &EnergyDto) -> f64 {
    match energy.unit.as_deref() {
        Some("kilojoules") => energy.value / KILOJOULES_PER_KCAL,
        _ => energy.value,
    }
}

/// Map the API's nutrient keys onto the diary's display names.
///
/// `energy` becomes `calories`; other numeric keys swap underscores for
/// spaces (`saturated_fat` → `saturated fat`). Non-numeric keys are dropped.
fn nutrients_from_contents(contents: &Map<String, Value>) -> Nutrients {
    let mut nutrients = Nutrients::new();
    for (key, value) in contents {
        if key == "energy" {
            if let Ok(energy) = serde_json::from_value::<EnergyDto>(value.clone()) {
                nutrients.insert("calories", energy_kcal(&energy));
            } else if let Some(kcal) = value.as_f64() {
                nutrients.insert("calories", kcal);
            }
        } else if let Some(amount) = value.as_f64() {
            nutrients.insert(key.replace('_', " "), amount);
        }
    }
    nutrients
}

/// Goals for the weekday of `date`, falling back to the default goal.
fn goals_for(date: NaiveDate, goals: GoalsResponse) -> Nutrients {
    let weekday = weekday_name(date.weekday());
    let Some(item) = goals.items.into_iter().next() else {
        return Nutrients::new();
    };

    item.daily_goals
        .iter()
        .find(|g| g.get("day_of_week").and_then(Value::as_str) == Some(weekday))
        .or(item.default_goal.as_ref())
        .map(nutrients_from_contents)
        .unwrap_or_default()
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
