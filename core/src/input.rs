use std::collections::HashMap;
use anyhow::{anyhow, Context, Result};

use crate::model::entry::{MealType, NewFoodEntry, Timestamp};
use crate::model::settings::{ActivityLevel, Gender, UserSettings};
use crate::time::parse_when;

pub const FOOD_KEYS: [&str; 7] = ["calories", "protein", "carbs", "fat", "serving", "meal", "at"];

pub const SETTINGS_KEYS: [&str; 11] = [
    "calories", "protein", "carbs", "fat", "water", "name", "weight", "height", "age", "gender",
    "activity",
];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

/// Splits `key:value` words from the free-text words that make up the name.
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

/// Resolves `key` to the single candidate it equals or is a prefix of.
pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    let key = key.to_lowercase();
    if candidates.contains(&key.as_str()) {
        return Ok(key);
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(&key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

fn normalize(metadata: HashMap<String, String>, candidates: &[&str]) -> Result<HashMap<String, String>> {
    let mut normalized = HashMap::new();
    for (key, value) in metadata {
        normalized.insert(expand_key(&key, candidates)?, value);
    }
    Ok(normalized)
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid value for {}: '{}'", key, value))
}

/// Builds a food entry from CLI words such as `Oatmeal cal:350 pro:12 meal:b`.
///
/// Returns the logging instant too when an `at:` key was given. Range checks are
/// left to [`NewFoodEntry::validate`].
pub fn parse_food_input(args: &[String], now: Timestamp) -> Result<(NewFoodEntry, Option<Timestamp>)> {
    let parsed = parse_args(args);
    let metadata = normalize(parsed.metadata, &FOOD_KEYS)?;

    let mut entry = NewFoodEntry {
        name: parsed.name,
        ..NewFoodEntry::default()
    };
    let mut at = None;

    for (key, value) in &metadata {
        match key.as_str() {
            "calories" => entry.calories = parse_number(key, value)?,
            "protein" => entry.protein = parse_number(key, value)?,
            "carbs" => entry.carbs = parse_number(key, value)?,
            "fat" => entry.fat = parse_number(key, value)?,
            "serving" => entry.serving_size = value.trim().to_string(),
            "meal" => {
                entry.meal_type = MealType::parse(value)
                    .ok_or_else(|| anyhow!("Unknown meal type: '{}'", value))?
            }
            "at" => at = Some(parse_when(value, now).context("Invalid at: value")?),
            other => return Err(anyhow!("Unhandled key: '{}'", other)),
        }
    }

    Ok((entry, at))
}

/// Applies `key:value` words on top of `current`, returning the replacement record.
pub fn apply_settings_args(args: &[String], current: &UserSettings) -> Result<UserSettings> {
    let parsed = parse_args(args);
    if !parsed.name.is_empty() {
        return Err(anyhow!("Expected key:value pairs, got '{}'", parsed.name));
    }
    let metadata = normalize(parsed.metadata, &SETTINGS_KEYS)?;

    let mut settings = current.clone();
    for (key, value) in &metadata {
        match key.as_str() {
            "calories" => settings.daily_calorie_target = parse_number(key, value)?,
            "protein" => settings.daily_protein_target = parse_number(key, value)?,
            "carbs" => settings.daily_carbs_target = parse_number(key, value)?,
            "fat" => settings.daily_fat_target = parse_number(key, value)?,
            "water" => settings.daily_water_target = parse_number(key, value)?,
            "name" => settings.user_name = value.trim().to_string(),
            "weight" => settings.weight = parse_number(key, value)?,
            "height" => settings.height = parse_number(key, value)?,
            "age" => settings.age = parse_number(key, value)?,
            "gender" => {
                settings.gender = Gender::parse(value)
                    .ok_or_else(|| anyhow!("Unknown gender: '{}'", value))?
            }
            "activity" => {
                settings.activity_level = ActivityLevel::parse(value)
                    .ok_or_else(|| anyhow!("Unknown activity level: '{}'", value))?
            }
            other => return Err(anyhow!("Unhandled key: '{}'", other)),
        }
    }
    Ok(settings)
}
