use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ValidationError, ValidationResult};

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Other,
}

impl Default for MealType {
    fn default() -> Self {
        MealType::Other
    }
}

impl MealType {
    pub const ALL: [MealType; 5] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
        MealType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Other => "other",
        }
    }

    /// Accepts the full name or any unique prefix ("b", "lun", "SNACK").
    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        let mut matches = Self::ALL.iter().filter(|m| m.as_str().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(m), None) => Some(*m),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    pub id: String,
    pub name: String,
    pub calories: u32,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub serving_size: String,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub meal_type: MealType,
}

/// Upper bound for a single food entry.
pub const MAX_ENTRY_CALORIES: u32 = 100_000;

/// User-supplied fields of a food entry; id and timestamp are assigned on creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewFoodEntry {
    pub name: String,
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub serving_size: String,
    pub meal_type: MealType,
}

impl NewFoodEntry {
    pub fn validate(&self) -> ValidationResult {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyFoodName);
        }
        if self.calories == 0 {
            return Err(ValidationError::NonPositiveCalories);
        }
        if self.calories > MAX_ENTRY_CALORIES {
            return Err(ValidationError::TooManyCalories(MAX_ENTRY_CALORIES));
        }
        check_macro("Protein", self.protein)?;
        check_macro("Carbs", self.carbs)?;
        check_macro("Fat", self.fat)?;
        Ok(())
    }
}

// NaN fails the `>=` comparison and is rejected along with negatives.
fn check_macro(label: &'static str, grams: f64) -> ValidationResult {
    if grams >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NegativeMacro(label))
    }
}

impl FoodEntry {
    pub fn new(input: NewFoodEntry, timestamp: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            calories: input.calories,
            protein: input.protein,
            carbs: input.carbs,
            fat: input.fat,
            serving_size: input.serving_size,
            timestamp,
            meal_type: input.meal_type,
        }
    }

    /// Same rules as [`NewFoodEntry::validate`] plus a non-blank id; used when loading persisted records.
    pub fn validate(&self) -> ValidationResult {
        if self.id.trim().is_empty() {
            return Err(ValidationError::BlankEntryId);
        }
        NewFoodEntry {
            name: self.name.clone(),
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            serving_size: String::new(),
            meal_type: self.meal_type,
        }
        .validate()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WaterEntry {
    pub id: String,
    /// Millilitres.
    pub amount: u32,
    pub timestamp: Timestamp,
}

impl WaterEntry {
    pub fn new(amount: u32, timestamp: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            amount,
            timestamp,
        }
    }

    pub fn validate(&self) -> ValidationResult {
        if self.id.trim().is_empty() {
            return Err(ValidationError::BlankEntryId);
        }
        validate_water_amount(self.amount)
    }
}

pub fn validate_water_amount(amount: u32) -> ValidationResult {
    if amount == 0 {
        Err(ValidationError::NonPositiveWater)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oatmeal() -> NewFoodEntry {
        NewFoodEntry {
            name: "Oatmeal".to_string(),
            calories: 350,
            protein: 12.0,
            carbs: 60.0,
            fat: 6.0,
            serving_size: "1 cup".to_string(),
            meal_type: MealType::Breakfast,
        }
    }

    #[test]
    fn test_meal_type_parse_prefix() {
        assert_eq!(MealType::parse("b"), Some(MealType::Breakfast));
        assert_eq!(MealType::parse("LUN"), Some(MealType::Lunch));
        assert_eq!(MealType::parse("snack"), Some(MealType::Snack));
        assert_eq!(MealType::parse(""), None);
        assert_eq!(MealType::parse("brunch"), None);
    }

    #[test]
    fn test_new_entry_validation() {
        assert!(oatmeal().validate().is_ok());

        let mut blank = oatmeal();
        blank.name = "   ".to_string();
        assert_eq!(blank.validate(), Err(ValidationError::EmptyFoodName));

        let mut zero = oatmeal();
        zero.calories = 0;
        assert_eq!(zero.validate(), Err(ValidationError::NonPositiveCalories));

        let mut huge = oatmeal();
        huge.calories = MAX_ENTRY_CALORIES + 1;
        assert_eq!(huge.validate(), Err(ValidationError::TooManyCalories(MAX_ENTRY_CALORIES)));
        huge.calories = MAX_ENTRY_CALORIES;
        assert!(huge.validate().is_ok());

        let mut negative = oatmeal();
        negative.fat = -1.0;
        assert_eq!(negative.validate(), Err(ValidationError::NegativeMacro("Fat")));

        let mut nan = oatmeal();
        nan.protein = f64::NAN;
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_food_entry_new_assigns_unique_ids() {
        let a = FoodEntry::new(oatmeal(), 1_000);
        let b = FoodEntry::new(oatmeal(), 1_000);
        assert_ne!(a.id, b.id);
        assert_eq!(a.timestamp, 1_000);
        assert_eq!(a.meal_type, MealType::Breakfast);
    }

    #[test]
    fn test_food_entry_json_defaults() {
        let json = r#"{"id":"x","name":"Apple","calories":95,"timestamp":5}"#;
        let entry: FoodEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.protein, 0.0);
        assert_eq!(entry.serving_size, "");
        assert_eq!(entry.meal_type, MealType::Other);
    }

    #[test]
    fn test_free_text_survives_json() {
        let mut input = oatmeal();
        input.name = "Soup ||| with :: separators".to_string();
        let entry = FoodEntry::new(input, 42);
        let json = serde_json::to_string(&entry).unwrap();
        let back: FoodEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_water_validation() {
        assert!(WaterEntry::new(250, 0).validate().is_ok());
        assert_eq!(
            WaterEntry::new(0, 0).validate(),
            Err(ValidationError::NonPositiveWater)
        );
    }
}
