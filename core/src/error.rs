use thiserror::Error;

/// Reasons a new entry or a settings update is rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Food name cannot be empty")]
    EmptyFoodName,

    #[error("Calories must be greater than 0")]
    NonPositiveCalories,

    #[error("Calories cannot exceed {0} per entry")]
    TooManyCalories(u32),

    #[error("{0} cannot be negative")]
    NegativeMacro(&'static str),

    #[error("Water amount must be greater than 0")]
    NonPositiveWater,

    #[error("Entry ID cannot be empty")]
    BlankEntryId,

    #[error("Daily calorie target must be greater than 0")]
    NonPositiveCalorieTarget,

    #[error("{0} target cannot be negative")]
    NegativeMacroTarget(&'static str),

    #[error("Water target must be greater than 0")]
    NonPositiveWaterTarget,

    #[error("User name cannot be empty")]
    BlankUserName,

    #[error("{0} must be greater than 0")]
    NonPositiveBodyMetric(&'static str),
}

pub type ValidationResult = Result<(), ValidationError>;
