//! Request payload parsing with field-level validation.
//!
//! Bodies are read from a `serde_json::Value` rather than a derived struct so
//! that every bad field is reported under its own name in one response,
//! instead of failing on the first type mismatch.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

pub const NAME_MAX_LENGTH: usize = 20;
pub const DESCRIPTION_MAX_LENGTH: usize = 100;
pub const UNIT_MAX_LENGTH: usize = 20;
pub const MIN_TARGET: i64 = 1;
pub const MIN_AMOUNT: i64 = 0;

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const UNIQUE_HABIT_DATE: &str = "The fields habit, date must make a unique set.";

/// Field name to message, one message per field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    fields: HashMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record an error; the first message for a field wins
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.fields
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields: Vec<_> = self.fields.keys().map(String::as_str).collect();
        fields.sort_unstable();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// Reads typed fields out of a JSON object, collecting errors as it goes
struct Fields<'a> {
    map: &'a Map<String, Value>,
    partial: bool,
    errors: ValidationErrors,
}

impl<'a> Fields<'a> {
    fn new(body: &'a Value, partial: bool) -> Result<Self, ValidationErrors> {
        match body {
            Value::Object(map) => Ok(Self {
                map,
                partial,
                errors: ValidationErrors::new(),
            }),
            _ => Err(ValidationErrors::single(
                "non_field_errors",
                "Invalid data. Expected an object.",
            )),
        }
    }

    fn raw(&mut self, name: &str) -> Option<&'a Value> {
        let map: &'a Map<String, Value> = self.map;
        match map.get(name) {
            None => {
                if !self.partial {
                    self.errors.add(name, REQUIRED);
                }
                None
            }
            Some(Value::Null) => {
                self.errors.add(name, NOT_NULL);
                None
            }
            Some(value) => Some(value),
        }
    }

    fn string(&mut self, name: &str, max_length: usize) -> Option<String> {
        let value = match self.raw(name)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => {
                self.errors.add(name, "Not a valid string.");
                return None;
            }
        };

        if value.is_empty() {
            self.errors.add(name, NOT_BLANK);
            return None;
        }
        if value.chars().count() > max_length {
            self.errors.add(
                name,
                format!("Ensure this field has no more than {} characters.", max_length),
            );
            return None;
        }
        Some(value)
    }

    fn integer(&mut self, name: &str, min: i64) -> Option<i32> {
        let Some(value) = whole_number(self.raw(name)?) else {
            self.errors.add(name, "A valid integer is required.");
            return None;
        };

        if value < min {
            self.errors.add(
                name,
                format!("Ensure this value is greater than or equal to {}.", min),
            );
            return None;
        }
        match i32::try_from(value) {
            Ok(v) => Some(v),
            Err(_) => {
                self.errors.add(
                    name,
                    format!("Ensure this value is less than or equal to {}.", i32::MAX),
                );
                None
            }
        }
    }

    fn date(&mut self, name: &str) -> Option<NaiveDate> {
        let parsed = match self.raw(name)? {
            Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.errors.add(name, "Date has wrong format. Use YYYY-MM-DD.");
        }
        parsed
    }

    fn reference(&mut self, name: &str) -> Option<Uuid> {
        let value = self.raw(name)?;
        let parsed = value.as_str().and_then(|s| Uuid::parse_str(s.trim()).ok());
        if parsed.is_none() {
            self.errors.add(name, invalid_reference(value));
        }
        parsed
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// An integral value from a JSON number or numeric string.
/// Decimals are accepted only when nothing follows the point but zeros.
fn whole_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            let digits = match s.split_once('.') {
                Some((int, frac)) if frac.chars().all(|c| c == '0') => int,
                _ => s,
            };
            digits.parse::<i64>().ok()
        }
        _ => None,
    }
}

/// Message for a `habit` reference that does not resolve to a habit
pub fn invalid_reference(value: impl std::fmt::Display) -> String {
    format!("Invalid pk {} - object does not exist.", value)
}

/// Body of `POST /habits`
#[derive(Debug, Clone, PartialEq)]
pub struct NewHabit {
    pub name: String,
    pub description: String,
    pub target: i32,
    pub unit: String,
}

impl NewHabit {
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let patch = HabitPatch::from_json(body, false)?;
        match (patch.name, patch.description, patch.target, patch.unit) {
            (Some(name), Some(description), Some(target), Some(unit)) => Ok(Self {
                name,
                description,
                target,
                unit,
            }),
            // A full parse either errors or fills every field
            _ => Err(ValidationErrors::single("non_field_errors", REQUIRED)),
        }
    }
}

/// Body of `PATCH`/`PUT /habits/{id}`; `id`, `user` and `success` are ignored
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target: Option<i32>,
    pub unit: Option<String>,
}

impl HabitPatch {
    /// `partial = false` is a full replacement: every writable field is required
    pub fn from_json(body: &Value, partial: bool) -> Result<Self, ValidationErrors> {
        let mut fields = Fields::new(body, partial)?;
        let patch = Self {
            name: fields.string("name", NAME_MAX_LENGTH),
            description: fields.string("description", DESCRIPTION_MAX_LENGTH),
            target: fields.integer("target", MIN_TARGET),
            unit: fields.string("unit", UNIT_MAX_LENGTH),
        };
        fields.finish()?;
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.target.is_none() && self.unit.is_none()
    }
}

/// Body of `POST /daily-records`
#[derive(Debug, Clone, PartialEq)]
pub struct NewDailyRecord {
    pub habit: Uuid,
    pub date: NaiveDate,
    pub amount_achieved: i32,
}

impl NewDailyRecord {
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let patch = DailyRecordPatch::from_json(body, false)?;
        match (patch.habit, patch.date, patch.amount_achieved) {
            (Some(habit), Some(date), Some(amount_achieved)) => Ok(Self {
                habit,
                date,
                amount_achieved,
            }),
            _ => Err(ValidationErrors::single("non_field_errors", REQUIRED)),
        }
    }
}

/// Body of `PATCH`/`PUT /daily-records/{id}`; `id`, `target` and `unit` are ignored
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyRecordPatch {
    pub habit: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub amount_achieved: Option<i32>,
}

impl DailyRecordPatch {
    pub fn from_json(body: &Value, partial: bool) -> Result<Self, ValidationErrors> {
        let mut fields = Fields::new(body, partial)?;
        let patch = Self {
            habit: fields.reference("habit"),
            date: fields.date("date"),
            amount_achieved: fields.integer("amount_achieved", MIN_AMOUNT),
        };
        fields.finish()?;
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_new_habit() {
        let habit = NewHabit::from_json(&json!({
            "name": "Exercise",
            "description": "Workout daily",
            "target": 5,
            "unit": "days per week",
        }))
        .unwrap();
        assert_eq!(habit.name, "Exercise");
        assert_eq!(habit.target, 5);
    }

    #[test]
    fn new_habit_reports_every_missing_field() {
        let errors = NewHabit::from_json(&json!({})).unwrap_err();
        for field in ["name", "description", "target", "unit"] {
            assert_eq!(errors.get(field), Some(REQUIRED), "field {}", field);
        }
    }

    #[test]
    fn target_must_be_at_least_one() {
        let errors = NewHabit::from_json(&json!({
            "name": "Read",
            "description": "Pages",
            "target": 0,
            "unit": "pages",
        }))
        .unwrap_err();
        assert_eq!(
            errors.get("target"),
            Some("Ensure this value is greater than or equal to 1.")
        );
        assert!(errors.get("name").is_none());
    }

    #[test]
    fn string_limits_and_blanks() {
        let errors = HabitPatch::from_json(
            &json!({ "name": "x".repeat(21), "unit": "   ", "description": null }),
            true,
        )
        .unwrap_err();
        assert_eq!(
            errors.get("name"),
            Some("Ensure this field has no more than 20 characters.")
        );
        assert_eq!(errors.get("unit"), Some(NOT_BLANK));
        assert_eq!(errors.get("description"), Some(NOT_NULL));
    }

    #[test]
    fn partial_patch_ignores_read_only_fields() {
        let patch = HabitPatch::from_json(
            &json!({ "name": " Updated Habit ", "user": "someone", "id": "x", "success": true }),
            true,
        )
        .unwrap();
        assert_eq!(patch.name.as_deref(), Some("Updated Habit"));
        assert!(patch.target.is_none());
        assert!(!patch.is_empty());
        assert!(HabitPatch::from_json(&json!({}), true).unwrap().is_empty());
    }

    #[test]
    fn full_patch_requires_all_fields() {
        let errors = HabitPatch::from_json(&json!({ "name": "Only name" }), false).unwrap_err();
        assert!(errors.get("name").is_none());
        assert_eq!(errors.get("target"), Some(REQUIRED));
    }

    #[test]
    fn integers_accept_numeric_strings() {
        let patch = HabitPatch::from_json(&json!({ "target": "7" }), true).unwrap();
        assert_eq!(patch.target, Some(7));

        let errors = HabitPatch::from_json(&json!({ "target": "seven" }), true).unwrap_err();
        assert_eq!(errors.get("target"), Some("A valid integer is required."));

        let errors = HabitPatch::from_json(&json!({ "target": 2.5 }), true).unwrap_err();
        assert_eq!(errors.get("target"), Some("A valid integer is required."));

        let errors = HabitPatch::from_json(&json!({ "target": 3_000_000_000i64 }), true).unwrap_err();
        assert!(errors.get("target").unwrap().contains("less than or equal to"));
    }

    #[test]
    fn whole_decimals_count_as_integers() {
        let patch = HabitPatch::from_json(&json!({ "target": 5.0 }), true).unwrap();
        assert_eq!(patch.target, Some(5));

        let patch = HabitPatch::from_json(&json!({ "target": "7.0" }), true).unwrap();
        assert_eq!(patch.target, Some(7));

        let record = NewDailyRecord::from_json(&json!({
            "habit": Uuid::new_v4().to_string(),
            "date": "2024-01-01",
            "amount_achieved": 3.0,
        }))
        .unwrap();
        assert_eq!(record.amount_achieved, 3);

        let errors = HabitPatch::from_json(&json!({ "target": "7.5" }), true).unwrap_err();
        assert_eq!(errors.get("target"), Some("A valid integer is required."));

        let errors = HabitPatch::from_json(&json!({ "target": 0.0 }), true).unwrap_err();
        assert_eq!(errors.get("target"), Some("Ensure this value is greater than or equal to 1."));
    }

    #[test]
    fn negative_amount_is_attributed_to_its_field() {
        let habit = Uuid::new_v4();
        let errors = NewDailyRecord::from_json(&json!({
            "habit": habit.to_string(),
            "date": "2023-10-27",
            "amount_achieved": -1,
        }))
        .unwrap_err();
        assert_eq!(
            errors.get("amount_achieved"),
            Some("Ensure this value is greater than or equal to 0.")
        );
        assert!(errors.get("habit").is_none());
        assert!(errors.get("date").is_none());
    }

    #[test]
    fn parses_new_record() {
        let habit = Uuid::new_v4();
        let record = NewDailyRecord::from_json(&json!({
            "habit": habit.to_string(),
            "date": "2023-10-28",
            "amount_achieved": 0,
        }))
        .unwrap();
        assert_eq!(record.habit, habit);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2023, 10, 28).unwrap());
        assert_eq!(record.amount_achieved, 0);
    }

    #[test]
    fn bad_date_and_reference() {
        let errors = NewDailyRecord::from_json(&json!({
            "habit": 42,
            "date": "28/10/2023",
            "amount_achieved": 1,
        }))
        .unwrap_err();
        assert_eq!(errors.get("habit"), Some("Invalid pk 42 - object does not exist."));
        assert_eq!(errors.get("date"), Some("Date has wrong format. Use YYYY-MM-DD."));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let errors = DailyRecordPatch::from_json(&json!([1, 2, 3]), true).unwrap_err();
        assert!(errors.get("non_field_errors").is_some());
    }

    #[test]
    fn first_message_per_field_wins() {
        let mut errors = ValidationErrors::new();
        errors.add("date", "first");
        errors.add("date", "second");
        assert_eq!(errors.get("date"), Some("first"));
        assert_eq!(errors.to_string(), "invalid fields: date");
    }
}
