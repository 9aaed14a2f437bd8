//! Recurrence normalization.
//!
//! The create-habit form describes a recurrence in detail (weekdays, monthly
//! rules, custom intervals); only the coarse [`Frequency`] is persisted.

use std::collections::HashSet;

use chrono::Weekday;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use habitual_core::types::Frequency;

/// Shape of a recurrence as chosen in the habit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleType {
    Weekly,
    Monthly,
    Custom,
}

impl ScheduleType {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Unit of a custom "every N ..." recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalUnit {
    Days,
    Weeks,
    Months,
}

impl IntervalUnit {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "days" => Some(Self::Days),
            "weeks" => Some(Self::Weeks),
            "months" => Some(Self::Months),
            _ => None,
        }
    }
}

/// Recurrence fields of a create-habit request.
///
/// Deserialization never fails on these fields: values of the wrong type or
/// unknown names are treated as not set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceInput {
    #[serde(default, deserialize_with = "lenient_schedule_type")]
    pub schedule_type: Option<ScheduleType>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub selected_days: Vec<String>,
    #[serde(default)]
    pub monthly_type: Option<Value>,
    #[serde(default)]
    pub monthly_date: Option<Value>,
    #[serde(default)]
    pub monthly_weekday: Option<Value>,
    #[serde(default)]
    pub monthly_week: Option<Value>,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub custom_interval: Option<i64>,
    #[serde(default, deserialize_with = "lenient_interval_unit")]
    pub custom_unit: Option<IntervalUnit>,
}

impl RecurrenceInput {
    fn has_monthly_rule(&self) -> bool {
        [
            &self.monthly_type,
            &self.monthly_date,
            &self.monthly_weekday,
            &self.monthly_week,
        ]
        .into_iter()
        .any(|field| field.as_ref().is_some_and(|v| !v.is_null()))
    }

    /// Number of distinct weekdays named in `selected_days`; unrecognized names are skipped.
    #[must_use]
    pub fn distinct_weekday_count(&self) -> usize {
        self.selected_days
            .iter()
            .filter_map(|day| day.trim().parse::<Weekday>().ok())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// ## Summary
/// Reduces a recurrence description to the frequency stored on the habit.
///
/// First match wins:
/// 1. weekly on all seven weekdays is `Daily`
/// 2. monthly is `Monthly` whatever the monthly rule says
/// 3. any other weekly selection is `Weekly`
/// 4. custom "every 1 day/week/month" maps to that unit; other intervals are `Weekly`
/// 5. no schedule type is `Daily`
///
/// The stored frequency cannot express monthly rules such as "last Friday";
/// they are dropped here.
#[must_use]
pub fn normalize(input: &RecurrenceInput) -> Frequency {
    match input.schedule_type {
        Some(ScheduleType::Weekly) if input.distinct_weekday_count() == 7 => Frequency::Daily,
        Some(ScheduleType::Monthly) => {
            if input.has_monthly_rule() {
                tracing::debug!(
                    monthly_type = ?input.monthly_type,
                    monthly_date = ?input.monthly_date,
                    monthly_weekday = ?input.monthly_weekday,
                    monthly_week = ?input.monthly_week,
                    "Monthly rule details are not persisted"
                );
            }
            Frequency::Monthly
        }
        Some(ScheduleType::Weekly) => Frequency::Weekly,
        Some(ScheduleType::Custom) => match (input.custom_unit, input.custom_interval) {
            (Some(IntervalUnit::Days), Some(1)) => Frequency::Daily,
            (Some(IntervalUnit::Weeks), Some(1)) => Frequency::Weekly,
            (Some(IntervalUnit::Months), Some(1)) => Frequency::Monthly,
            _ => Frequency::Weekly,
        },
        None => Frequency::default(),
    }
}

fn lenient_schedule_type<'de, D>(deserializer: D) -> Result<Option<ScheduleType>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(ScheduleType::from_name))
}

fn lenient_interval_unit<'de, D>(deserializer: D) -> Result<Option<IntervalUnit>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(IntervalUnit::from_name))
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Integral JSON numbers only, including whole floats such as `1.0`;
/// `1.5`, `"1"` and `null` are not set.
pub(crate) fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_i64().or_else(|| {
        // A whole float prints without a fraction; anything else fails to parse.
        value.as_f64().and_then(|float| float.to_string().parse().ok())
    }))
}
