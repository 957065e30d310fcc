//! Record shapes exchanged with the model and the tools.
//!
//! Every record is built through an explicit validating constructor
//! ([`Weather::from_value`], [`ActionPlan::from_value`], [`ActionPlan::new`])
//! that reports *all* violated fields at once. `Deserialize` goes through the
//! same constructors, so there is no way to obtain an unchecked value.
//!
//! JSON Schemas for the model are derived with `schemars`; doc comments on
//! fields become their descriptions.

mod fields;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use fields::FieldReader;

/// City used when a tool call does not name one.
pub const DEFAULT_CITY: &str = "Bengaluru";

/// A point-in-time weather observation.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Weather {
    /// Where the observation was taken.
    pub location: String,
    /// Temperature in degrees Celsius.
    pub temperature_c: f64,
    /// Short description of the sky, e.g. "Partly Cloudy".
    pub condition: String,
}

impl Weather {
    /// Create a weather observation. No range constraint applies.
    #[must_use]
    pub fn new(
        location: impl Into<String>,
        temperature_c: f64,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            temperature_c,
            condition: condition.into(),
        }
    }

    /// Validate and build a `Weather` from JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every missing or mistyped field.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        Self::from_value_at(value, "")
    }

    fn from_value_at(value: &Value, prefix: &str) -> Result<Self, ValidationError> {
        let mut reader = FieldReader::new(value, prefix)?;
        let location = reader.string("location");
        let temperature_c = reader.number("temperature_c");
        let condition = reader.string("condition");
        reader.finish()?;

        match (location, temperature_c, condition) {
            (Some(location), Some(temperature_c), Some(condition)) => Ok(Self {
                location,
                temperature_c,
                condition,
            }),
            _ => Err(ValidationError::field(prefix, "incomplete weather record")),
        }
    }
}

impl<'de> Deserialize<'de> for Weather {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// The agent's final structured deliverable.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ActionPlan {
    /// One-line summary
    pub title: String,
    /// Actionable steps
    pub steps: Vec<String>,
    /// Estimated effort in hours
    #[schemars(range(min = 0))]
    pub effort_hours: f64,
    /// Weather relevant to the plan, if any was looked up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<Weather>,
}

impl ActionPlan {
    /// Create a validated plan.
    ///
    /// `steps` may be empty; only `effort_hours` is constrained.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when `effort_hours` is negative or NaN.
    pub fn new(
        title: impl Into<String>,
        steps: Vec<String>,
        effort_hours: f64,
        weather: Option<Weather>,
    ) -> Result<Self, ValidationError> {
        check_effort(effort_hours).map_err(|msg| ValidationError::field("effort_hours", msg))?;
        Ok(Self {
            title: title.into(),
            steps,
            effort_hours,
            weather,
        })
    }

    /// Validate and build an `ActionPlan` from JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every violated field, including
    /// those nested under `weather`.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let mut reader = FieldReader::new(value, "")?;
        let title = reader.string("title");
        let steps = reader.string_list("steps");
        let effort_hours = reader.number("effort_hours");
        if let Some(Err(msg)) = effort_hours.map(check_effort) {
            reader.reject("effort_hours", msg);
        }
        let weather = reader.optional("weather", Weather::from_value_at);
        reader.finish()?;

        match (title, steps, effort_hours, weather) {
            (Some(title), Some(steps), Some(effort_hours), Some(weather)) => Ok(Self {
                title,
                steps,
                effort_hours,
                weather,
            }),
            _ => Err(ValidationError::field("", "incomplete action plan")),
        }
    }

    /// Pretty JSON rendering with the exact field names of the record.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'de> Deserialize<'de> for ActionPlan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

fn check_effort(effort_hours: f64) -> Result<(), &'static str> {
    if effort_hours >= 0.0 {
        Ok(())
    } else if effort_hours.is_nan() {
        Err("must be a number, got NaN")
    } else {
        Err("must be greater than or equal to 0")
    }
}

/// Per-run configuration handed to every tool call.
///
/// Built once per top-level run and only ever lent out by shared reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deps {
    /// City used when a tool call does not name one.
    #[serde(default = "default_city")]
    pub default_city: String,
}

impl Deps {
    /// Create dependencies with a custom default city.
    #[must_use]
    pub fn new(default_city: impl Into<String>) -> Self {
        Self {
            default_city: default_city.into(),
        }
    }
}

impl Default for Deps {
    fn default() -> Self {
        Self::new(DEFAULT_CITY)
    }
}

fn default_city() -> String {
    DEFAULT_CITY.to_owned()
}

/// A type the runner can demand as the final answer of a run.
pub trait StructuredOutput: Serialize + JsonSchema + Sized + Send {
    /// Name under which the schema is presented to the model.
    const NAME: &'static str;

    /// Validate the model's final JSON answer.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the answer does not conform.
    fn from_output(value: &Value) -> Result<Self, ValidationError>;
}

impl StructuredOutput for ActionPlan {
    const NAME: &'static str = "ActionPlan";

    fn from_output(value: &Value) -> Result<Self, ValidationError> {
        Self::from_value(value)
    }
}

/// Derive a JSON Schema for `T` as a plain JSON value.
///
/// The `$schema` meta key is dropped; providers reject or ignore it.
#[must_use]
pub fn json_schema_for<T: JsonSchema>() -> Value {
    let mut value = serde_json::to_value(schemars::schema_for!(T)).unwrap_or_default();
    if let Value::Object(map) = &mut value {
        map.remove("$schema");
    }
    value
}
