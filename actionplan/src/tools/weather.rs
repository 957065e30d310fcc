//! Weather lookup tool.
//!
//! [`GetWeather`] delegates to a [`WeatherSource`]. The default
//! [`StaticWeather`] source never fails and always reports the same sky;
//! a live backend should report outages as [`ToolError::Lookup`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::error::ToolError;
use crate::schema::{Deps, Weather};
use crate::tool::{Tool, ToolResult};

/// Backend that produces a [`Weather`] for a city.
#[async_trait]
pub trait WeatherSource: Send + Sync + fmt::Debug {
    /// Look up current weather for `city`.
    ///
    /// The returned `location` must equal `city` exactly.
    async fn current(&self, city: &str) -> ToolResult<Weather>;
}

/// Fixed placeholder weather: 24.5 °C, "Partly Cloudy", everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticWeather;

impl StaticWeather {
    /// Temperature reported for every city.
    pub const TEMPERATURE_C: f64 = 24.5;
    /// Condition reported for every city.
    pub const CONDITION: &'static str = "Partly Cloudy";
}

#[async_trait]
impl WeatherSource for StaticWeather {
    async fn current(&self, city: &str) -> ToolResult<Weather> {
        Ok(Weather::new(city, Self::TEMPERATURE_C, Self::CONDITION))
    }
}

/// Arguments for [`GetWeather`].
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetWeatherArgs {
    /// City to look up. Omit to use the default city.
    #[serde(default)]
    pub city: Option<String>,
}

/// `get_weather` tool: current weather for a city.
#[derive(Debug, Clone)]
pub struct GetWeather {
    source: Arc<dyn WeatherSource>,
}

impl GetWeather {
    /// Create the tool over a custom weather source.
    #[must_use]
    pub fn new(source: impl WeatherSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Resolve the city to query: an empty or missing city means the default.
    #[must_use]
    pub fn resolve_city<'a>(deps: &'a Deps, city: Option<&'a str>) -> &'a str {
        city.filter(|c| !c.is_empty())
            .unwrap_or(deps.default_city.as_str())
    }
}

impl Default for GetWeather {
    fn default() -> Self {
        Self::new(StaticWeather)
    }
}

#[async_trait]
impl Tool<Deps> for GetWeather {
    const NAME: &'static str = "get_weather";
    type Args = GetWeatherArgs;
    type Output = Weather;

    fn description(&self) -> String {
        "Get the current weather for a city. \
         If no city is given, the configured default city is used."
            .into()
    }

    async fn call(&self, deps: &Deps, args: GetWeatherArgs) -> ToolResult<Weather> {
        let city = Self::resolve_city(deps, args.city.as_deref());
        let weather = self.source.current(city).await?;
        if weather.location != city {
            return Err(ToolError::lookup(format!(
                "weather source answered for '{}' instead of '{city}'",
                weather.location
            )));
        }
        Ok(weather)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tool::ToolDyn;

    #[derive(Debug)]
    struct Offline;

    #[async_trait]
    impl WeatherSource for Offline {
        async fn current(&self, city: &str) -> ToolResult<Weather> {
            Err(ToolError::lookup(format!("no route to weather service for {city}")))
        }
    }

    #[derive(Debug)]
    struct Normalizing;

    #[async_trait]
    impl WeatherSource for Normalizing {
        async fn current(&self, city: &str) -> ToolResult<Weather> {
            Ok(Weather::new(city.to_uppercase(), 10.0, "Rain"))
        }
    }

    #[tokio::test]
    async fn test_default_city() {
        let deps = Deps::default();
        let weather = GetWeather::default()
            .call(&deps, GetWeatherArgs::default())
            .await
            .unwrap();
        assert_eq!(
            weather,
            Weather::new("Bengaluru", 24.5, "Partly Cloudy")
        );
    }

    #[tokio::test]
    async fn test_explicit_city_is_not_normalized() {
        let deps = Deps::default();
        let args = GetWeatherArgs {
            city: Some("  san FRANCISCO ".into()),
        };
        let weather = GetWeather::default().call(&deps, args).await.unwrap();
        assert_eq!(weather.location, "  san FRANCISCO ");
    }

    #[tokio::test]
    async fn test_empty_city_falls_back() {
        let deps = Deps::new("Chennai");
        let args = GetWeatherArgs {
            city: Some(String::new()),
        };
        let weather = GetWeather::default().call(&deps, args).await.unwrap();
        assert_eq!(weather.location, "Chennai");
    }

    #[tokio::test]
    async fn test_custom_deps_city() {
        let deps = Deps::new("Kochi");
        let out = GetWeather::default()
            .call_json(&deps, json!({}))
            .await
            .unwrap();
        assert_eq!(
            out,
            json!({ "location": "Kochi", "temperature_c": 24.5, "condition": "Partly Cloudy" })
        );
    }

    #[tokio::test]
    async fn test_null_city_falls_back() {
        let deps = Deps::default();
        let out = GetWeather::default()
            .call_json(&deps, json!({ "city": null }))
            .await
            .unwrap();
        assert_eq!(out["location"], "Bengaluru");
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let err = GetWeather::new(Offline)
            .call(&Deps::default(), GetWeatherArgs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Lookup(_)));
    }

    #[tokio::test]
    async fn test_source_must_echo_city() {
        let err = GetWeather::new(Normalizing)
            .call(&Deps::default(), GetWeatherArgs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Lookup(_)));
    }

    #[test]
    fn test_return_schema_is_weather() {
        let schema = GetWeather::default().return_schema();
        assert!(schema["properties"]["temperature_c"].is_object());
        assert_eq!(schema["required"].as_array().map(Vec::len), Some(3));
    }
}
