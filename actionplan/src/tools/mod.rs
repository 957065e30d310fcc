//! Built-in tools for the planning agent.
//!
//! - [`GetWeather`] (`get_weather`): weather for a city, falling back to
//!   [`Deps::default_city`](crate::schema::Deps::default_city)
//! - [`EstimateEffort`] (`estimate_effort`): hours for a list of tasks

mod effort;
mod weather;

pub use effort::{EstimateEffort, EstimateEffortArgs, estimate_effort};
pub use weather::{GetWeather, GetWeatherArgs, StaticWeather, WeatherSource};

use crate::schema::Deps;
use crate::tool::ToolRegistry;

/// Registry holding both built-in tools, with the stub weather source.
#[must_use]
pub fn default_tools() -> ToolRegistry<Deps> {
    ToolRegistry::new()
        .with(GetWeather::default())
        .with(EstimateEffort)
}

/// Tool names available as built-in tools.
pub const BUILTIN_TOOL_NAMES: &[&str] = &["estimate_effort", "get_weather"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tools() {
        let registry = default_tools();
        assert_eq!(registry.names(), BUILTIN_TOOL_NAMES);
    }
}
