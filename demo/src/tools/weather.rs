//! `weather` tool.

use std::sync::Arc;

use async_trait::async_trait;
use hellomcp_server::{ToolError, ToolHandler};
use hellomcp_types::{Arguments, PropertySchema, Tool, ToolInputSchema, ToolResult};

/// Location reported when the caller gives none.
pub const DEFAULT_LOCATION: &str = "Unknown";

/// Units used when the caller gives none.
pub const DEFAULT_UNITS: &str = "metric";

/// A point-in-time weather observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherReading {
    /// Temperature, already formatted for the requested units
    pub temperature: String,
    /// Short description, e.g. "Sunny"
    pub conditions: String,
}

/// Source of current weather.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Current conditions at `location`.
    async fn current(&self, location: &str, units: &str) -> Result<WeatherReading, ToolError>;
}

/// Returns the same reading for every location.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedWeather;

#[async_trait]
impl WeatherSource for FixedWeather {
    async fn current(&self, _location: &str, _units: &str) -> Result<WeatherReading, ToolError> {
        Ok(WeatherReading {
            temperature: "22".to_string(),
            conditions: "Sunny".to_string(),
        })
    }
}

/// Reports current weather for a location.
pub struct WeatherTool {
    source: Arc<dyn WeatherSource>,
}

impl WeatherTool {
    /// Tool backed by `source`.
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }

    /// Descriptor advertised in `tools/list`.
    pub fn descriptor() -> Tool {
        Tool::new("weather", "Get current weather for a location").with_schema(
            ToolInputSchema::object()
                .property("location", PropertySchema::string("City name or coordinates"))
                .property(
                    "units",
                    PropertySchema::string("Units of measurement, e.g., metric, imperial"),
                ),
        )
    }
}

#[async_trait]
impl ToolHandler for WeatherTool {
    async fn call(&self, arguments: Arguments) -> Result<ToolResult, ToolError> {
        let location = arguments.string_or("location", DEFAULT_LOCATION);
        let units = arguments.string_or("units", DEFAULT_UNITS);
        let reading = self.source.current(&location, &units).await?;
        Ok(ToolResult::text(format!(
            "Weather for {location}: {}°, {}",
            reading.temperature, reading.conditions
        )))
    }
}

impl std::fmt::Debug for WeatherTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherTool").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl WeatherSource for Recording {
        async fn current(&self, location: &str, units: &str) -> Result<WeatherReading, ToolError> {
            self.calls
                .lock()
                .unwrap()
                .push((location.to_string(), units.to_string()));
            Ok(WeatherReading {
                temperature: "-3".into(),
                conditions: "Snow".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_defaults_applied() {
        let tool = WeatherTool::new(Arc::new(FixedWeather));
        let result = tool.call(Arguments::new()).await.unwrap();
        assert_eq!(result.first_text(), Some("Weather for Unknown: 22°, Sunny"));
        assert!(!result.is_error);
    }

    #[tokio::test]
    async fn test_arguments_reach_the_source() {
        let source = Arc::new(Recording::default());
        let tool = WeatherTool::new(source.clone());
        let result = tool
            .call(
                Arguments::new()
                    .with("location", "Oslo")
                    .with("units", "imperial"),
            )
            .await
            .unwrap();

        assert_eq!(result.first_text(), Some("Weather for Oslo: -3°, Snow"));
        assert_eq!(
            source.calls.lock().unwrap().as_slice(),
            &[("Oslo".to_string(), "imperial".to_string())]
        );
    }
}
