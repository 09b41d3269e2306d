//! Weather provider
//!
//! Current conditions from an OpenWeatherMap-compatible endpoint, reduced to
//! five display strings. Answers use the provider's own `{code, weather, msg}`
//! shape: `code 0` on success, `-1` otherwise.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::gateway::Gateway;

pub const WEATHER_OK: i64 = 0;
pub const WEATHER_FAILED: i64 = -1;

const FETCH_FAILED: &str = "Failed to fetch weather data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    pub cityname: String,
    pub weather: String,
    pub temperature: String,
    pub humidity: String,
    pub wind_speed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherInfo>,
    pub msg: String,
}

impl WeatherResponse {
    pub fn success(weather: WeatherInfo) -> Self {
        Self {
            code: WEATHER_OK,
            weather: Some(weather),
            msg: "success".to_string(),
        }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            code: WEATHER_FAILED,
            weather: None,
            msg: msg.into(),
        }
    }
}

#[derive(Clone)]
pub struct WeatherClient {
    gateway: Gateway,
    api_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(gateway: Gateway, api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        if api_key.is_empty() {
            warn!("No weather API key configured, weather lookups will be rejected upstream");
        }
        Self {
            gateway,
            api_url: api_url.into(),
            api_key,
        }
    }

    pub async fn by_city_name(&self, cityname: &str) -> WeatherResponse {
        debug!(city = %cityname, "Weather lookup by city");
        self.lookup(&[("q", cityname.to_string())]).await
    }

    pub async fn by_coordinates(&self, latitude: f64, longitude: f64) -> WeatherResponse {
        debug!(latitude, longitude, "Weather lookup by coordinates");
        self.lookup(&[("lat", latitude.to_string()), ("lon", longitude.to_string())])
            .await
    }

    async fn lookup(&self, location: &[(&str, String)]) -> WeatherResponse {
        let mut query: Vec<(&str, String)> = location.to_vec();
        query.push(("units", "metric".to_string()));
        query.push(("appid", self.api_key.clone()));

        match self.gateway.get_json_any_status(&self.api_url, &query).await {
            Ok(raw) => match format_weather(&raw) {
                Ok(info) => WeatherResponse::success(info),
                Err(msg) => WeatherResponse::failure(msg),
            },
            Err(e) => {
                warn!(error = %e, "Weather provider unreachable");
                WeatherResponse::failure(FETCH_FAILED)
            }
        }
    }
}

/// Reduce a provider payload to display strings, or explain why it cannot be
pub fn format_weather(raw: &Value) -> Result<WeatherInfo, String> {
    let status = raw.get("cod").and_then(|cod| match cod {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    });
    if status != Some(200) {
        return Err(raw
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(FETCH_FAILED)
            .to_string());
    }

    let number = |section: &str, key: &str| -> Result<String, String> {
        raw.get(section)
            .and_then(|s| s.get(key))
            .filter(|v| v.is_number())
            .map(Value::to_string)
            .ok_or_else(|| format!("missing {}.{} in weather data", section, key))
    };

    let cityname = raw
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let weather = raw
        .get("weather")
        .and_then(|w| w.get(0))
        .and_then(|w| w.get("description"))
        .and_then(Value::as_str)
        .ok_or_else(|| "missing weather description in weather data".to_string())?
        .to_string();

    Ok(WeatherInfo {
        cityname,
        weather,
        temperature: format!("{}°C", number("main", "temp")?),
        humidity: format!("{}%", number("main", "humidity")?),
        wind_speed: format!("{} m/s", number("wind", "speed")?),
    })
}
