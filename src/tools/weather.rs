//! Weather lookup tool.
//!
//! Without an API key the tool returns simulated data (deterministic per
//! city, so tests are stable); with one it passes through to the
//! OpenWeatherMap current-weather endpoint.

use crate::registry::{InputSchema, SchemaProperty, ToolDefinition};
use crate::types::Result;
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

const OPENWEATHERMAP_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        "get_weather",
        "Get weather information for a specific city using OpenWeatherMap API",
        InputSchema::object(
            [
                (
                    "city",
                    SchemaProperty::new("string", "The city name to get weather for"),
                ),
                (
                    "apiKey",
                    SchemaProperty::new(
                        "string",
                        "OpenWeatherMap API key (optional, uses simulated data if not provided)",
                    ),
                ),
                (
                    "units",
                    SchemaProperty::new("string", "Temperature units (metric, imperial, kelvin)")
                        .with_default(json!("metric")),
                ),
            ],
            &["city"],
        ),
        Arc::new(|params| Box::pin(handle(params))),
    )
}

async fn handle(params: Value) -> Result<Value> {
    let city = params["city"].as_str().unwrap_or_default().to_string();
    let units = params["units"].as_str().unwrap_or("metric").to_string();

    match params["apiKey"].as_str() {
        Some(api_key) => Ok(fetch_weather(&city, api_key, &units).await),
        None => Ok(mock_weather(&city, &units)),
    }
}

/// Simulated conditions, stable for a given city name.
fn mock_weather(city: &str, units: &str) -> Value {
    let mut hasher = DefaultHasher::new();
    city.hash(&mut hasher);
    let seed = hasher.finish();

    json!({
        "success": true,
        "mock": true,
        "city": city,
        "temperature": 10 + (seed % 21) as i64,
        "description": "Simulated weather data - partly cloudy",
        "humidity": 30 + ((seed >> 8) % 51) as i64,
        "units": units,
        "timestamp": Utc::now().to_rfc3339(),
    })
}

async fn fetch_weather(city: &str, api_key: &str, units: &str) -> Value {
    let client = reqwest::Client::new();
    let response = client
        .get(OPENWEATHERMAP_URL)
        .query(&[("q", city), ("appid", api_key), ("units", units)])
        .timeout(Duration::from_secs(10))
        .send()
        .await;

    // API failures are part of this tool's result, not call failures.
    let data: Value = match response {
        Ok(r) if r.status().is_success() => match r.json().await {
            Ok(v) => v,
            Err(e) => return weather_error(city, units, &e.to_string()),
        },
        Ok(r) => return weather_error(city, units, &format!("status {}", r.status())),
        Err(e) => return weather_error(city, units, &e.to_string()),
    };

    json!({
        "success": true,
        "city": data["name"],
        "country": data["sys"]["country"],
        "temperature": data["main"]["temp"],
        "description": data["weather"][0]["description"],
        "humidity": data["main"]["humidity"],
        "pressure": data["main"]["pressure"],
        "windSpeed": data["wind"]["speed"].as_f64().unwrap_or(0.0),
        "units": units,
        "timestamp": Utc::now().to_rfc3339(),
    })
}

fn weather_error(city: &str, units: &str, message: &str) -> Value {
    json!({
        "success": false,
        "error": message,
        "city": city,
        "temperature": 0,
        "description": "",
        "humidity": 0,
        "units": units,
        "timestamp": Utc::now().to_rfc3339(),
    })
}
