//! AI-assisted narrative summary (spec.md §4.6). Calls a hosted
//! text-generation completion endpoint with a tight budget and falls back
//! to a deterministic template on any failure; this stage never propagates
//! an error to the caller, because the summary is advisory text, not a
//! safety input.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::request::Activity;
use crate::domain::{AirQuality, RiskScore, Terrain, WeatherHour};

const SUMMARY_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const SUMMARY_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: &'static str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Inputs the prompt is built from, mirroring what the caller already
/// computed earlier in the pipeline — no re-fetching.
pub struct SummaryInputs<'a> {
    pub activity: Activity,
    pub risk: &'a RiskScore,
    pub air_quality: &'a AirQuality,
    pub weather: Option<&'a WeatherHour>,
    pub terrain: &'a Terrain,
}

/// `(client, api_key?, inputs, budget) -> String`, never failing
/// (spec.md §4.6).
pub async fn generate(
    client: &Client,
    api_key: Option<&str>,
    inputs: &SummaryInputs<'_>,
    budget: Duration,
) -> String {
    let Some(api_key) = api_key else {
        return template_fallback(inputs);
    };

    match tokio::time::timeout(budget, call_completion(client, api_key, inputs)).await {
        Ok(Ok(text)) if !text.trim().is_empty() => text,
        Ok(Ok(_)) => {
            warn!("summary generator returned an empty completion, using template fallback");
            template_fallback(inputs)
        }
        Ok(Err(err)) => {
            warn!(error = %err, "summary generator request failed, using template fallback");
            template_fallback(inputs)
        }
        Err(_) => {
            warn!("summary generator exceeded its time budget, using template fallback");
            template_fallback(inputs)
        }
    }
}

async fn call_completion(
    client: &Client,
    api_key: &str,
    inputs: &SummaryInputs<'_>,
) -> Result<String, reqwest::Error> {
    let prompt = build_prompt(inputs);

    let body = ChatRequest {
        model: SUMMARY_MODEL,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
        max_tokens: 160,
        temperature: 0.4,
    };

    let response = client
        .post(SUMMARY_ENDPOINT)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await?
        .error_for_status()?;

    let parsed: ChatResponse = response.json().await?;
    Ok(parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content.trim().to_string())
        .unwrap_or_default())
}

fn build_prompt(inputs: &SummaryInputs<'_>) -> String {
    let weather_line = inputs
        .weather
        .map(|w| format!("{:.0}°C, {:.0}% humidity, {:.0} km/h wind", w.temp_c, w.humidity_pct, w.wind_kmh))
        .unwrap_or_else(|| "no forecast data available".to_string());

    format!(
        "Write a two-sentence safety summary for a {} trip. Risk score {:.1}/10 ({}). \
         Air quality index {} ({}). Weather: {}. Terrain: {} at {}m elevation. \
         Be concrete and actionable, do not repeat numbers verbatim.",
        inputs.activity.label(),
        inputs.risk.score,
        inputs.risk.category.label(),
        inputs.air_quality.aqi,
        inputs.air_quality.category.label(),
        weather_line,
        inputs.terrain.terrain_type.label(),
        inputs.terrain.elevation_m,
    )
}

fn template_fallback(inputs: &SummaryInputs<'_>) -> String {
    format!(
        "Conditions for this {} trip are rated {} ({:.1}/10). Air quality is {} and terrain is {}. \
         Review the checklist below before heading out.",
        inputs.activity.label(),
        inputs.risk.category.label(),
        inputs.risk.score,
        inputs.air_quality.category.label(),
        inputs.terrain.terrain_type.label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AqiCategory, DominantPollutant, RiskCategory, SubScores, TerrainType};

    fn sample_inputs() -> (RiskScore, AirQuality, Terrain) {
        let risk = RiskScore {
            score: 8.1,
            category: RiskCategory::from_score(8.1),
            sub_scores: SubScores {
                air: 9.0,
                weather: 8.0,
                uv: 8.5,
                terrain: 10.0,
            },
            warnings: vec![],
        };
        let air = AirQuality {
            aqi: 42,
            category: AqiCategory::from_aqi(42),
            pm25: 10.0,
            no2: 15.0,
            dominant_pollutant: DominantPollutant::Pm25,
        };
        let terrain = Terrain {
            elevation_m: 120,
            terrain_type: TerrainType::from_elevation_m(120),
            slope_degrees: None,
        };
        (risk, air, terrain)
    }

    #[tokio::test]
    async fn missing_api_key_uses_template_fallback() {
        let (risk, air, terrain) = sample_inputs();
        let inputs = SummaryInputs {
            activity: Activity::Hiking,
            risk: &risk,
            air_quality: &air,
            weather: None,
            terrain: &terrain,
        };
        let client = Client::new();
        let summary = generate(&client, None, &inputs, Duration::from_secs(5)).await;
        assert!(summary.contains("hiking") || summary.to_lowercase().contains("hiking"));
        assert!(!summary.is_empty());
    }

    #[test]
    fn template_fallback_never_panics_on_missing_weather() {
        let (risk, air, terrain) = sample_inputs();
        let inputs = SummaryInputs {
            activity: Activity::Camping,
            risk: &risk,
            air_quality: &air,
            weather: None,
            terrain: &terrain,
        };
        let text = template_fallback(&inputs);
        assert!(text.contains("camping"));
    }
}
