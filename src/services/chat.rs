//! Conversation context assembly and chat orchestration
//!
//! Conversation history lives client-side and is replayed on every
//! request; the server is stateless per turn. The first assistant entry
//! in that history is a synthetic greeting generated client-side from
//! fetched data — the model never produced it, so it must not be replayed
//! as a model turn.

use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::external::gemini::{Content, GeminiClient, GenerationConfig};

/// Sampling temperature shared by both chat use cases
const CHAT_TEMPERATURE: f64 = 0.7;

/// Output budget for water-quality analyses
const WATER_MAX_TOKENS: u32 = 3000;

/// Output budget for planting analyses
const PLANTING_MAX_TOKENS: u32 = 2000;

/// Role of a conversation turn as held by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of the client-held conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// A single user-editable water-quality measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterParameter {
    pub name: String,
    pub value: String,
    pub unit: String,
}

/// Water parameters arrive either preformatted or as a structured list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WaterParameters {
    Text(String),
    List(Vec<WaterParameter>),
}

impl WaterParameters {
    /// Serialize into the prompt block, one `name: value unit` line per
    /// parameter. Entries with an empty value are excluded.
    pub fn into_prompt_block(self) -> String {
        match self {
            WaterParameters::Text(text) => text,
            WaterParameters::List(parameters) => parameters
                .iter()
                .filter(|p| !p.value.trim().is_empty())
                .map(|p| format!("{}: {} {}", p.name, p.value, p.unit).trim_end().to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Weather snapshot as posted back by the client for planting chat
#[derive(Debug, Clone, Deserialize)]
pub struct PlantingWeather {
    /// Temperature in Kelvin
    pub temp: f64,
    /// Current conditions description
    pub weather: String,
    pub air_quality: i64,
    pub no2: f64,
    pub pm10: f64,
    pub pm2_5: f64,
    pub co2_prediction: String,
    #[serde(default)]
    pub alerts: Vec<String>,
}

/// Reshape prior turns into the model's alternating-role history
///
/// Keeps every user turn and every assistant turn except the one at
/// index 0 (the synthetic greeting).
pub fn build_history(prior: &[ChatMessage]) -> Vec<Content> {
    prior
        .iter()
        .enumerate()
        .filter(|(index, message)| message.role == ChatRole::User || *index > 0)
        .map(|(_, message)| match message.role {
            ChatRole::User => Content::user(message.content.clone()),
            ChatRole::Assistant => Content::model(message.content.clone()),
        })
        .collect()
}

/// Whether this request is the conversation's first real exchange
///
/// A history of length 0 (nothing yet) or 1 (only the synthetic greeting)
/// both count as first; from length 2 on, the domain context is already
/// anchored in the model's history.
pub fn is_first_exchange(prior: &[ChatMessage]) -> bool {
    prior.len() <= 1
}

/// Build the water-quality domain context block
pub fn water_context(parameters: &str) -> String {
    let parameters = if parameters.trim().is_empty() {
        "No parameters provided"
    } else {
        parameters
    };

    format!(
        "You are an expert in water quality and water treatment.\n\
         Your specialty is analyzing water-quality parameters and determining\n\
         their potential uses: human consumption, agricultural irrigation,\n\
         industrial use, recreation, and ecosystem maintenance. You always\n\
         recommend specific treatments when necessary and cite international\n\
         water-quality standards.\n\
         \n\
         WATER QUALITY PARAMETERS:\n\
         {}\n\
         \n\
         Please include in your analysis:\n\
         1. An overall assessment of water quality based on these parameters.\n\
         2. Potential specific uses (human consumption, agricultural, industrial, recreational, ecosystems)\n\
         3. For each potential use: current suitability, parameters that meet/fail the standard, required treatments\n\
         4. Suggested treatments or improvement processes\n\
         5. Precautions or special considerations\n\
         6. An explanation of how each parameter influences water quality\n\
         \n\
         Support your conclusions with references to standards (WHO, EPA, local regulations).",
        parameters
    )
}

/// Build the planting domain context block
pub fn planting_context(
    weather: &PlantingWeather,
    crops: &[String],
    location: &str,
) -> String {
    let mut lines = vec![
        "You are an expert agronomist specialized in analyzing climate conditions,".to_string(),
        "air quality and how they influence planting and harvesting.".to_string(),
        "Provide detailed analyses, scientific yet accessible, and always include".to_string(),
        "viability percentages grounded in concrete data.".to_string(),
        String::new(),
        "LOCATION CONTEXT:".to_string(),
        format!("- Location: {}", location),
        format!(
            "- Temperature: {}K ({:.1}\u{b0}C)",
            weather.temp,
            weather.temp - 273.15
        ),
        format!("- Conditions: {}", weather.weather),
        format!("- Air quality (AQI): {}", weather.air_quality),
        format!("- NO2: {} \u{b5}g/m\u{b3}", weather.no2),
        format!("- PM10: {} \u{b5}g/m\u{b3}", weather.pm10),
        format!("- PM2.5: {} \u{b5}g/m\u{b3}", weather.pm2_5),
        format!("- {}", weather.co2_prediction),
        format!("- Common crops in the region: {}", crops.join(", ")),
    ];

    if !weather.alerts.is_empty() {
        lines.push(format!("- Weather alerts: {}", weather.alerts.join(", ")));
    }

    lines.join("\n")
}

/// Chat orchestration over the generative model
#[derive(Clone)]
pub struct ChatOrchestrator {
    gemini: GeminiClient,
}

impl ChatOrchestrator {
    /// Create a new ChatOrchestrator instance
    pub fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }

    /// Answer a water-quality question
    pub async fn reply_water(
        &self,
        message: &str,
        water_parameters: &str,
        prior: &[ChatMessage],
    ) -> AppResult<String> {
        let outgoing = first_message_or_raw(prior, message, || water_context(water_parameters));
        self.send(prior, outgoing, WATER_MAX_TOKENS).await
    }

    /// Answer a planting question
    pub async fn reply_planting(
        &self,
        message: &str,
        weather: &PlantingWeather,
        crops: &[String],
        location: &str,
        prior: &[ChatMessage],
    ) -> AppResult<String> {
        let outgoing =
            first_message_or_raw(prior, message, || planting_context(weather, crops, location));
        self.send(prior, outgoing, PLANTING_MAX_TOKENS).await
    }

    async fn send(
        &self,
        prior: &[ChatMessage],
        outgoing: String,
        max_output_tokens: u32,
    ) -> AppResult<String> {
        let mut contents = build_history(prior);
        contents.push(Content::user(outgoing));

        self.gemini
            .generate(
                contents,
                GenerationConfig {
                    temperature: CHAT_TEMPERATURE,
                    max_output_tokens,
                },
            )
            .await
    }
}

/// Prepend the domain context on the first exchange only
fn first_message_or_raw(
    prior: &[ChatMessage],
    message: &str,
    context: impl FnOnce() -> String,
) -> String {
    if is_first_exchange(prior) {
        format!("{}\n\n{}", context(), message)
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(content: &str) -> ChatMessage {
        ChatMessage {
            role: ChatRole::User,
            content: content.to_string(),
        }
    }

    fn assistant(content: &str) -> ChatMessage {
        ChatMessage {
            role: ChatRole::Assistant,
            content: content.to_string(),
        }
    }

    fn planting_weather() -> PlantingWeather {
        PlantingWeather {
            temp: 293.15,
            weather: "scattered clouds".to_string(),
            air_quality: 2,
            no2: 12.5,
            pm10: 20.0,
            pm2_5: 8.3,
            co2_prediction: "Moderate CO2 levels (400-450 ppm)".to_string(),
            alerts: vec![],
        }
    }

    #[test]
    fn test_history_drops_synthetic_greeting() {
        let prior = vec![assistant("greeting"), user("U1"), assistant("A1")];

        let history = build_history(&prior);

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, "user");
        assert_eq!(history[0].parts[0].text, "U1");
        assert_eq!(history[1].role, "model");
        assert_eq!(history[1].parts[0].text, "A1");
    }

    #[test]
    fn test_history_greeting_dropped_regardless_of_content() {
        let prior = vec![assistant("A0"), assistant("A1")];

        let history = build_history(&prior);

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].parts[0].text, "A1");
    }

    #[test]
    fn test_history_keeps_leading_user_turn() {
        let prior = vec![user("U0"), assistant("A0")];

        let history = build_history(&prior);

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, "user");
        assert_eq!(history[1].role, "model");
    }

    #[test]
    fn test_first_exchange_classification() {
        assert!(is_first_exchange(&[]));
        assert!(is_first_exchange(&[assistant("greeting")]));
        assert!(!is_first_exchange(&[assistant("greeting"), user("U1")]));
    }

    #[test]
    fn test_water_first_message_embeds_parameters_verbatim() {
        let prior = vec![assistant("greeting")];
        let params = "pH: 7.2\nTemperatura: 25 \u{b0}C";

        let outgoing =
            first_message_or_raw(&prior, "Analyze these parameters", || water_context(params));

        assert!(outgoing.starts_with("You are an expert in water quality"));
        assert!(outgoing.contains("WATER QUALITY PARAMETERS:\npH: 7.2\nTemperatura: 25 \u{b0}C"));
        assert!(outgoing.ends_with("\n\nAnalyze these parameters"));
    }

    #[test]
    fn test_subsequent_message_is_raw_user_text() {
        let prior = vec![assistant("greeting"), user("U1")];

        let outgoing = first_message_or_raw(&prior, "And for irrigation?", || {
            water_context("pH: 7.2")
        });

        assert_eq!(outgoing, "And for irrigation?");
    }

    #[test]
    fn test_water_context_placeholder_for_empty_parameters() {
        let context = water_context("   ");
        assert!(context.contains("WATER QUALITY PARAMETERS:\nNo parameters provided"));
    }

    #[test]
    fn test_water_context_is_deterministic() {
        let params = "pH: 7.2\nTurbidity: 1.5 NTU";
        assert_eq!(water_context(params), water_context(params));
    }

    #[test]
    fn test_planting_context_golden() {
        let crops = vec!["wheat".to_string(), "maize".to_string()];
        let context = planting_context(&planting_weather(), &crops, "Lyon, france");

        let expected = "You are an expert agronomist specialized in analyzing climate conditions,\n\
            air quality and how they influence planting and harvesting.\n\
            Provide detailed analyses, scientific yet accessible, and always include\n\
            viability percentages grounded in concrete data.\n\
            \n\
            LOCATION CONTEXT:\n\
            - Location: Lyon, france\n\
            - Temperature: 293.15K (20.0\u{b0}C)\n\
            - Conditions: scattered clouds\n\
            - Air quality (AQI): 2\n\
            - NO2: 12.5 \u{b5}g/m\u{b3}\n\
            - PM10: 20 \u{b5}g/m\u{b3}\n\
            - PM2.5: 8.3 \u{b5}g/m\u{b3}\n\
            - Moderate CO2 levels (400-450 ppm)\n\
            - Common crops in the region: wheat, maize";

        assert_eq!(context, expected);
    }

    #[test]
    fn test_planting_context_includes_alert_line_only_when_present() {
        let crops = vec!["rice".to_string()];
        let mut weather = planting_weather();

        let without = planting_context(&weather, &crops, "india");
        assert!(!without.contains("Weather alerts"));

        weather.alerts = vec!["light rain on 2024-05-01 03:00:00".to_string()];
        let with = planting_context(&weather, &crops, "india");
        assert!(with.ends_with("- Weather alerts: light rain on 2024-05-01 03:00:00"));
    }

    #[test]
    fn test_water_parameter_list_excludes_empty_values() {
        let parameters = WaterParameters::List(vec![
            WaterParameter {
                name: "pH".to_string(),
                value: "7.2".to_string(),
                unit: String::new(),
            },
            WaterParameter {
                name: "Turbidity".to_string(),
                value: "  ".to_string(),
                unit: "NTU".to_string(),
            },
            WaterParameter {
                name: "Temperature".to_string(),
                value: "25".to_string(),
                unit: "\u{b0}C".to_string(),
            },
        ]);

        assert_eq!(
            parameters.into_prompt_block(),
            "pH: 7.2\nTemperature: 25 \u{b0}C"
        );
    }
}
