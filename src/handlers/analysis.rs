// Urine analysis endpoints

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};
use warp::http::StatusCode;

use crate::llm::{generate_structured, GenerateRequest, LlmProvider, Message};
use crate::models::{AnalysisRequest, UrineAnalysis};

const ANALYSIS_PROMPT: &str = "Analyze the urine quality based on the following parameters:\n\n\
    PH Level: {ph_level} is the ph level of urine\n\n\
    Color: {color} is the color of urine\n\n\
    Mass: {mass} is mass of the urine in grams\n\n\
    Velocity: {velocity} is the velocity of urine flow in ml/second\n\n\
    Provide a detailed analysis and suggestions for improvement if necessary. \
    Just answer in short just one paragraph 6 sentence. use bahasa indonesia.";

// POST /analysis/ai
pub async fn analysis_ai_handler(
    request: AnalysisRequest,
    provider: Arc<dyn LlmProvider>,
) -> Result<impl warp::Reply, warp::Rejection> {
    info!("Running urine analysis");
    let prompt = build_analysis_prompt(&request);
    let generate = GenerateRequest::new(vec![Message::user(prompt)]);

    match generate_structured::<UrineAnalysis>(provider.as_ref(), generate).await {
        Ok(analysis) => Ok(warp::reply::with_status(
            warp::reply::json(&analysis),
            StatusCode::OK,
        )),
        Err(e) => {
            error!("Urine analysis failed: {}", e);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({"error": "analysis generation failed"})),
                StatusCode::BAD_GATEWAY,
            ))
        }
    }
}

fn build_analysis_prompt(request: &AnalysisRequest) -> String {
    ANALYSIS_PROMPT
        .replace("{ph_level}", &prompt_value(&request.ph_level))
        .replace("{color}", &prompt_value(&request.color))
        .replace("{mass}", &prompt_value(&request.raw_sensor_data.mass))
        .replace("{velocity}", &prompt_value(&request.raw_sensor_data.velocity))
}

// Strings render without quotes, missing values render empty.
fn prompt_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Fixed sensor readings served until the hardware endpoints go live.

// GET /analysis/ph
pub async fn ph_handler() -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(
        &serde_json::json!({"status": "ok", "result": 1}),
    ))
}

// GET /analysis/color
pub async fn color_handler() -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(
        &serde_json::json!({"status": "ok", "result": "red"}),
    ))
}

// GET /analysis/mass
pub async fn mass_handler() -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(
        &serde_json::json!({"status": "ok", "result": 5}),
    ))
}

// GET /analysis/velocity
pub async fn velocity_handler() -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(
        &serde_json::json!({"status": "ok", "result": 1000}),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawSensorData;
    use serde_json::json;

    #[test]
    fn test_build_analysis_prompt() {
        let request = AnalysisRequest {
            ph_level: json!(6.5),
            color: json!("yellow"),
            raw_sensor_data: RawSensorData {
                mass: json!(5),
                velocity: json!(1000),
            },
        };
        let prompt = build_analysis_prompt(&request);
        assert!(prompt.contains("PH Level: 6.5 is the ph level of urine"));
        assert!(prompt.contains("Color: yellow is the color of urine"));
        assert!(prompt.contains("Mass: 5 is mass of the urine in grams"));
        assert!(prompt.contains("Velocity: 1000 is the velocity of urine flow"));
        assert!(prompt.contains("use bahasa indonesia"));
    }

    #[test]
    fn test_build_analysis_prompt_missing_values_render_empty() {
        let request: AnalysisRequest = serde_json::from_str("{}").unwrap();
        let prompt = build_analysis_prompt(&request);
        assert!(prompt.contains("PH Level:  is the ph level of urine"));
        assert!(prompt.contains("Color:  is the color of urine"));
    }

    #[test]
    fn test_prompt_value_rendering() {
        assert_eq!(prompt_value(&json!("red")), "red");
        assert_eq!(prompt_value(&json!(7)), "7");
        assert_eq!(prompt_value(&json!(6.5)), "6.5");
        assert_eq!(prompt_value(&Value::Null), "");
    }
}
