// Data structures (requests, replies, analysis schema)

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::chat::ChatRole;

// Analysis request body
//
// Every field defaults when absent, and values may arrive as strings or
// numbers depending on the sensor firmware.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub ph_level: serde_json::Value,
    #[serde(default)]
    pub color: serde_json::Value,
    #[serde(default)]
    pub raw_sensor_data: RawSensorData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSensorData {
    #[serde(default)]
    pub mass: serde_json::Value,
    #[serde(default)]
    pub velocity: serde_json::Value,
}

// Overall judgement of a urine analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Normal,
    Abnormal,
    NeedsReview,
}

// One potential disease or health risk
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RiskDisease {
    /// Name of the disease or health risk.
    pub name: String,
    /// Estimated likelihood (in percentage) of the disease or health risk.
    pub percentage: f64,
    /// The specific urine quality parameters that indicate the presence of this disease or health risk. answer in short just one sentence
    pub based_on: String,
    /// A brief description of the disease or health risk.
    pub description: String,
}

// Structured result of a urine quality analysis
//
// The doc comments double as schema descriptions sent to the model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UrineAnalysis {
    /// A detailed analysis of the urine quality based on the provided parameters.
    pub analysis: String,
    /// Step-by-step suggestions for improving urine quality if any issues are detected.
    pub solve_step: String,
    /// Potential diseases or health risks associated with the urine quality.
    pub risk_disease: Vec<RiskDisease>,
    /// Correctly assign one of the predefined statuses to the analysis.
    pub overall_status: OverallStatus,
}

// Request Types
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRequest {
    pub session_id: String,
    #[serde(default)]
    pub last_chat: Option<String>,
}

// Reply Types
#[derive(Debug, Clone, Serialize)]
pub struct MessageReply {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    #[serde(rename = "type")]
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryReply {
    pub session_id: String,
    pub history: Vec<HistoryEntry>,
}
