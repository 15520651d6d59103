//! Typed structured output on top of the provider abstraction
//!
//! Attaches a JSON schema generated from a Rust type to the request, then
//! deserializes the model's JSON reply into that type.

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;

use super::core::{error::LlmError, provider::LlmProvider, types::GenerateRequest};

/// Generate a typed value from the model
///
/// The JSON schema of `T` is attached to the request so the model replies
/// with a conforming JSON object, which is then deserialized into `T`.
///
/// # Example
///
/// ```ignore
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct Verdict {
///     /// One-line summary
///     summary: String,
///     /// Confidence between 0 and 1
///     confidence: f64,
/// }
///
/// let verdict: Verdict = generate_structured(&client, request).await?;
/// ```
pub async fn generate_structured<T>(
    provider: &dyn LlmProvider,
    request: GenerateRequest,
) -> Result<T, LlmError>
where
    T: JsonSchema + DeserializeOwned,
{
    let schema = schema_for!(T);
    let schema_value = serde_json::to_value(&schema)
        .expect("Failed to serialize schema - this is a bug in schemars or the JsonSchema impl");

    let reply = provider
        .generate(request.with_response_schema(schema_value))
        .await?;

    let json = extract_json(&reply.text);
    serde_json::from_str(json).map_err(|e| {
        LlmError::SerializationError(format!(
            "Failed to parse structured reply: {}. Reply: {}",
            e, reply.text
        ))
    })
}

/// Strip the Markdown code fence some models wrap JSON replies in
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let rest = match trimmed.strip_prefix("```") {
        Some(rest) => rest,
        None => return trimmed,
    };

    // Drop the info string ("json") on the opening fence
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start_matches(['\r', '\n']);
    match rest.strip_suffix("```") {
        Some(body) => body.trim(),
        None => rest.trim(),
    }
}
