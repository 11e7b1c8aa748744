//! Builders for the two requests sent to the AI boundary.

use serde_json::{json, Value};

use crate::config::DorkConfig;
use crate::types::{Content, GenerateContentRequest, GenerationConfig};

const ENHANCEMENT_SYSTEM_PROMPT: &str = "You are a senior OSINT and penetration-testing analyst. \
You rewrite vague reconnaissance goals into precise security-research objectives.";

const GENERATION_SYSTEM_PROMPT: &str = "You are an expert in search-engine reconnaissance \
(Google dorking) with deep knowledge of the Google Hacking Database (GHDB). \
You write precise, syntactically valid dorks and critique your own output.";

/// JSON schema the generation reply must satisfy (Gemini OpenAPI subset)
pub fn generation_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "dork": {
                "type": "STRING",
                "description": "The search query. ASCII characters only."
            },
            "explanation": { "type": "STRING" },
            "riskLevel": {
                "type": "STRING",
                "enum": ["INFO", "LOW", "MEDIUM", "HIGH", "CRITICAL"]
            },
            "suggestedOperators": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "validationAnalysis": { "type": "STRING" },
            "improvementReasoning": { "type": "STRING" },
            "refinedObjective": { "type": "STRING" }
        },
        "required": [
            "dork",
            "explanation",
            "riskLevel",
            "suggestedOperators",
            "validationAnalysis",
            "improvementReasoning",
            "refinedObjective"
        ]
    })
}

/// Asks the model to restate the objective in precise security terminology.
/// The reply is plain text.
pub fn build_enhancement_request(objective: &str, config: &DorkConfig) -> GenerateContentRequest {
    let prompt = format!(
        "Rewrite the following reconnaissance objective using precise security-research \
terminology. Name the concrete artifacts to look for (file types, paths, panels, \
misconfigurations) and keep the original intent and scope.\n\
Return ONLY the rewritten objective as a single paragraph, with no preamble, \
quotes or formatting.\n\n\
Objective: {}",
        objective.trim()
    );

    GenerateContentRequest {
        model: config.enhancement_model().to_string(),
        contents: vec![Content::user(prompt)],
        system_instruction: Some(Content::system(ENHANCEMENT_SYSTEM_PROMPT.to_string())),
        generation_config: Some(GenerationConfig {
            temperature: config.temperature,
            ..GenerationConfig::default()
        }),
    }
}

/// Asks the model for a dork plus structured commentary under the fixed schema
pub fn build_generation_request(objective: &str, config: &DorkConfig) -> GenerateContentRequest {
    let language = config.commentary_language();
    let prompt = format!(
        "Objective: {objective}\n\n\
Produce one Google dork that best serves this objective, using GHDB patterns where they apply.\n\
Rules for the \"dork\" field:\n\
- ASCII characters only. Never use Cyrillic letters anywhere in the dork.\n\
- Operators (site:, inurl:, intitle:, filetype:, ext:, intext: and their negated forms) \
are written with NO space between the colon and the value.\n\
- Every double-quoted phrase is closed.\n\
Write \"explanation\", \"validationAnalysis\" and \"improvementReasoning\" in {language}.\n\
\"suggestedOperators\" lists about three short operator fragments that would narrow \
or widen the search.\n\
\"validationAnalysis\" is your own syntax and logic check of the dork.\n\
\"refinedObjective\" is an improved version of the objective for the next iteration, \
and \"improvementReasoning\" explains what it improves.",
        objective = objective.trim(),
        language = language,
    );

    GenerateContentRequest {
        model: config.model().to_string(),
        contents: vec![Content::user(prompt)],
        system_instruction: Some(Content::system(GENERATION_SYSTEM_PROMPT.to_string())),
        generation_config: Some(GenerationConfig {
            temperature: config.temperature,
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(generation_response_schema()),
        }),
    }
}
