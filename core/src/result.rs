use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{DorkError, DorkResult};

/// Severity the model assigns to a generated dork
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::Info,
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Info => "INFO",
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured reply of a dork-generation request
///
/// Every field is required on the wire. Decoding fails on a missing or
/// mistyped field instead of filling in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    #[serde(rename = "dork")]
    pub query: String,
    pub explanation: String,
    #[serde(rename = "riskLevel")]
    pub risk_level: RiskLevel,
    #[serde(rename = "suggestedOperators")]
    pub suggested_vectors: Vec<String>,
    #[serde(rename = "validationAnalysis")]
    pub validation_note: String,
    #[serde(rename = "improvementReasoning")]
    pub improvement_rationale: String,
    #[serde(rename = "refinedObjective")]
    pub refined_objective: String,
}

impl GenerationResult {
    /// The proposed next objective, if the model supplied a usable one
    pub fn next_objective(&self) -> Option<&str> {
        let trimmed = self.refined_objective.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Decodes the reply text of a generation request
pub fn parse_generation_result(text: &str) -> DorkResult<GenerationResult> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(DorkError::SchemaError("Empty response body".to_string()));
    }

    serde_json::from_str(body)
        .map_err(|e| DorkError::SchemaError(format!("Malformed generation result: {}", e)))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening fence line
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "dork": "site:.edu filetype:env",
            "explanation": "Ищет файлы окружения на доменах .edu",
            "riskLevel": "HIGH",
            "suggestedOperators": ["intitle:index.of", "inurl:config", "-inurl:example"],
            "validationAnalysis": "Синтаксис корректен",
            "improvementReasoning": "Сужено до .edu",
            "refinedObjective": "find exposed .env files with DB_PASSWORD on edu domains"
        })
    }

    #[test]
    fn test_parse_full_result() {
        let result = parse_generation_result(&sample().to_string()).unwrap();
        assert_eq!(result.query, "site:.edu filetype:env");
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.suggested_vectors.len(), 3);
        assert_eq!(
            result.next_objective(),
            Some("find exposed .env files with DB_PASSWORD on edu domains")
        );
    }

    #[test]
    fn test_missing_field_fails_closed() {
        for field in [
            "dork",
            "explanation",
            "riskLevel",
            "suggestedOperators",
            "validationAnalysis",
            "improvementReasoning",
            "refinedObjective",
        ] {
            let mut value = sample();
            value.as_object_mut().unwrap().remove(field);
            let err = parse_generation_result(&value.to_string()).unwrap_err();
            assert!(
                matches!(err, DorkError::SchemaError(_)),
                "missing {} should be a schema error",
                field
            );
        }
    }

    #[test]
    fn test_mistyped_fields_fail_closed() {
        let mut value = sample();
        value["suggestedOperators"] = json!("inurl:config");
        assert!(parse_generation_result(&value.to_string()).is_err());

        let mut value = sample();
        value["riskLevel"] = json!("SEVERE");
        assert!(parse_generation_result(&value.to_string()).is_err());

        let mut value = sample();
        value["dork"] = json!(null);
        assert!(parse_generation_result(&value.to_string()).is_err());
    }

    #[test]
    fn test_non_json_is_schema_error() {
        let err = parse_generation_result("Sure! Here is your dork: site:.edu").unwrap_err();
        assert!(matches!(err, DorkError::SchemaError(_)));

        let err = parse_generation_result("   ").unwrap_err();
        assert!(matches!(err, DorkError::SchemaError(_)));
    }

    #[test]
    fn test_code_fence_is_tolerated() {
        let fenced = format!("```json\n{}\n```", sample());
        let result = parse_generation_result(&fenced).unwrap();
        assert_eq!(result.query, "site:.edu filetype:env");
    }

    #[test]
    fn test_blank_refined_objective_has_no_next() {
        let mut value = sample();
        value["refinedObjective"] = json!("  ");
        let result = parse_generation_result(&value.to_string()).unwrap();
        assert_eq!(result.next_objective(), None);
    }

    #[test]
    fn test_risk_level_display() {
        let rendered: Vec<String> = RiskLevel::ALL.iter().map(|r| r.to_string()).collect();
        assert_eq!(rendered, ["INFO", "LOW", "MEDIUM", "HIGH", "CRITICAL"]);
    }
}
