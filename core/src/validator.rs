//! Client-side safety and syntax checks over a candidate dork.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Operators whose value must follow the colon without whitespace
pub const SPACING_SENSITIVE_OPERATORS: [&str; 6] =
    ["site", "inurl", "intitle", "filetype", "ext", "intext"];

static OPERATOR_SPACING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({}):\s",
        SPACING_SENSITIVE_OPERATORS.join("|")
    ))
    .expect("operator spacing pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum IssueSeverity {
    Critical,
    SyntaxError,
    SyntaxWarning,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IssueSeverity::Critical => "CRITICAL",
            IssueSeverity::SyntaxError => "SYNTAX-ERROR",
            IssueSeverity::SyntaxWarning => "SYNTAX-WARNING",
        })
    }
}

/// A finding produced by [`validate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// Cyrillic characters; the search engine only understands ASCII operators
    CyrillicCharacters,
    /// Odd number of double quotes
    UnbalancedQuotes,
    /// `operator: value`, the space breaks the operator binding
    OperatorSpacing { operator: String },
}

impl ValidationIssue {
    pub fn severity(&self) -> IssueSeverity {
        match self {
            ValidationIssue::CyrillicCharacters => IssueSeverity::Critical,
            ValidationIssue::UnbalancedQuotes => IssueSeverity::SyntaxError,
            ValidationIssue::OperatorSpacing { .. } => IssueSeverity::SyntaxWarning,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ValidationIssue::CyrillicCharacters => {
                "Query contains Cyrillic characters; operators must be ASCII-only".to_string()
            }
            ValidationIssue::UnbalancedQuotes => {
                "Unbalanced double quotes; a quoted phrase is left open".to_string()
            }
            ValidationIssue::OperatorSpacing { operator } => format!(
                "Whitespace after '{}:' detaches the operator from its value",
                operator
            ),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity(), self.message())
    }
}

fn is_cyrillic(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c)
}

/// A `-` counts as negation only when it opens a term: at the start of the
/// query, after whitespace or after `(`. In `a-site:` it is part of the word.
fn is_negated(query: &str, operator_start: usize) -> bool {
    match query[..operator_start].strip_suffix('-') {
        Some(before) => before
            .chars()
            .next_back()
            .map_or(true, |c| c.is_whitespace() || c == '('),
        None => false,
    }
}

/// Inspects a query and returns every issue found, in check order.
///
/// Pure and deterministic; no check short-circuits another.
pub fn validate(query: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if query.chars().any(is_cyrillic) {
        issues.push(ValidationIssue::CyrillicCharacters);
    }

    if query.matches('"').count() % 2 != 0 {
        issues.push(ValidationIssue::UnbalancedQuotes);
    }

    issues.extend(OPERATOR_SPACING_RE.captures_iter(query).filter_map(|caps| {
        let operator = caps.get(1)?;
        let name = operator.as_str().to_lowercase();
        Some(ValidationIssue::OperatorSpacing {
            operator: if is_negated(query, operator.start()) {
                format!("-{}", name)
            } else {
                name
            },
        })
    }));

    issues
}

/// True when any issue is critical
pub fn has_critical(issues: &[ValidationIssue]) -> bool {
    issues
        .iter()
        .any(|issue| issue.severity() == IssueSeverity::Critical)
}
