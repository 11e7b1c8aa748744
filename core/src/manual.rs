use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A hand-edited component of the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualField {
    Site,
    Path,
    Title,
    FileType,
    FreeText,
}

impl ManualField {
    pub const ALL: [ManualField; 5] = [
        ManualField::Site,
        ManualField::Path,
        ManualField::Title,
        ManualField::FileType,
        ManualField::FreeText,
    ];

    /// Search operator the field composes into; free text has none
    pub fn operator(&self) -> Option<&'static str> {
        match self {
            ManualField::Site => Some("site"),
            ManualField::Path => Some("inurl"),
            ManualField::Title => Some("intitle"),
            ManualField::FileType => Some("filetype"),
            ManualField::FreeText => None,
        }
    }
}

impl fmt::Display for ManualField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operator().unwrap_or("text"))
    }
}

impl FromStr for ManualField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "site" => Ok(ManualField::Site),
            "inurl" | "path" => Ok(ManualField::Path),
            "intitle" | "title" => Ok(ManualField::Title),
            "filetype" | "ext" => Ok(ManualField::FileType),
            "text" | "intext" => Ok(ManualField::FreeText),
            other => Err(format!("Unknown manual field: {}", other)),
        }
    }
}

/// Fields that compose into a query when no AI result is active
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualOverride {
    pub site: String,
    pub path: String,
    pub title: String,
    pub file_type: String,
    pub free_text: String,
}

impl ManualOverride {
    fn slot_mut(&mut self, field: ManualField) -> &mut String {
        match field {
            ManualField::Site => &mut self.site,
            ManualField::Path => &mut self.path,
            ManualField::Title => &mut self.title,
            ManualField::FileType => &mut self.file_type,
            ManualField::FreeText => &mut self.free_text,
        }
    }

    pub fn get(&self, field: ManualField) -> &str {
        match field {
            ManualField::Site => &self.site,
            ManualField::Path => &self.path,
            ManualField::Title => &self.title,
            ManualField::FileType => &self.file_type,
            ManualField::FreeText => &self.free_text,
        }
    }

    pub fn set(&mut self, field: ManualField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        ManualField::ALL
            .iter()
            .all(|field| self.get(*field).trim().is_empty())
    }
}

/// Joins the non-blank fields as `site:.. inurl:.. intitle:.. filetype:.. text`
pub fn compose_manual_query(fields: &ManualOverride) -> String {
    ManualField::ALL
        .iter()
        .filter_map(|field| {
            let value = fields.get(*field).trim();
            if value.is_empty() {
                return None;
            }
            Some(match field.operator() {
                Some(operator) => format!("{}:{}", operator, value),
                None => value.to_string(),
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_all_fields_in_order() {
        let mut fields = ManualOverride::default();
        fields.set(ManualField::FreeText, "\"DB_PASSWORD\"");
        fields.set(ManualField::FileType, "env");
        fields.set(ManualField::Site, ".edu");
        fields.set(ManualField::Title, "index of");
        fields.set(ManualField::Path, "config");

        assert_eq!(
            compose_manual_query(&fields),
            "site:.edu inurl:config intitle:index of filetype:env \"DB_PASSWORD\""
        );
    }

    #[test]
    fn test_compose_skips_blank_fields() {
        let mut fields = ManualOverride::default();
        assert_eq!(compose_manual_query(&fields), "");
        assert!(fields.is_empty());

        fields.set(ManualField::Site, "  example.com ");
        fields.set(ManualField::Title, "   ");
        assert_eq!(compose_manual_query(&fields), "site:example.com");
        assert!(!fields.is_empty());

        fields.clear();
        assert!(fields.is_empty());
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("site".parse::<ManualField>(), Ok(ManualField::Site));
        assert_eq!("INURL".parse::<ManualField>(), Ok(ManualField::Path));
        assert_eq!("ext".parse::<ManualField>(), Ok(ManualField::FileType));
        assert_eq!("text".parse::<ManualField>(), Ok(ManualField::FreeText));
        assert!("cache".parse::<ManualField>().is_err());
    }
}
