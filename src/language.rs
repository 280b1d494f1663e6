//! The closed set of languages a snippet can be written in.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Raised when a language id is not part of [`Language::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language identifier: {0}")]
pub struct UnsupportedLanguage(pub String);

/// Supported snippet languages, stored by their lowercase id.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum Language {
    #[sea_orm(string_value = "c-sharp")]
    #[serde(rename = "c-sharp")]
    CSharp,
    #[sea_orm(string_value = "c-plus-plus")]
    #[serde(rename = "c-plus-plus")]
    CPlusPlus,
    #[sea_orm(string_value = "css")]
    #[serde(rename = "css")]
    Css,
    #[sea_orm(string_value = "go")]
    #[serde(rename = "go")]
    Go,
    #[sea_orm(string_value = "html")]
    #[serde(rename = "html")]
    Html,
    #[sea_orm(string_value = "java")]
    #[serde(rename = "java")]
    Java,
    #[sea_orm(string_value = "javascript")]
    #[serde(rename = "javascript")]
    JavaScript,
    #[sea_orm(string_value = "json")]
    #[serde(rename = "json")]
    Json,
    #[sea_orm(string_value = "kotlin")]
    #[serde(rename = "kotlin")]
    Kotlin,
    #[sea_orm(string_value = "markdown")]
    #[serde(rename = "markdown")]
    Markdown,
    #[sea_orm(string_value = "other")]
    #[serde(rename = "other")]
    Other,
    #[sea_orm(string_value = "php")]
    #[serde(rename = "php")]
    Php,
    #[sea_orm(string_value = "powershell")]
    #[serde(rename = "powershell")]
    PowerShell,
    #[sea_orm(string_value = "python")]
    #[serde(rename = "python")]
    Python,
    #[sea_orm(string_value = "ruby")]
    #[serde(rename = "ruby")]
    Ruby,
    #[sea_orm(string_value = "rust")]
    #[serde(rename = "rust")]
    Rust,
    #[sea_orm(string_value = "shell-bash")]
    #[serde(rename = "shell-bash")]
    ShellBash,
    #[sea_orm(string_value = "sql")]
    #[serde(rename = "sql")]
    Sql,
    #[sea_orm(string_value = "swift")]
    #[serde(rename = "swift")]
    Swift,
    #[sea_orm(string_value = "typescript")]
    #[serde(rename = "typescript")]
    TypeScript,
    #[sea_orm(string_value = "yaml")]
    #[serde(rename = "yaml")]
    Yaml,
}

impl Language {
    /// Every language, sorted by display label.
    pub const ALL: [Language; 21] = [
        Language::CSharp,
        Language::CPlusPlus,
        Language::Css,
        Language::Go,
        Language::Html,
        Language::Java,
        Language::JavaScript,
        Language::Json,
        Language::Kotlin,
        Language::Markdown,
        Language::Other,
        Language::Php,
        Language::PowerShell,
        Language::Python,
        Language::Ruby,
        Language::Rust,
        Language::ShellBash,
        Language::Sql,
        Language::Swift,
        Language::TypeScript,
        Language::Yaml,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::CSharp => "c-sharp",
            Self::CPlusPlus => "c-plus-plus",
            Self::Css => "css",
            Self::Go => "go",
            Self::Html => "html",
            Self::Java => "java",
            Self::JavaScript => "javascript",
            Self::Json => "json",
            Self::Kotlin => "kotlin",
            Self::Markdown => "markdown",
            Self::Other => "other",
            Self::Php => "php",
            Self::PowerShell => "powershell",
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::Rust => "rust",
            Self::ShellBash => "shell-bash",
            Self::Sql => "sql",
            Self::Swift => "swift",
            Self::TypeScript => "typescript",
            Self::Yaml => "yaml",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CSharp => "C#",
            Self::CPlusPlus => "C++",
            Self::Css => "CSS",
            Self::Go => "Go",
            Self::Html => "HTML",
            Self::Java => "Java",
            Self::JavaScript => "JavaScript",
            Self::Json => "JSON",
            Self::Kotlin => "Kotlin",
            Self::Markdown => "Markdown",
            Self::Other => "Other",
            Self::Php => "PHP",
            Self::PowerShell => "PowerShell",
            Self::Python => "Python",
            Self::Ruby => "Ruby",
            Self::Rust => "Rust",
            Self::ShellBash => "Shell/Bash",
            Self::Sql => "SQL",
            Self::Swift => "Swift",
            Self::TypeScript => "TypeScript",
            Self::Yaml => "YAML",
        }
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    /// Case-insensitive lookup by id. Surrounding whitespace is not stripped.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let candidate = raw.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|language| language.id() == candidate)
            .ok_or_else(|| UnsupportedLanguage(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_case_insensitively() {
        assert_eq!("JavaScript".parse::<Language>(), Ok(Language::JavaScript));
        assert_eq!("SHELL-BASH".parse::<Language>(), Ok(Language::ShellBash));
        assert_eq!("c-plus-plus".parse::<Language>(), Ok(Language::CPlusPlus));
    }

    #[test]
    fn rejects_labels_and_unknown_ids() {
        assert!("C++".parse::<Language>().is_err());
        assert!("cobol".parse::<Language>().is_err());
        assert!(" rust".parse::<Language>().is_err());
    }

    #[test]
    fn ids_round_trip_through_from_str() {
        for language in Language::ALL {
            assert_eq!(language.id().parse::<Language>(), Ok(language));
        }
    }

    #[test]
    fn serializes_as_lowercase_id() {
        let json = serde_json::to_string(&Language::CSharp).expect("serialize language");
        assert_eq!(json, "\"c-sharp\"");
    }
}
