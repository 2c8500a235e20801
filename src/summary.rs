//! Summary selections: the closed menus of summary styles and models.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown summary style: {0}")]
    UnknownStyle(String),
    #[error("unknown model: {0}")]
    UnknownModel(String),
}

/// How the summary should be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryStyle {
    #[default]
    Long,
    Short,
    Creative,
    BulletPoints,
}

impl SummaryStyle {
    pub const ALL: [SummaryStyle; 4] = [
        SummaryStyle::Long,
        SummaryStyle::Short,
        SummaryStyle::Creative,
        SummaryStyle::BulletPoints,
    ];

    /// Menu label shown to the user
    pub fn label(self) -> &'static str {
        match self {
            SummaryStyle::Long => "Long Summary",
            SummaryStyle::Short => "Short Summary",
            SummaryStyle::Creative => "Creative Summary",
            SummaryStyle::BulletPoints => "Bullet Point Summary",
        }
    }

    /// Key used in config files and on the command line
    pub fn key(self) -> &'static str {
        match self {
            SummaryStyle::Long => "long",
            SummaryStyle::Short => "short",
            SummaryStyle::Creative => "creative",
            SummaryStyle::BulletPoints => "bullet-points",
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SummaryStyle {
    type Err = SelectionError;

    /// Accepts either the key (`short`) or the label (`Short Summary`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|style| {
                style.key().eq_ignore_ascii_case(s) || style.label().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| SelectionError::UnknownStyle(s.to_string()))
    }
}

/// Hosted model used for completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
pub enum ModelId {
    #[serde(rename = "qwen-2.5-32b")]
    #[value(name = "qwen-2.5-32b")]
    Qwen25,
    #[default]
    #[serde(rename = "llama3-70b-8192")]
    #[value(name = "llama3-70b-8192")]
    Llama3,
    #[serde(rename = "deepseek-r1-distill-qwen-32b")]
    #[value(name = "deepseek-r1-distill-qwen-32b")]
    DeepseekR1,
}

impl ModelId {
    pub const ALL: [ModelId; 3] = [
        ModelId::Qwen25,
        ModelId::Llama3,
        ModelId::DeepseekR1,
    ];

    /// Identifier sent to the completion API
    pub fn as_str(self) -> &'static str {
        match self {
            ModelId::Qwen25 => "qwen-2.5-32b",
            ModelId::Llama3 => "llama3-70b-8192",
            ModelId::DeepseekR1 => "deepseek-r1-distill-qwen-32b",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| SelectionError::UnknownModel(s.to_string()))
    }
}

/// A summary request: which template and which model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummaryRequest {
    pub style: SummaryStyle,
    pub model: ModelId,
}

impl SummaryRequest {
    pub fn new(style: SummaryStyle, model: ModelId) -> Self {
        Self { style, model }
    }

    /// Heading rendered above a finished summary
    pub fn heading(&self) -> String {
        format!("📜 {} using {}", self.style.label(), self.model)
    }
}
