//! 双语描述模块：解析模型输出的中英文描述。
//!
//! Caption results and the heuristic bilingual parser.

pub mod parser;

pub use parser::{contains_cjk, parse_bilingual_caption, BilingualParser, CHINESE_MARKERS, ENGLISH_MARKERS};

use serde::{Deserialize, Serialize};

/// How a [`CaptionResult`] was obtained.
///
/// `Degenerate` means no structure was found and both fields hold the
/// original text; callers can tell that apart from a genuine bilingual answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionSource {
    /// Fields returned as-is by the remote service.
    Service,
    /// Segments isolated by language markers.
    Markers,
    /// Lines classified by script; at least one line was Chinese.
    LineScript,
    /// Whole text echoed into both fields.
    Degenerate,
    /// Input was empty.
    Empty,
    /// Generation failed; both fields hold the error message.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionResult {
    pub english: String,
    pub chinese: String,
    pub source: CaptionSource,
}

impl CaptionResult {
    /// Same text in both fields; used for degenerate parses and degraded errors.
    pub fn both(text: impl Into<String>, source: CaptionSource) -> Self {
        let text = text.into();
        Self {
            english: text.clone(),
            chinese: text,
            source,
        }
    }

    pub fn as_pair(&self) -> (&str, &str) {
        (&self.english, &self.chinese)
    }

    pub fn is_degenerate(&self) -> bool {
        self.source == CaptionSource::Degenerate
    }
}

/// Target language for translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    Chinese,
}

impl Language {
    /// Chinese text goes to English, everything else to Chinese.
    pub fn translation_target(text: &str) -> Self {
        if contains_cjk(text) {
            Language::English
        } else {
            Language::Chinese
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Chinese => "Chinese",
        }
    }
}
