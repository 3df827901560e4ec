//! Bilingual caption parser.
//!
//! Models asked for "**English:** ... **Chinese:** ..." answer in many
//! slightly different shapes. The parser tries ordered marker lists first,
//! falls back to per-line script detection, and as a last resort echoes the
//! whole text into both fields.

use super::{CaptionResult, CaptionSource};
use once_cell::sync::Lazy;
use regex::Regex;

pub const ENGLISH_MARKERS: &[&str] = &[
    "**English Description:**",
    "**英文描述:**",
    "**English:**",
    "English Description:",
];

pub const CHINESE_MARKERS: &[&str] = &[
    "**Chinese Description:**",
    "**中文描述:**",
    "**Chinese:**",
    "Chinese Description:",
];

// CJK Unified Ideographs
static CJK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x{4E00}-\x{9FFF}]").expect("static CJK pattern compiles"));

/// True if `text` has at least one CJK Unified Ideograph.
pub fn contains_cjk(text: &str) -> bool {
    CJK_PATTERN.is_match(text)
}

#[derive(Debug, Clone)]
pub struct BilingualParser {
    english_markers: Vec<String>,
    chinese_markers: Vec<String>,
}

impl Default for BilingualParser {
    fn default() -> Self {
        Self::with_markers(ENGLISH_MARKERS, CHINESE_MARKERS)
    }
}

impl BilingualParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom marker lists. Earlier markers win.
    pub fn with_markers<S: AsRef<str>>(english: &[S], chinese: &[S]) -> Self {
        Self {
            english_markers: english.iter().map(|m| m.as_ref().to_string()).collect(),
            chinese_markers: chinese.iter().map(|m| m.as_ref().to_string()).collect(),
        }
    }

    pub fn parse(&self, caption: &str) -> CaptionResult {
        let caption = caption.trim();
        if caption.is_empty() {
            return CaptionResult::both("", CaptionSource::Empty);
        }

        let english = extract_section(caption, &self.english_markers, &self.chinese_markers);
        let chinese = extract_section(caption, &self.chinese_markers, &self.english_markers);
        if !english.is_empty() || !chinese.is_empty() {
            return CaptionResult {
                english,
                chinese,
                source: CaptionSource::Markers,
            };
        }

        // Without a single CJK line there is nothing to split.
        let (english, chinese) = split_lines_by_script(caption);
        if !chinese.is_empty() {
            return CaptionResult {
                english,
                chinese,
                source: CaptionSource::LineScript,
            };
        }

        CaptionResult::both(caption, CaptionSource::Degenerate)
    }
}

/// Parse with the default marker lists.
pub fn parse_bilingual_caption(caption: &str) -> CaptionResult {
    static DEFAULT_PARSER: Lazy<BilingualParser> = Lazy::new(BilingualParser::default);
    DEFAULT_PARSER.parse(caption)
}

/// Text after the first matching marker, cut before any marker of the other language.
fn extract_section(caption: &str, markers: &[String], other_markers: &[String]) -> String {
    for marker in markers {
        if let Some((_, rest)) = caption.split_once(marker.as_str()) {
            let mut section = rest.trim();
            for other in other_markers {
                if let Some((head, _)) = section.split_once(other.as_str()) {
                    section = head.trim();
                }
            }
            return section.to_string();
        }
    }
    String::new()
}

/// Lines with any CJK ideograph are Chinese, the rest English; each group space-joined.
fn split_lines_by_script(caption: &str) -> (String, String) {
    let mut english: Vec<&str> = Vec::new();
    let mut chinese: Vec<&str> = Vec::new();

    for line in caption.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if contains_cjk(line) {
            chinese.push(line);
        } else {
            english.push(line);
        }
    }

    (english.join(" "), chinese.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_markers_split_both_languages() {
        let r = parse_bilingual_caption("**English:** A cat sits. **Chinese:** 一只猫坐着。");
        assert_eq!(r.as_pair(), ("A cat sits.", "一只猫坐着。"));
        assert_eq!(r.source, CaptionSource::Markers);
    }

    #[test]
    fn chinese_first_order_is_handled() {
        let r = parse_bilingual_caption(
            "**中文描述:** 一只狗在草地上奔跑。\n**English Description:** A dog runs on the grass.",
        );
        assert_eq!(r.english, "A dog runs on the grass.");
        assert_eq!(r.chinese, "一只狗在草地上奔跑。");
    }

    #[test]
    fn earlier_marker_in_list_wins() {
        // "English Description:" also occurs inside the bold form; the bold one is listed first.
        let r = parse_bilingual_caption("**English Description:** Red car. Chinese Description: 红色的车。");
        assert_eq!(r.english, "Red car.");
        assert_eq!(r.chinese, "红色的车。");
    }

    #[test]
    fn only_one_language_marked() {
        let r = parse_bilingual_caption("Intro text\n**English:** Just English here.");
        assert_eq!(r.english, "Just English here.");
        assert_eq!(r.chinese, "");
        assert_eq!(r.source, CaptionSource::Markers);
    }

    #[test]
    fn line_fallback_classifies_by_script() {
        let r = parse_bilingual_caption("Hello there.\n你好啊。");
        assert_eq!(r.as_pair(), ("Hello there.", "你好啊。"));
        assert_eq!(r.source, CaptionSource::LineScript);
    }

    #[test]
    fn line_fallback_joins_and_keeps_order() {
        let r = parse_bilingual_caption("A sunny day.\n\n  晴朗的一天。 \nBlue sky.\nMixed 混合 line");
        assert_eq!(r.english, "A sunny day. Blue sky.");
        assert_eq!(r.chinese, "晴朗的一天。 Mixed 混合 line");
    }

    #[test]
    fn plain_ascii_echoes_input_into_both_fields() {
        let r = parse_bilingual_caption("Just plain ascii, no markers.");
        assert_eq!(
            r.as_pair(),
            ("Just plain ascii, no markers.", "Just plain ascii, no markers.")
        );
        assert!(r.is_degenerate());
    }

    #[test]
    fn multi_line_ascii_without_cjk_is_degenerate() {
        let text = "First line.\nSecond line.";
        let r = parse_bilingual_caption(text);
        assert_eq!(r.as_pair(), (text, text));
        assert_eq!(r.source, CaptionSource::Degenerate);
    }

    #[test]
    fn empty_input_gives_empty_fields() {
        let r = parse_bilingual_caption("");
        assert_eq!(r.as_pair(), ("", ""));
        assert_eq!(r.source, CaptionSource::Empty);
        assert_eq!(parse_bilingual_caption("  \n ").as_pair(), ("", ""));
    }

    #[test]
    fn custom_markers() {
        let parser = BilingualParser::with_markers(&["EN>"], &["ZH>"]);
        let r = parser.parse("EN> A bird ZH> 一只鸟");
        assert_eq!(r.as_pair(), ("A bird", "一只鸟"));
    }

    #[test]
    fn cjk_detection_range() {
        assert!(contains_cjk("abc中"));
        assert!(!contains_cjk("abc"));
        // Hiragana is outside the unified ideograph block.
        assert!(!contains_cjk("ひらがな"));
    }
}
