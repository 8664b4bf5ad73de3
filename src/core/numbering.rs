//! Volume/chapter title numbering and chapter filename derivation

use regex_lite::Regex;

use super::config::NumberingConfig;
use super::error::{ProjectError, Result};
use super::project::Project;

const CJK_DIGITS: [(char, u32); 10] = [
    ('一', 1),
    ('二', 2),
    ('三', 3),
    ('四', 4),
    ('五', 5),
    ('六', 6),
    ('七', 7),
    ('八', 8),
    ('九', 9),
    ('十', 10),
];

/// Format a volume numeral: CJK up to 19, Arabic digits from 20 on
pub fn to_cjk_numeral(n: u32) -> String {
    let digit = |d: u32| CJK_DIGITS.iter().find(|(_, v)| *v == d).map(|(c, _)| *c);
    match n {
        1..=10 => digit(n).map(String::from).unwrap_or_default(),
        11..=19 => {
            let mut s = String::from('十');
            s.extend(digit(n % 10));
            s
        }
        _ => n.to_string(),
    }
}

/// Parse a volume numeral written in Arabic digits or CJK numerals (1–19)
pub fn parse_numeral(s: &str) -> Option<u32> {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().ok();
    }
    let value = |c: char| CJK_DIGITS.iter().find(|(d, _)| *d == c).map(|(_, v)| *v);
    let mut chars = s.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(c), None, None) => value(c),
        (Some('十'), Some(c), None) => value(c).filter(|v| *v < 10).map(|v| 10 + v),
        _ => None,
    }
}

/// Strip characters that break paths and replace spaces with underscores
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|'))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Title and filename generator driven by [`NumberingConfig`]
#[derive(Debug, Clone)]
pub struct Numbering {
    config: NumberingConfig,
    volume_pattern: Regex,
    chapter_pattern: Regex,
}

impl Numbering {
    pub fn new(config: NumberingConfig) -> Self {
        let volume_pattern = Regex::new(&format!(
            "{}(.+?){}",
            regex_lite::escape(&config.volume_prefix),
            regex_lite::escape(&config.volume_suffix)
        ))
        .expect("escaped pattern");
        let chapter_pattern = Regex::new(r"\d+").expect("static pattern");

        Self {
            config,
            volume_pattern,
            chapter_pattern,
        }
    }

    pub fn config(&self) -> &NumberingConfig {
        &self.config
    }

    /// 1 + the largest numeral parsed from any existing volume title
    ///
    /// Fails when that numeral is already the largest representable one.
    pub fn next_volume_number(&self, project: &Project) -> Result<u32> {
        let max = project
            .structure
            .iter()
            .filter_map(|v| self.volume_pattern.captures(&v.title))
            .filter_map(|caps| caps.get(1).and_then(|m| parse_numeral(m.as_str())))
            .max()
            .unwrap_or(0);
        max.checked_add(1)
            .ok_or_else(|| ProjectError::Validation(format!("volume number {max} cannot be exceeded")))
    }

    /// 1 + the largest number embedded in any chapter title project-wide
    pub fn next_chapter_number(&self, project: &Project) -> Result<u64> {
        let max = project
            .chapters()
            .filter_map(|c| self.chapter_pattern.find(&c.title))
            .filter_map(|m| m.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        max.checked_add(1)
            .ok_or_else(|| ProjectError::Validation(format!("chapter number {max} cannot be exceeded")))
    }

    /// `<prefix><numeral><suffix>：<topic>`
    pub fn volume_title(&self, number: u32, topic: &str) -> String {
        let numeral = if self.config.volume_cjk_numerals {
            to_cjk_numeral(number)
        } else {
            number.to_string()
        };
        format!(
            "{}{}{}：{}",
            self.config.volume_prefix, numeral, self.config.volume_suffix, topic
        )
    }

    /// Zero-padded chapter number
    pub fn chapter_number(&self, number: u64) -> String {
        format!("{:0width$}", number, width = self.config.chapter_padding)
    }

    /// `<prefix><padded><suffix> <topic>`
    pub fn chapter_title(&self, padded: &str, topic: &str) -> String {
        format!(
            "{}{}{} {}",
            self.config.chapter_prefix, padded, self.config.chapter_suffix, topic
        )
    }

    /// `<padded>-<sanitized topic>.txt`
    pub fn chapter_filename(&self, padded: &str, topic: &str) -> String {
        format!("{}-{}.txt", padded, sanitize_filename(topic))
    }
}

impl Default for Numbering {
    fn default() -> Self {
        Self::new(NumberingConfig::default())
    }
}
