//! Character statistics for the editor status line

/// Counts over the visible text of a chapter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    pub chars_with_space: usize,
    pub chars_no_space: usize,
    /// CJK unified ideographs (U+4E00..=U+9FFF)
    pub chinese: usize,
    /// ASCII letters
    pub english: usize,
    pub digits: usize,
    pub symbols: usize,
    pub lines: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        let mut stats = Self {
            lines: if text.is_empty() {
                0
            } else {
                text.matches('\n').count() + 1
            },
            ..Self::default()
        };

        for c in text.chars().filter(|c| *c != '\r') {
            stats.chars_with_space += 1;
            if c.is_whitespace() {
                continue;
            }
            stats.chars_no_space += 1;
            match c {
                '\u{4E00}'..='\u{9FFF}' => stats.chinese += 1,
                c if c.is_ascii_alphabetic() => stats.english += 1,
                c if c.is_numeric() => stats.digits += 1,
                _ => stats.symbols += 1,
            }
        }
        stats
    }

    /// Status line text; the line count is optional
    pub fn summary(&self, with_lines: bool) -> String {
        let mut s = format!(
            "字数(不含空格): {} | 汉字: {} | 英文: {} | 数字: {} | 符号: {}",
            self.chars_no_space, self.chinese, self.english, self.digits, self.symbols
        );
        if with_lines {
            s.push_str(&format!(" | 行: {}", self.lines));
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let stats = TextStats::of("晨光 abc 123，\r\n第二行");
        assert_eq!(stats.chinese, 5);
        assert_eq!(stats.english, 3);
        assert_eq!(stats.digits, 3);
        assert_eq!(stats.symbols, 1);
        assert_eq!(stats.chars_no_space, 12);
        assert_eq!(stats.lines, 2);
    }

    #[test]
    fn test_empty() {
        assert_eq!(TextStats::of(""), TextStats::default());
    }

    #[test]
    fn test_summary() {
        let stats = TextStats::of("ab\ncd");
        assert!(stats.summary(true).ends_with("| 行: 2"));
        assert!(!stats.summary(false).contains("行"));
    }
}
