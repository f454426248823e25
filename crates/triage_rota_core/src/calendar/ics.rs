//! Minimal RFC 5545 content-line writer.
//!
//! # Invariants
//! - Every content line ends with CRLF.
//! - Lines longer than 75 octets are folded without splitting UTF-8 sequences.

const MAX_LINE_OCTETS: usize = 75;

#[derive(Debug, Default)]
pub(crate) struct IcsWriter {
    out: String,
}

impl IcsWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Writes a property whose value is already in iCalendar syntax.
    pub(crate) fn raw(&mut self, name: &str, value: &str) -> &mut Self {
        self.line(&format!("{name}:{value}"));
        self
    }

    /// Writes a TEXT property, escaping the value.
    pub(crate) fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.line(&format!("{name}:{}", escape_text(value)));
        self
    }

    pub(crate) fn begin(&mut self, component: &str) -> &mut Self {
        self.raw("BEGIN", component)
    }

    pub(crate) fn end(&mut self, component: &str) -> &mut Self {
        self.raw("END", component)
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, content: &str) {
        let mut budget = MAX_LINE_OCTETS;
        let mut used = 0;
        for ch in content.chars() {
            let width = ch.len_utf8();
            if used + width > budget {
                self.out.push_str("\r\n ");
                // Continuation lines spend one octet on the leading space.
                budget = MAX_LINE_OCTETS - 1;
                used = 0;
            }
            self.out.push(ch);
            used += width;
        }
        self.out.push_str("\r\n");
    }
}

/// Escapes a TEXT value (`\`, `;`, `,`, newlines).
pub(crate) fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_text, IcsWriter};

    #[test]
    fn escape_text_handles_special_characters() {
        assert_eq!(escape_text("a;b,c\\d\r\ne"), "a\\;b\\,c\\\\d\\ne");
    }

    #[test]
    fn long_lines_fold_at_75_octets() {
        let mut writer = IcsWriter::new();
        writer.text("DESCRIPTION", &"x".repeat(200));
        let out = writer.finish();

        let lines: Vec<&str> = out.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert!(lines.len() > 1);
        assert_eq!(lines[0].len(), 75);
        for line in &lines[1..] {
            assert!(line.starts_with(' '));
            assert!(line.len() <= 75);
        }
        let unfolded: String = out.replace("\r\n ", "");
        assert_eq!(unfolded, format!("DESCRIPTION:{}\r\n", "x".repeat(200)));
    }

    #[test]
    fn folding_never_splits_multibyte_characters() {
        let mut writer = IcsWriter::new();
        writer.text("SUMMARY", &"é".repeat(60));
        let out = writer.finish();
        for line in out.split("\r\n") {
            assert!(line.len() <= 75);
        }
        assert_eq!(out.replace("\r\n ", ""), format!("SUMMARY:{}\r\n", "é".repeat(60)));
    }
}
