//! Text escaping shared by the XML-based deck writers.

use quick_xml::escape::escape;

/// Escape markup characters and drop control characters XML 1.0 cannot
/// carry. Tabs and line breaks are kept.
pub fn escape_text(s: &str) -> String {
    let printable: String = s
        .chars()
        .filter(|c| matches!(c, '\t' | '\n' | '\r') || !c.is_control())
        .collect();
    escape(printable.as_str()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text(r#"a<b>&"c"'"#), "a&lt;b&gt;&amp;&quot;c&quot;&apos;");
        assert_eq!(escape_text("bell\u{7}"), "bell");
        assert_eq!(escape_text("창세기\t1"), "창세기\t1");
    }
}
