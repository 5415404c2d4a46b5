//! Decoration rendering
//!
//! A decoration is a template wrapped around every message of a channel.
//! Keywords are substituted textually, first occurrence only, in a fixed
//! order: topic, timestamp, context, then text.

use chrono::{DateTime, Local};
use contracts::KeywordSyntax;

/// `asctime`-style rendering used for the `timestamp` keyword.
pub const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Decoration template for one topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub template: String,
    pub syntax: KeywordSyntax,
}

impl Decoration {
    /// Template with bare keywords (`topic: text`)
    pub fn bare(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            syntax: KeywordSyntax::Bare,
        }
    }

    /// Template with braced keywords (`{topic}: {text}`)
    pub fn braced(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            syntax: KeywordSyntax::Braced,
        }
    }
}

impl From<&str> for Decoration {
    fn from(template: &str) -> Self {
        Self::bare(template)
    }
}

impl From<String> for Decoration {
    fn from(template: String) -> Self {
        Self::bare(template)
    }
}

struct Keywords {
    topic: &'static str,
    timestamp: &'static str,
    context: &'static str,
    text: &'static str,
}

fn keywords(syntax: KeywordSyntax) -> Keywords {
    match syntax {
        KeywordSyntax::Bare => Keywords {
            topic: "topic",
            timestamp: "timestamp",
            context: "context",
            text: "text",
        },
        KeywordSyntax::Braced => Keywords {
            topic: "{topic}",
            timestamp: "{timestamp}",
            context: "{context}",
            text: "{text}",
        },
    }
}

/// Format a local time the way the `timestamp` keyword expects.
pub fn format_timestamp(now: DateTime<Local>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Render the final message string.
///
/// Without a decoration the joined text is returned unchanged. With one,
/// each keyword is replaced once, every step operating on the output of the
/// previous one. If the rendered template contains the text keyword the
/// message goes there; otherwise the template is a prefix.
///
/// `timestamp` is only called when the template still contains the
/// timestamp keyword after the topic substitution.
pub fn render(
    topic: &str,
    decoration: Option<&Decoration>,
    context: Option<&str>,
    text: &str,
    timestamp: impl FnOnce() -> String,
) -> String {
    let Some(decoration) = decoration else {
        return text.to_string();
    };
    let keys = keywords(decoration.syntax);

    let mut rendered = decoration.template.replacen(keys.topic, topic, 1);
    if rendered.contains(keys.timestamp) {
        rendered = rendered.replacen(keys.timestamp, &timestamp(), 1);
    }
    rendered = rendered.replacen(keys.context, context.unwrap_or(""), 1);

    if rendered.contains(keys.text) {
        rendered.replacen(keys.text, text, 1)
    } else {
        rendered.push_str(text);
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed() -> String {
        "Fri Oct 16 09:05:03 2026".to_string()
    }

    #[test]
    fn test_no_decoration_passes_text_through() {
        assert_eq!(render("app", None, Some("ctx"), "hello", fixed), "hello");
    }

    #[test]
    fn test_text_placement() {
        let deco = Decoration::bare("topic: text\n");
        assert_eq!(render("app", Some(&deco), None, "hi", fixed), "app: hi\n");
    }

    #[test]
    fn test_template_without_text_is_prefix() {
        let deco = Decoration::bare("[topic] ");
        assert_eq!(render("app", Some(&deco), None, "hi", fixed), "[app] hi");
    }

    #[test]
    fn test_plain_template_is_stable() {
        let deco = Decoration::bare(">> ");
        for _ in 0..3 {
            assert_eq!(render("app", Some(&deco), None, "hi", fixed), ">> hi");
        }
    }

    #[test]
    fn test_all_keywords() {
        let deco = Decoration::bare("timestamp topic (context) text!");
        assert_eq!(
            render("app::db", Some(&deco), Some("replica"), "up", fixed),
            "Fri Oct 16 09:05:03 2026 app::db (replica) up!"
        );
    }

    #[test]
    fn test_missing_context_is_empty() {
        let deco = Decoration::bare("<context>text");
        assert_eq!(render("app", Some(&deco), None, "x", fixed), "<>x");
    }

    #[test]
    fn test_only_first_occurrence_replaced() {
        let deco = Decoration::bare("topic topic text text");
        assert_eq!(render("a", Some(&deco), None, "m", fixed), "a topic m text");
    }

    #[test]
    fn test_bare_keywords_match_inside_words() {
        let deco = Decoration::bare("topical: text");
        assert_eq!(render("app", Some(&deco), None, "m", fixed), "appal: m");
    }

    #[test]
    fn test_substitution_is_sequential() {
        // The topic value itself contains the context keyword.
        let deco = Decoration::bare("topic|");
        assert_eq!(render("context", Some(&deco), Some("c"), "m", fixed), "c|m");
    }

    #[test]
    fn test_timestamp_not_computed_when_unused() {
        let deco = Decoration::bare("topic: text");
        let out = render("app", Some(&deco), None, "m", || panic!("clock called"));
        assert_eq!(out, "app: m");
    }

    #[test]
    fn test_braced_syntax_ignores_bare_words() {
        let deco = Decoration::braced("{topic} topical {context}: {text}");
        assert_eq!(
            render("app", Some(&deco), Some("ctx"), "m", fixed),
            "app topical ctx: m"
        );
    }

    #[test]
    fn test_format_timestamp_is_asctime_like() {
        let now = Local.with_ymd_and_hms(2026, 10, 6, 9, 5, 3).unwrap();
        assert_eq!(format_timestamp(now), "Tue Oct  6 09:05:03 2026");
    }
}
