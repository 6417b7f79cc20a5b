//! Strips channel boilerplate from titles and descriptions.
//!
//! Description cleanup is an ordered list of rules. Each rule sees the text
//! left behind by the rules before it, so reordering the list changes the
//! output.

use regex::Regex;

/// Channel-name suffixes, tried in this order against the progressively
/// shortened title.
const TITLE_SUFFIXES: &[&str] = &[
    "- National Taiwan University Chorus",
    " - NTU Chorus & KMU Singers",
    "-National Taiwan University Chorus",
    "NTUChorus & University of Utah Chamber Choir and A Cappella Choir",
    "@TwincussionDuo & National Taiwan University Chorus",
    "National Taiwan University Chorus",
    "National Taiwan University Chorus in Libby Gardner Concert Hall, U. of Utah",
    "- ",
];

/// Removes known channel-name suffixes and trailing separators.
///
/// A single pass can leave another suffix exposed, so passes repeat until the
/// title is stable.
pub fn normalize_title(title: &str) -> String {
    let mut current = strip_title_pass(title);
    loop {
        let next = strip_title_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_title_pass(title: &str) -> String {
    let mut rest = title;
    for suffix in TITLE_SUFFIXES {
        rest = rest.strip_suffix(suffix).unwrap_or(rest);
    }
    rest.trim().to_string()
}

/// How much text a matched rule removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Span {
    /// From the marker through the next newline.
    ToLineEnd,
    /// From the start of the text through the newline ending the marker's line.
    ThroughMarkerLine,
    /// From the marker to the end of the text.
    ToTextEnd,
}

#[derive(Debug)]
struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn marker(marker: &str, span: Span) -> Result<Self, regex::Error> {
        Self::marker_with_flags(marker, span, "s")
    }

    fn marker_ignore_case(marker: &str, span: Span) -> Result<Self, regex::Error> {
        Self::marker_with_flags(marker, span, "si")
    }

    fn marker_with_flags(marker: &str, span: Span, flags: &str) -> Result<Self, regex::Error> {
        let marker = regex::escape(marker);
        let body = match span {
            Span::ToLineEnd => format!("{marker}.*?\n"),
            Span::ThroughMarkerLine => format!(".*?{marker}.*?\n"),
            Span::ToTextEnd => format!("{marker}.*"),
        };
        Self::pattern(&format!("(?{flags}){body}"), "")
    }

    fn literal(text: &str, replacement: &'static str) -> Result<Self, regex::Error> {
        Self::pattern(&regex::escape(text), replacement)
    }

    fn pattern(pattern: &str, replacement: &'static str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement,
        })
    }

    fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, self.replacement)
            .trim()
            .to_string()
    }
}

/// Credit lines that list performers and engineers.
const CREDIT_MARKERS: &[&str] = &[
    "Conductor",
    "Piano",
    "Pianist",
    "Solo",
    "Soli",
    "Violin",
    "Poem",
    "Percussion",
    "Composer",
    "Lyric",
    "Arrangement",
    "Audio recording engineer",
];

/// Compiled description rules, in application order.
#[derive(Debug)]
pub struct DescriptionCleaner {
    rules: Vec<Rule>,
}

impl DescriptionCleaner {
    pub fn new() -> Result<Self, regex::Error> {
        let mut rules = vec![
            Rule::marker("委託編曲", Span::ThroughMarkerLine)?,
            Rule::marker("委託創作", Span::ThroughMarkerLine)?,
            Rule::marker("Commissioned", Span::ToLineEnd)?,
            Rule::marker("Performed ", Span::ToLineEnd)?,
            Rule::marker("Debut ", Span::ToLineEnd)?,
            Rule::marker("樂譜訂購：", Span::ToLineEnd)?,
            Rule::literal("\u{3000}", " ")?,
        ];
        for marker in CREDIT_MARKERS {
            rules.push(Rule::marker(marker, Span::ToLineEnd)?);
        }
        rules.extend([
            Rule::marker("Published by", Span::ToLineEnd)?,
            Rule::marker_ignore_case("e-mail", Span::ToLineEnd)?,
            Rule::marker_ignore_case("email", Span::ToLineEnd)?,
            Rule::marker("出版發行", Span::ToLineEnd)?,
            Rule::marker("YouTube", Span::ToLineEnd)?,
            Rule::marker("Social Links：", Span::ToTextEnd)?,
            Rule::marker("Facebook：", Span::ToTextEnd)?,
            Rule::pattern(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}", "")?,
            Rule::literal("\nNational Taiwan University Chorus 台大合唱團\n", "")?,
            Rule::pattern(r"[─—\- \n]+", " ")?,
        ]);
        Ok(Self { rules })
    }

    pub fn clean(&self, description: &str) -> String {
        let mut text = description.trim().to_string();
        for rule in &self.rules {
            text = rule.apply(&text);
        }
        text
    }
}
