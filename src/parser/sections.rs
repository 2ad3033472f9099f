use std::sync::LazyLock;

use regex::Regex;

use super::tables::strip_markers;

static ATX_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,6}\s+(.+)").unwrap());
static BOLD_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*([^*]+)\*\*\s*:?\s*$").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: String,
    pub content: String,
}

impl Section {
    pub fn heading_lower(&self) -> String {
        self.heading.to_lowercase()
    }
}

/// Partition `text` into heading-delimited sections. Text before the first
/// heading becomes a section with an empty heading.
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut heading = String::new();
    let mut lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some(next) = detect_heading(line.trim()) {
            push_section(&mut sections, std::mem::take(&mut heading), &lines);
            lines.clear();
            heading = next;
            continue;
        }
        lines.push(line);
    }
    push_section(&mut sections, heading, &lines);

    sections
}

fn detect_heading(line: &str) -> Option<String> {
    let caps = ATX_HEADING_RE
        .captures(line)
        .or_else(|| BOLD_HEADING_RE.captures(line))?;
    let text = strip_markers(caps[1].trim_end_matches('#'));
    Some(text.trim_end_matches(':').trim().to_string())
}

fn push_section(sections: &mut Vec<Section>, heading: String, lines: &[&str]) {
    let content = lines.join("\n");
    if heading.is_empty() && content.trim().is_empty() {
        return;
    }
    sections.push(Section { heading, content });
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn headings(md: &str) -> Vec<String> {
        split_sections(md).into_iter().map(|s| s.heading).collect()
    }

    #[test]
    fn atx_headings() {
        let md = "# Title\nintro\n## Strengths\n| a |\n### Weaknesses ###\nbody";
        assert_eq!(headings(md), vec!["Title", "Strengths", "Weaknesses"]);
    }

    #[test]
    fn bold_line_headings() {
        let md = "**Strengths:**\nline one\n**Weaknesses**\nline two";
        let sections = split_sections(md);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading, "Strengths");
        assert_eq!(sections[0].content, "line one");
        assert_eq!(sections[1].heading, "Weaknesses");
    }

    #[test]
    fn bold_inside_sentence_is_not_a_heading() {
        let md = "**Note** this is prose\nmore";
        let sections = split_sections(md);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading, "");
    }

    #[test]
    fn leading_block_has_empty_heading() {
        let md = "Here is the analysis.\n\n## Opportunities\nrow";
        let sections = split_sections(md);
        assert_eq!(sections[0].heading, "");
        assert_eq!(sections[0].content, "Here is the analysis.\n");
        assert_eq!(sections[1].heading, "Opportunities");
    }

    #[test]
    fn markers_stripped_from_heading() {
        let md = "## **Competitive Rivalry**\n| x |";
        assert_eq!(headings(md), vec!["Competitive Rivalry"]);
    }

    #[test]
    fn empty_heading_sections_kept() {
        let md = "## A\n## B\ncontent";
        let sections = split_sections(md);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].content, "");
        assert_eq!(sections[1].content, "content");
    }

    #[test]
    fn blank_input_has_no_sections() {
        assert!(split_sections("").is_empty());
        assert!(split_sections("   \n\n").is_empty());
    }

    #[test]
    fn hashtag_without_space_is_text() {
        let md = "#hashtag\n####### seven";
        let sections = split_sections(md);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading, "");
    }
}
