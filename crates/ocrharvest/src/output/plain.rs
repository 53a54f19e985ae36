use crate::output::markdown::{CODE_FENCE, LINKS_LABEL, SECTION_SEPARATOR};

/// Strips the markdown framing (code fences and the links label) from a
/// rendered section. Heading and link bullets are kept.
pub fn plain_block(markdown_section: &str) -> String {
    markdown_section
        .lines()
        .filter(|line| !line.starts_with(CODE_FENCE) && !line.starts_with(LINKS_LABEL))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

pub fn render_document(markdown_sections: &[String]) -> String {
    let blocks: Vec<String> = markdown_sections.iter().map(|s| plain_block(s)).collect();
    format!("{}\n", blocks.join(SECTION_SEPARATOR))
}
