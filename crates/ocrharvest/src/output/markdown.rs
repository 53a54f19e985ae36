use crate::processor::ImageResult;

pub const DOCUMENT_TITLE: &str = "# OCR Output";
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";
pub const CODE_FENCE: &str = "```";
pub const LINKS_LABEL: &str = "**Links detected:**";

/// Renders one image as a markdown section: heading, fenced text and, when
/// links were found, a bullet list of them.
pub fn render_section(result: &ImageResult) -> String {
    let mut section = format!(
        "## {}\n\n{}\n{}\n{}\n",
        result.source_base_name, CODE_FENCE, result.recognized_text, CODE_FENCE
    );

    if !result.urls.is_empty() {
        section.push('\n');
        section.push_str(LINKS_LABEL);
        section.push('\n');
        let bullets: Vec<String> = result.urls.iter().map(|u| format!("- {}", u)).collect();
        section.push_str(&bullets.join("\n"));
        section.push('\n');
    }

    section
}

pub fn render_document(sections: &[String]) -> String {
    format!(
        "{}\n\n{}\n",
        DOCUMENT_TITLE,
        sections.join(SECTION_SEPARATOR)
    )
}
