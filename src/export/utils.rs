use pulldown_cmark::{Event, Parser, Tag, TagEnd};

const EXCERPT_CHARS: usize = 200;

/// Plain-text excerpt of the body's leading prose, for documents whose
/// author did not write a summary. Fenced code and image alt text contribute
/// nothing.
pub(crate) fn excerpt(body: &str) -> String {
    let mut out = String::new();
    let mut skipping = 0usize;

    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::CodeBlock(_)) | Event::Start(Tag::Image { .. }) => skipping += 1,
            Event::End(TagEnd::CodeBlock) | Event::End(TagEnd::Image) => {
                skipping = skipping.saturating_sub(1);
            }
            Event::Text(ref text) | Event::Code(ref text) => {
                if skipping == 0 {
                    out.push_str(text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if skipping == 0 && !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            Event::End(TagEnd::Paragraph) if !out.trim().is_empty() => break,
            _ => {}
        }
        if out.chars().count() >= EXCERPT_CHARS {
            break;
        }
    }

    out.trim().chars().take(EXCERPT_CHARS).collect()
}
