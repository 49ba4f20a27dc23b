//! Twee source reader
//!
//! A line starting with `::` opens a passage; its title is the rest of the line with an
//! optional trailing `[tags]` block removed. The passage body runs up to the next header.
//! Text before the first header belongs to no passage and is dropped.

use twsam_compiler::twsam::source::PassageSource;

const BOM: char = '\u{feff}';

pub fn parse_twee(text: &str) -> Vec<PassageSource> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut passages = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in text.lines() {
        if let Some(header) = line.strip_prefix("::") {
            if let Some((title, body)) = current.take() {
                passages.push(finish(title, body));
            }
            current = Some((header_title(header).to_string(), String::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push_str(line);
            body.push('\n');
        }
    }
    if let Some((title, body)) = current {
        passages.push(finish(title, body));
    }

    passages
}

fn finish(title: String, body: String) -> PassageSource {
    PassageSource::new(title, body.trim_end())
}

fn header_title(header: &str) -> &str {
    let header = header.trim();
    match header.rfind('[') {
        Some(open) if header.ends_with(']') => header[..open].trim_end(),
        _ => header,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_passages_at_headers() {
        let passages = parse_twee(":: Start\nHello\n[[Hall]]\n\n:: Hall\nA hall.\n\n\n");
        assert_eq!(
            passages,
            vec![
                PassageSource::new("Start", "Hello\n[[Hall]]"),
                PassageSource::new("Hall", "A hall."),
            ]
        );
    }

    #[test]
    fn strips_tags_and_bom() {
        let passages = parse_twee("\u{feff}::Start [intro dark]\ntext");
        assert_eq!(passages, vec![PassageSource::new("Start", "text")]);
    }

    #[test]
    fn ignores_text_before_first_header() {
        let passages = parse_twee("preamble\n:: Start\nbody");
        assert_eq!(passages, vec![PassageSource::new("Start", "body")]);
    }

    #[test]
    fn only_trailing_block_is_tags() {
        assert_eq!(header_title(" Room [A] east "), "Room [A] east");
        assert_eq!(header_title(" Room [A] [tag] "), "Room [A]");
        assert_eq!(header_title(" Room east "), "Room east");
    }

    #[test]
    fn header_needs_line_start() {
        let passages = parse_twee(":: Start\nsee :: this\n  :: not a header");
        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].text, "see :: this\n  :: not a header");
    }
}
