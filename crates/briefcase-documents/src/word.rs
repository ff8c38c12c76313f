use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};

use crate::error::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Raw text of the main document part: one line per paragraph
pub(crate) fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Word(format!("not an Office Open XML package: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Word(format!("missing {}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Word(e.to_string()))?;

    document_text(&xml)
}

fn document_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" | b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractError::Word(e.to_string()))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ExtractError::Word(format!(
                    "invalid XML at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }

    Ok(out.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_tabs_and_entities() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Section 1</w:t></w:r><w:r><w:tab/><w:t xml:space="preserve">Parties &amp; Terms</w:t></w:r></w:p>
    <w:p><w:r><w:t>Line one</w:t><w:br/><w:t>Line two</w:t></w:r></w:p>
    <w:p/>
  </w:body>
</w:document>"#;

        let text = document_text(xml).unwrap();
        assert_eq!(text, "Section 1\tParties & Terms\nLine one\nLine two");
    }

    #[test]
    fn test_empty_paragraph_keeps_blank_line() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:t>Recitals</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>Terms</w:t></w:r></w:p>
</w:body></w:document>"#;

        assert_eq!(document_text(xml).unwrap(), "Recitals\n\nTerms");
    }

    #[test]
    fn test_not_a_zip() {
        let err = extract(b"\xD0\xCF\x11\xE0 legacy binary").unwrap_err();
        assert!(matches!(err, ExtractError::Word(_)));
    }
}
