use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::DocumentError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts paragraph text from a DOCX container.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DocumentError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| DocumentError::Docx(format!("{DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)?;
    text_from_document_xml(&xml)
}

/// Walks `w:p` / `w:t` runs. Paragraphs end with a newline, `w:tab` becomes a tab.
pub(crate) fn text_from_document_xml(xml: &str) -> Result<String, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|e| DocumentError::Docx(e.to_string()))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocumentError::Docx(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(out.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>SKILLS</w:t></w:r></w:p>
    <w:p><w:r><w:t>Rust</w:t></w:r><w:r><w:tab/><w:t xml:space="preserve">Go &amp; C++</w:t></w:r></w:p>
    <w:p/>
  </w:body>
</w:document>"#;

    #[test]
    fn test_text_from_document_xml_paragraphs_and_tabs() {
        let text = text_from_document_xml(BODY).unwrap();
        assert_eq!(text, "SKILLS\nRust\tGo & C++");
    }

    #[test]
    fn test_extract_text_from_zip_container() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer
                .start_file(DOCUMENT_PART, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(BODY.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        let text = extract_text(buf.get_ref()).unwrap();
        assert!(text.starts_with("SKILLS\n"));
    }

    #[test]
    fn test_extract_text_rejects_non_zip() {
        let err = extract_text(b"not a zip file").unwrap_err();
        assert!(matches!(err, DocumentError::Docx(_)));
    }
}
