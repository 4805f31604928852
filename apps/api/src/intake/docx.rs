//! Raw text extraction from WordprocessingML (`.docx`) archives.
//! Only `w:t` runs are kept; paragraphs and line breaks become newlines.

use std::io::{Cursor, Read};

use anyhow::{bail, Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

/// Ceiling on the inflated size of the document part. Compressed uploads are
/// capped by the body limit, but a small archive can still expand enormously.
pub const MAX_DOCUMENT_XML_BYTES: u64 = 8 * 1024 * 1024;

pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).context("not a valid Office Open XML archive")?;

    let part = archive
        .by_name(DOCUMENT_PART)
        .with_context(|| format!("archive has no {DOCUMENT_PART} part"))?;
    if part.size() > MAX_DOCUMENT_XML_BYTES {
        bail!(
            "{DOCUMENT_PART} inflates to {} bytes, over the {MAX_DOCUMENT_XML_BYTES} byte limit",
            part.size()
        );
    }

    // The declared size comes from the archive itself, so the read is bounded too.
    let mut xml = String::new();
    part.take(MAX_DOCUMENT_XML_BYTES + 1)
        .read_to_string(&mut xml)
        .context("failed to read document body")?;
    if xml.len() as u64 > MAX_DOCUMENT_XML_BYTES {
        bail!("{DOCUMENT_PART} exceeds the {MAX_DOCUMENT_XML_BYTES} byte limit");
    }

    text_from_document_xml(&xml)
}

fn text_from_document_xml(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event().context("malformed document XML")? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_run_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => text.push(' '),
                b"br" | b"cr" | b"p" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => {
                text.push_str(&t.unescape().context("invalid XML escape in text run")?)
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}
