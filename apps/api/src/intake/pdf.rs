//! PDF text extraction. Pages are visited in ascending order; the runs of a
//! page are joined by single spaces and every page ends with a newline.

use std::panic;

use anyhow::{anyhow, Result};

pub fn extract_text(bytes: &[u8]) -> Result<String> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| anyhow!("PDF decoder aborted while reading the document"))?
        .map_err(|e| anyhow!("failed to open PDF byte stream: {e}"))?;

    Ok(join_pages(&pages))
}

fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut transcript = String::new();
    for page in pages {
        let runs: Vec<&str> = page.as_ref().split_whitespace().collect();
        transcript.push_str(&runs.join(" "));
        transcript.push('\n');
    }
    transcript
}
