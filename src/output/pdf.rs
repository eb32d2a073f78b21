//! Document assembler: combines fragments and renders the PDF
//!
//! Fragments are concatenated into one HTML document, each wrapped in a
//! page-break container so the renderer starts every fragment on a fresh
//! page. The PDF bytes are written to a temporary file next to the target
//! and renamed only on full success, so a failed run never leaves a partial
//! or corrupt file behind.

use crate::{RenderError, Result};
use printpdf::{GeneratePdfOptions, PdfDocument, PdfSaveOptions};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Basic print styling applied to the combined document.
const DOCUMENT_CSS: &str = r#"
body { font-family: Helvetica, Arial, sans-serif; margin: 20px; }
h1, h2, h3, h4, h5, h6 { color: #2c3e50; }
p { font-size: 14px; line-height: 1.6; }
pre { background-color: #f5f5f5; padding: 10px; }
code { background-color: #f9f9f9; padding: 2px 4px; }
table { border-collapse: collapse; margin-bottom: 20px; }
th, td { border: 1px solid #ddd; padding: 8px; }
th { background-color: #f2f2f2; }
"#;

/// Wraps the ordered fragments into a single HTML document.
///
/// Each fragment becomes its own page-break section, so fragment order is
/// page order in the rendered PDF.
pub fn wrap_document(fragments: &[String]) -> String {
    let mut body = String::new();
    for fragment in fragments {
        body.push_str("<div style=\"page-break-after: always\">\n");
        body.push_str(fragment);
        body.push_str("\n</div>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Combined Document</title>\n<style>{DOCUMENT_CSS}</style>\n\
         </head>\n<body>\n{body}</body>\n</html>\n"
    )
}

/// Renders the fragments to a PDF at `output_path`.
///
/// On a rendering failure the fragments are re-rendered individually to
/// name the offending fragment index when determinable.
pub fn assemble(fragments: &[String], output_path: &Path) -> Result<()> {
    tracing::info!(
        "Assembling {} fragments into {}",
        fragments.len(),
        output_path.display()
    );

    let html = wrap_document(fragments);
    let bytes = match render_pdf(&html) {
        Ok(bytes) => bytes,
        Err(message) => {
            let error = match locate_failing_fragment(fragments) {
                Some(index) => RenderError::Fragment { index, message },
                None => RenderError::Document { message },
            };
            return Err(error.into());
        }
    };

    write_atomic(output_path, &bytes)?;
    tracing::info!("Wrote {} bytes to {}", bytes.len(), output_path.display());
    Ok(())
}

/// Renders one HTML document to PDF bytes.
fn render_pdf(html: &str) -> std::result::Result<Vec<u8>, String> {
    let images = BTreeMap::new();
    let fonts = BTreeMap::new();
    let options = GeneratePdfOptions::default();
    let mut warnings = Vec::new();

    let document = PdfDocument::from_html(html, &images, &fonts, &options, &mut warnings)
        .map_err(|e| e.to_string())?;

    for warning in &warnings {
        tracing::debug!("Renderer warning: {:?}", warning);
    }

    Ok(document.save(&PdfSaveOptions::default(), &mut Vec::new()))
}

/// Re-renders fragments one at a time to find the first one the renderer
/// rejects. Returns None when the failure is not attributable to a single
/// fragment.
fn locate_failing_fragment(fragments: &[String]) -> Option<usize> {
    fragments
        .iter()
        .position(|fragment| render_pdf(&wrap_document(std::slice::from_ref(fragment))).is_err())
}

/// Writes bytes to a temporary file in the target directory and renames it
/// into place. No output appears at the target path unless the write fully
/// succeeds.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::result::Result<(), RenderError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_wrap_document_preserves_fragment_order() {
        let fragments = vec!["<p>alpha</p>".to_string(), "<p>beta</p>".to_string()];
        let html = wrap_document(&fragments);

        let alpha = html.find("alpha").unwrap();
        let beta = html.find("beta").unwrap();
        assert!(alpha < beta);
        assert_eq!(html.matches("page-break-after").count(), 2);
    }

    #[test]
    fn test_wrap_document_empty() {
        let html = wrap_document(&[]);
        assert!(html.contains("<body>"));
        assert!(!html.contains("page-break-after"));
    }

    #[test]
    fn test_assemble_writes_pdf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let fragments = vec![
            "<div><h1>One</h1><p>first page</p></div>".to_string(),
            "<div><h1>Two</h1><p>second page</p></div>".to_string(),
        ];

        assemble(&fragments, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_write_atomic_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.bin");

        write_atomic(&path, b"hello").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }
}
