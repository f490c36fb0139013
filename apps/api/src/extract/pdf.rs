use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Returns true if the byte stream starts with the PDF header.
pub fn has_pdf_header(bytes: &[u8]) -> bool {
    // Some producers emit a few bytes of junk before the header.
    let head = &bytes[..bytes.len().min(1024)];
    head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

/// Extracts the text layer of a PDF, pages concatenated in order.
///
/// A PDF without a text layer (scanned pages) yields an empty string.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, AppError> {
    if !has_pdf_header(bytes) {
        return Err(AppError::CorruptDocument(
            "missing %PDF- header".to_string(),
        ));
    }

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::CorruptDocument(format!("PDF parse failed: {e}")))?;

    if text.trim().is_empty() {
        tracing::info!("PDF has no extractable text layer ({} bytes)", bytes.len());
        return Ok(String::new());
    }

    // pdf-extract separates pages with form feeds.
    Ok(text.replace('\u{c}', "\n"))
}

/// Assembles a one-page PDF around `content` with a valid xref table.
/// Font `/F1` is Helvetica.
#[cfg(test)]
pub(crate) fn single_page_pdf(content: &str) -> Vec<u8> {
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
         /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>"
            .to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{object}\nendobj\n", i + 1).as_bytes());
    }

    let xref_start = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    pdf
}
