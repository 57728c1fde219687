//! Downloadable company brochure.
//!
//! A [`Brochure`] is assembled from the site identity and handed to a
//! [`DocumentRenderer`]. Builds with the `pdf` feature render it with
//! `printpdf`; other builds fall back to plain text. The renderer is chosen
//! once, when the application state is built.

use std::sync::Arc;

use thiserror::Error;

use nexussphere_core::Expertise;

use crate::config::SiteIdentity;

/// Errors from rendering a brochure.
#[derive(Debug, Error)]
pub enum BrochureError {
    #[error("failed to render brochure: {0}")]
    Render(String),
}

/// The brochure's content, independent of output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brochure {
    pub title: String,
    pub tagline: String,
    pub introduction: String,
    pub services: Vec<String>,
    pub contact_lines: Vec<String>,
}

impl Brochure {
    /// The standard company brochure.
    #[must_use]
    pub fn company(identity: &SiteIdentity, website: &str) -> Self {
        Self {
            title: format!("{} Solutions - Company Brochure", identity.name),
            tagline: "Empowering Businesses with Innovative Technology Solutions".to_string(),
            introduction: format!(
                "{} Solutions specializes in web applications, enterprise SaaS solutions, \
                 mobile applications, and cutting-edge technologies for geoscience platforms, \
                 school management systems, and CRM solutions.",
                identity.name
            ),
            services: Expertise::ALL
                .into_iter()
                .map(|e| match e {
                    Expertise::EnterpriseSaas => "Enterprise SaaS Solutions".to_string(),
                    other => other.label().to_string(),
                })
                .collect(),
            contact_lines: vec![
                format!("Email: {}", identity.contact_email),
                format!("Phone: {}", identity.contact_phone),
                format!("Website: {}", website.trim_end_matches('/')),
            ],
        }
    }
}

/// Turns a [`Brochure`] into a downloadable file.
pub trait DocumentRenderer: Send + Sync {
    /// `Content-Type` of the rendered bytes.
    fn content_type(&self) -> &'static str;

    /// Suggested download name.
    fn file_name(&self) -> &'static str;

    /// Render the document.
    ///
    /// # Errors
    ///
    /// Returns `BrochureError::Render` if the output cannot be produced.
    fn render(&self, brochure: &Brochure) -> Result<Vec<u8>, BrochureError>;
}

/// The best renderer compiled into this build.
#[must_use]
pub fn default_renderer() -> Arc<dyn DocumentRenderer> {
    #[cfg(feature = "pdf")]
    {
        Arc::new(pdf::PdfRenderer)
    }
    #[cfg(not(feature = "pdf"))]
    {
        Arc::new(PlainTextRenderer)
    }
}

/// UTF-8 text rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl DocumentRenderer for PlainTextRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn file_name(&self) -> &'static str {
        "nexussphere_brochure.txt"
    }

    fn render(&self, brochure: &Brochure) -> Result<Vec<u8>, BrochureError> {
        let mut out = String::new();
        out.push_str(&brochure.title);
        out.push_str("\n\n");
        out.push_str(&brochure.tagline);
        out.push_str("\n\n");
        out.push_str(&brochure.introduction);
        out.push_str("\n\nOur Services:\n");
        for service in &brochure.services {
            out.push_str("- ");
            out.push_str(service);
            out.push('\n');
        }
        out.push_str("\nContact Us:\n");
        for line in &brochure.contact_lines {
            out.push_str(line);
            out.push('\n');
        }
        Ok(out.into_bytes())
    }
}

#[cfg(feature = "pdf")]
pub mod pdf {
    //! Single-page PDF rendering with the built-in Helvetica fonts.

    use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

    use super::{Brochure, BrochureError, DocumentRenderer};

    const PAGE_WIDTH: Mm = Mm(215.9);
    const PAGE_HEIGHT: Mm = Mm(279.4);
    const MARGIN: f32 = 20.0;
    const WRAP_COLUMNS: usize = 90;

    /// US-letter PDF rendering.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct PdfRenderer;

    struct Cursor {
        layer: PdfLayerReference,
        y: f32,
    }

    impl Cursor {
        fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
            self.layer.use_text(text, size, Mm(MARGIN), Mm(self.y), font);
            // 1.4x leading, points to millimetres.
            self.y -= size * 0.5;
        }

        fn gap(&mut self, mm: f32) {
            self.y -= mm;
        }
    }

    impl DocumentRenderer for PdfRenderer {
        fn content_type(&self) -> &'static str {
            "application/pdf"
        }

        fn file_name(&self) -> &'static str {
            "nexussphere_brochure.pdf"
        }

        fn render(&self, brochure: &Brochure) -> Result<Vec<u8>, BrochureError> {
            let (doc, page, layer) =
                PdfDocument::new(brochure.title.as_str(), PAGE_WIDTH, PAGE_HEIGHT, "Brochure");
            let bold = doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| BrochureError::Render(e.to_string()))?;
            let regular = doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| BrochureError::Render(e.to_string()))?;

            let mut cursor = Cursor {
                layer: doc.get_page(page).get_layer(layer),
                y: PAGE_HEIGHT.0 - MARGIN,
            };

            cursor.line(&brochure.title, 20.0, &bold);
            cursor.gap(6.0);
            cursor.line(&brochure.tagline, 14.0, &bold);
            cursor.gap(2.0);
            for line in wrap(&brochure.introduction, WRAP_COLUMNS) {
                cursor.line(&line, 11.0, &regular);
            }

            cursor.gap(6.0);
            cursor.line("Our Services:", 13.0, &bold);
            for service in &brochure.services {
                cursor.line(&format!("- {service}"), 11.0, &regular);
            }

            cursor.gap(6.0);
            cursor.line("Contact Us:", 13.0, &bold);
            for line in &brochure.contact_lines {
                cursor.line(line, 11.0, &regular);
            }

            doc.save_to_bytes()
                .map_err(|e| BrochureError::Render(e.to_string()))
        }
    }

    /// Greedy word wrap at `columns` characters.
    fn wrap(text: &str, columns: usize) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        for word in text.split_whitespace() {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > columns
            {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    #[cfg(test)]
    #[allow(clippy::unwrap_used)]
    mod tests {
        use super::*;
        use crate::config::SiteIdentity;

        #[test]
        fn test_wrap() {
            assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
            assert!(wrap("", 10).is_empty());
        }

        #[test]
        fn test_renders_pdf_bytes() {
            let brochure = Brochure::company(&SiteIdentity::default(), "https://example.org");
            let bytes = PdfRenderer.render(&brochure).unwrap();
            assert!(bytes.starts_with(b"%PDF"));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_company_brochure_content() {
        let brochure = Brochure::company(&SiteIdentity::default(), "https://nexusspheresolutions.com/");
        assert_eq!(brochure.title, "NexusSphere Solutions - Company Brochure");
        assert_eq!(brochure.services.len(), 6);
        assert_eq!(brochure.services[1], "Enterprise SaaS Solutions");
        assert_eq!(
            brochure.contact_lines[2],
            "Website: https://nexusspheresolutions.com"
        );
    }

    #[test]
    fn test_plain_text_rendering() {
        let brochure = Brochure::company(&SiteIdentity::default(), "https://example.org");
        let text = String::from_utf8(PlainTextRenderer.render(&brochure).unwrap()).unwrap();

        assert!(text.starts_with("NexusSphere Solutions - Company Brochure\n\n"));
        assert!(text.contains("Our Services:\n- Web Applications\n"));
        assert!(text.contains("Email: info@nexusspheresolutions.com\n"));
        assert_eq!(PlainTextRenderer.file_name(), "nexussphere_brochure.txt");
    }
}
