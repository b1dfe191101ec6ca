//! Document overlay compositor — merges collected answers onto the template
//! form.
//!
//! The compositor never touches the template's existing content: each answer
//! is drawn into an ephemeral overlay page whose content stream is appended
//! on top of the corresponding template page. Everything transient is
//! allocated per invocation, so concurrent finalizations from different
//! sessions cannot interfere.

use std::path::PathBuf;
use std::sync::Arc;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};

use crate::error::RenderError;
use crate::pdf::positions::PositionRegistry;
use crate::schema::AnswerSet;

/// Name under which the overlay font is registered in page resources.
/// Chosen to be unlikely to collide with template font names.
const OVERLAY_FONT: &str = "FAov";

/// All answer text is drawn in Helvetica at 10pt.
const FONT_SIZE: i64 = 10;

/// One page of the ephemeral overlay document. Pages with no mapped fields
/// stay blank, preserving page ordering and count parity with the template.
#[derive(Debug, Clone, Default)]
struct OverlayPage {
    operations: Vec<Operation>,
}

impl OverlayPage {
    fn is_blank(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Renders the completed form: template document + answer overlay.
pub struct FormRenderer {
    template_path: PathBuf,
    positions: Arc<PositionRegistry>,
}

impl FormRenderer {
    pub fn new(template_path: impl Into<PathBuf>, positions: Arc<PositionRegistry>) -> Self {
        Self {
            template_path: template_path.into(),
            positions,
        }
    }

    /// Composite the answer set onto the template and return the output
    /// document bytes.
    ///
    /// The output always has exactly as many pages as the template. Failure
    /// to read the template is fatal and reported as
    /// [`RenderError::TemplateMissing`]; per-field draw problems are skipped
    /// with a warning and the render continues.
    pub fn render(&self, answers: &AnswerSet) -> Result<Vec<u8>, RenderError> {
        let mut doc =
            Document::load(&self.template_path).map_err(|source| RenderError::TemplateMissing {
                path: self.template_path.display().to_string(),
                source,
            })?;

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let overlay = build_overlay(answers, &self.positions, page_ids.len());
        merge_overlay(&mut doc, &page_ids, &overlay)?;

        let mut output = Vec::new();
        doc.save_to(&mut output).map_err(lopdf::Error::IO)?;
        tracing::info!(
            pages = page_ids.len(),
            bytes = output.len(),
            "Rendered completed form"
        );
        Ok(output)
    }
}

/// Build the overlay: exactly one page per template page.
///
/// Empty answers and unmapped keys draw nothing (no placeholder artifacts).
/// Each value is drawn as a single undivided line at its mapped coordinate —
/// no wrapping or overflow detection; callers needing wrapped layout must
/// pre-format the value.
fn build_overlay(
    answers: &AnswerSet,
    positions: &PositionRegistry,
    page_count: usize,
) -> Vec<OverlayPage> {
    (0..page_count as u32)
        .map(|page_index| {
            let mut operations = Vec::new();
            for (key, pos) in positions.on_page(page_index) {
                let Some(value) = answers.get(key) else {
                    continue;
                };
                if value.is_empty() {
                    continue;
                }
                let Some(bytes) = encode_win_ansi(value) else {
                    tracing::warn!(
                        field = key,
                        "Skipping field: text not representable in the overlay font encoding"
                    );
                    continue;
                };
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![OVERLAY_FONT.into(), FONT_SIZE.into()],
                ));
                operations.push(Operation::new("Td", vec![pos.x.into(), pos.y.into()]));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(bytes, StringFormat::Literal)],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            OverlayPage { operations }
        })
        .collect()
}

/// Composite each overlay page on top of its template page.
///
/// Template content is preserved; the overlay stream is appended after it.
/// If the overlay has fewer pages than the template the remaining template
/// pages pass through unmodified.
fn merge_overlay(
    doc: &mut Document,
    page_ids: &[ObjectId],
    overlay: &[OverlayPage],
) -> Result<(), lopdf::Error> {
    if overlay.iter().all(OverlayPage::is_blank) {
        return Ok(());
    }

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    for (page_id, page) in page_ids.iter().zip(overlay) {
        if page.is_blank() {
            continue;
        }
        let content = Content {
            operations: page.operations.clone(),
        };
        let stream_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
        append_page_content(doc, *page_id, stream_id)?;
        register_overlay_font(doc, *page_id, font_id)?;
    }
    Ok(())
}

/// Append a content stream to a page, keeping whatever is already there.
fn append_page_content(
    doc: &mut Document,
    page_id: ObjectId,
    stream_id: ObjectId,
) -> Result<(), lopdf::Error> {
    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    let overlay_ref = Object::Reference(stream_id);
    match page.get_mut(b"Contents") {
        Ok(Object::Array(contents)) => contents.push(overlay_ref),
        Ok(existing @ Object::Reference(_)) => {
            let template_ref = existing.clone();
            *existing = Object::Array(vec![template_ref, overlay_ref]);
        }
        _ => page.set("Contents", overlay_ref),
    }
    Ok(())
}

/// Register the overlay font in the page's resources.
///
/// Resources may be inline on the page, behind a reference, or inherited
/// from the page tree; in the inherited case a page-local dictionary is
/// created, which shadows inherited entries for that page.
fn register_overlay_font(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
) -> Result<(), lopdf::Error> {
    let resources_ref = {
        let page = doc.get_object(page_id)?.as_dict()?;
        match page.get(b"Resources") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        }
    };

    let resources = match resources_ref {
        Some(id) => doc.get_object_mut(id)?.as_dict_mut()?,
        None => {
            let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
            if !matches!(page.get(b"Resources"), Ok(Object::Dictionary(_))) {
                page.set("Resources", Dictionary::new());
            }
            page.get_mut(b"Resources")?.as_dict_mut()?
        }
    };

    if !matches!(resources.get(b"Font"), Ok(Object::Dictionary(_))) {
        resources.set("Font", Dictionary::new());
    }
    resources
        .get_mut(b"Font")?
        .as_dict_mut()?
        .set(OVERLAY_FONT, Object::Reference(font_id));
    Ok(())
}

/// Encode text for the overlay font (WinAnsi). Returns `None` if any
/// character falls outside the encoding — the caller skips that field.
fn encode_win_ansi(text: &str) -> Option<Vec<u8>> {
    text.chars()
        .map(|c| match c as u32 {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => Some(code as u8),
            _ => None,
        })
        .collect()
}
