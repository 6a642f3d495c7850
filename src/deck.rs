use std::fmt::Write as _;
use std::path::Path;
use anyhow::Result;
use log::{debug, warn};

use crate::errors::RenderError;
use crate::file_utils::FileManager;
use crate::transcript::Segment;

// @module: Slide deck output

/// Builds a Marp markdown deck: one slide per segment in document order,
/// narration stored as the slide's speaker notes. Segments without an
/// image still get a text slide on this path.
pub struct DeckBuilder {
    /// Deck title shown on the opening slide
    title: String,
}

impl DeckBuilder {
    /// Create a deck builder with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }

    /// Render the deck and write it to `output`. Returns the number of
    /// content slides written.
    pub fn write_deck(&self, segments: &[Segment], output: &Path) -> Result<usize> {
        if segments.is_empty() {
            return Err(RenderError::EmptyTimeline.into());
        }

        let content = self.render_deck(segments);
        FileManager::write_to_file(output, &content)?;
        debug!("Deck with {} slides written to {:?}", segments.len(), output);
        Ok(segments.len())
    }

    /// Render the full deck document as a string
    pub fn render_deck(&self, segments: &[Segment]) -> String {
        let mut deck = String::new();

        // Front matter: Marp directive, 16:9 frame
        deck.push_str("---\nmarp: true\nsize: 16:9\npaginate: true\n---\n\n");
        let _ = writeln!(deck, "# {}\n", self.title);

        for (i, segment) in segments.iter().enumerate() {
            deck.push_str("---\n\n");

            match &segment.label {
                Some(label) => {
                    let _ = writeln!(deck, "## {}\n", label);
                }
                None => {
                    let _ = writeln!(deck, "## Slide {}\n", i + 1);
                }
            }

            if segment.images.is_empty() {
                warn!("Segment {} has no image, emitting text-only slide", i + 1);
                let _ = writeln!(deck, "{}\n", segment.narration);
            } else {
                for image in &segment.images {
                    let _ = writeln!(deck, "![{}]({})", slide_alt_text(image), image);
                }
                deck.push('\n');
            }

            // Speaker notes carry the narration for the presenter view
            let _ = writeln!(deck, "<!--\n{}\n-->\n", segment.narration);
        }

        deck
    }
}

/// Alt text derived from the image file stem
fn slide_alt_text(reference: &str) -> String {
    Path::new(reference)
        .file_stem()
        .map(|s| s.to_string_lossy().replace(['_', '-'], " "))
        .unwrap_or_else(|| "slide image".to_string())
}
