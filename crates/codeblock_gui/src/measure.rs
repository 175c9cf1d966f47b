//! Measurement service backed by an egui galley.

use codeblock_core::{MeasurementService, VisualFragment, WrapWidth};
use eframe::egui::Galley;

/// Row geometry read from a galley that egui already laid out.
///
/// The galley was wrapped by the text edit at its own width, so the width
/// argument of [`MeasurementService::layout`] is ignored.
#[derive(Clone, Debug, Default)]
pub struct GalleyMeasurement {
    fragments: Vec<VisualFragment>,
    default_line_height: f32,
}

impl GalleyMeasurement {
    /// Collects one fragment per galley row.
    ///
    /// `fallback_line_height` is used for lines no row reports.
    pub fn from_galley(galley: &Galley, fallback_line_height: f32) -> Self {
        let mut offset = 0usize;
        let mut fragments = Vec::with_capacity(galley.rows.len());
        for row in &galley.rows {
            let chars = row.char_count_including_newline();
            fragments.push(VisualFragment::new(offset..offset + chars, row.height()));
            offset += chars;
        }
        let default_line_height = galley
            .rows
            .first()
            .map(|row| row.height())
            .filter(|height| *height > 0.0)
            .unwrap_or(fallback_line_height);
        Self {
            fragments,
            default_line_height,
        }
    }

    pub fn fragments(&self) -> &[VisualFragment] {
        &self.fragments
    }
}

impl MeasurementService for GalleyMeasurement {
    fn layout<'a>(
        &'a self,
        _text: &'a str,
        _width: WrapWidth,
    ) -> impl Iterator<Item = VisualFragment> + 'a {
        self.fragments.iter().cloned()
    }

    fn default_line_height(&self) -> f32 {
        self.default_line_height
    }
}
