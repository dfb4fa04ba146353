//! Compressor: hand a family's original fonts to the conversion engine.

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::collect::{has_extension, SOURCE_EXTENSIONS};
use crate::error::Result;
use crate::operations::FontConverter;

/// Original font file names directly inside `output_dir`, sorted.
pub fn source_fonts(output_dir: &Path) -> Result<Vec<String>> {
    let mut fonts = Vec::new();
    for entry in fs::read_dir(output_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() && has_extension(&entry.path(), SOURCE_EXTENSIONS) {
            fonts.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    fonts.sort();
    Ok(fonts)
}

/// Produce web-optimized siblings for every original font in `output_dir`.
///
/// Returns the number of fonts handed to the converter. The converter is
/// invoked at most once.
pub fn compress(family: &str, output_dir: &Path, converter: &dyn FontConverter) -> Result<usize> {
    if !output_dir.is_dir() {
        debug!("[{}] No output directory, nothing to compress", family);
        return Ok(0);
    }

    let fonts = source_fonts(output_dir)?;
    if fonts.is_empty() {
        if fs::read_dir(output_dir)?.next().is_some() {
            warn!(
                "[{}] {} has content but no .otf/.ttf fonts to compress",
                family,
                output_dir.display()
            );
        }
        return Ok(0);
    }

    debug!("[{}] Compressing {} font(s)", family, fonts.len());
    converter.convert(output_dir, &fonts)?;
    Ok(fonts.len())
}
