//! Slide discovery.
//!
//! A carousel's slides are the image files sitting directly in one
//! directory. Ordering follows the `NNN-name` convention:
//!
//! ```text
//! slides/
//! ├── config.toml        # Carousel config (optional)
//! ├── 010-harbour.jpg    # Numbered: sorted by number
//! ├── 020-old-town.webp
//! ├── 030.avif           # Number only: alt text falls back to the stem
//! └── staff-photo.png    # Unnumbered: after all numbered slides, by filename
//! ```
//!
//! Dashes in the name part become spaces in the alt text
//! (`020-old-town.webp` → "old town"). Hidden files and non-images are
//! skipped. Two files with the same number are an error, as is a directory
//! without any images.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SlideError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Duplicate slide number {0} in {1}")]
    DuplicateNumber(u32, PathBuf),
    #[error("No slide images found in {0}")]
    NoSlides(PathBuf),
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "avif", "gif", "tif", "tiff"];

/// One image shown by the carousel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    /// Number prefix if present (`20` from `020-old-town.webp`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    /// File name inside the slide directory.
    pub filename: String,
    /// Path used as the `src` attribute (relative to the slide directory).
    pub src: String,
    /// Alt text derived from the file name.
    pub alt: String,
}

/// Split a file stem into its optional number prefix and display title.
///
/// - `"020-old-town"` → `(Some(20), "old town")`
/// - `"030"` / `"030-"` → `(Some(30), "")`
/// - `"staff-photo"` → `(None, "staff photo")`
pub fn parse_slide_name(stem: &str) -> (Option<u32>, String) {
    let (prefix, rest) = match stem.split_once('-') {
        Some((prefix, rest)) => (prefix, Some(rest)),
        None => (stem, None),
    };
    match prefix.parse::<u32>() {
        Ok(number) => (Some(number), rest.unwrap_or("").replace('-', " ")),
        Err(_) => (None, stem.replace('-', " ")),
    }
}

/// List the slides in `dir`, in display order.
pub fn scan_slides(dir: &Path) -> Result<Vec<Slide>, SlideError> {
    let mut numbered: BTreeMap<u32, Slide> = BTreeMap::new();
    let mut unnumbered: Vec<Slide> = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_image(entry.path()) {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().to_string();
        if filename.starts_with('.') {
            continue;
        }
        let stem = entry
            .path()
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let (number, title) = parse_slide_name(&stem);
        let slide = Slide {
            number,
            src: filename.clone(),
            alt: if title.is_empty() { stem } else { title },
            filename,
        };
        match number {
            Some(n) => {
                if numbered.contains_key(&n) {
                    return Err(SlideError::DuplicateNumber(n, dir.to_path_buf()));
                }
                numbered.insert(n, slide);
            }
            None => unnumbered.push(slide),
        }
    }

    unnumbered.sort_by(|a, b| a.filename.cmp(&b.filename));
    let slides: Vec<Slide> = numbered.into_values().chain(unnumbered).collect();
    if slides.is_empty() {
        return Err(SlideError::NoSlides(dir.to_path_buf()));
    }
    Ok(slides)
}

fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{slide_alts, slide_dir};

    #[test]
    fn parse_numbered_with_title() {
        assert_eq!(parse_slide_name("020-old-town"), (Some(20), "old town".to_string()));
    }

    #[test]
    fn parse_number_only() {
        assert_eq!(parse_slide_name("030"), (Some(30), String::new()));
        assert_eq!(parse_slide_name("030-"), (Some(30), String::new()));
    }

    #[test]
    fn parse_unnumbered() {
        assert_eq!(parse_slide_name("staff-photo"), (None, "staff photo".to_string()));
        assert_eq!(parse_slide_name("Harbour"), (None, "Harbour".to_string()));
    }

    #[test]
    fn numbered_slides_sorted_by_number() {
        let tmp = slide_dir(&["020-b.jpg", "100-c.png", "003-a.webp"]);
        let slides = scan_slides(tmp.path()).unwrap();
        let names: Vec<&str> = slides.iter().map(|s| s.filename.as_str()).collect();
        assert_eq!(names, vec!["003-a.webp", "020-b.jpg", "100-c.png"]);
    }

    #[test]
    fn unnumbered_slides_come_last() {
        let tmp = slide_dir(&["zebra.jpg", "010-first.jpg", "apple.jpg"]);
        let slides = scan_slides(tmp.path()).unwrap();
        let names: Vec<&str> = slides.iter().map(|s| s.filename.as_str()).collect();
        assert_eq!(names, vec!["010-first.jpg", "apple.jpg", "zebra.jpg"]);
    }

    #[test]
    fn alt_text_from_title_or_stem() {
        let tmp = slide_dir(&["010-old-town.jpg", "020.jpg"]);
        let slides = scan_slides(tmp.path()).unwrap();
        assert_eq!(slides[0].alt, "old town");
        assert_eq!(slides[1].alt, "020");
        assert_eq!(slides[1].number, Some(20));
    }

    #[test]
    fn alt_texts_in_display_order() {
        let tmp = slide_dir(&["020-old-town.webp", "010-harbour.jpg"]);
        let slides = scan_slides(tmp.path()).unwrap();
        assert_eq!(slide_alts(&slides), vec!["harbour", "old town"]);
    }

    #[test]
    fn non_images_and_hidden_files_skipped() {
        let tmp = slide_dir(&["010-a.jpg", "notes.txt", ".hidden.jpg", "config.toml"]);
        let slides = scan_slides(tmp.path()).unwrap();
        assert_eq!(slides.len(), 1);
    }

    #[test]
    fn uppercase_extension_is_an_image() {
        let tmp = slide_dir(&["010-a.JPG"]);
        assert_eq!(scan_slides(tmp.path()).unwrap().len(), 1);
    }

    #[test]
    fn subdirectories_are_not_scanned() {
        let tmp = slide_dir(&["010-a.jpg", "nested/020-b.jpg"]);
        assert_eq!(scan_slides(tmp.path()).unwrap().len(), 1);
    }

    #[test]
    fn duplicate_number_is_error() {
        let tmp = slide_dir(&["010-a.jpg", "010-b.jpg"]);
        let result = scan_slides(tmp.path());
        assert!(matches!(result, Err(SlideError::DuplicateNumber(10, _))));
    }

    #[test]
    fn empty_directory_is_error() {
        let tmp = slide_dir(&["readme.md"]);
        assert!(matches!(scan_slides(tmp.path()), Err(SlideError::NoSlides(_))));
    }

    #[test]
    fn missing_directory_is_walk_error() {
        let tmp = slide_dir(&[]);
        let result = scan_slides(&tmp.path().join("absent"));
        assert!(matches!(result, Err(SlideError::Walk(_))));
    }
}
