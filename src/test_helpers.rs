//! Shared test utilities for the simple-carousel test suite.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = slide_dir(&["010-harbour.jpg", "020-old-town.webp"]);
//! let slides = scan_slides(tmp.path()).unwrap();
//! assert_eq!(slide_alts(&slides), vec!["harbour", "old town"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::slides::Slide;

/// Create a temp directory holding empty files with the given relative names.
///
/// Names may contain `/` to create files in subdirectories.
pub fn slide_dir(names: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for name in names {
        let path = tmp.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, b"").unwrap();
    }
    tmp
}

/// Write `config.toml` into a directory.
pub fn write_config(dir: &Path, toml: &str) {
    std::fs::write(dir.join("config.toml"), toml).unwrap();
}

/// All alt texts in slide order.
pub fn slide_alts(slides: &[Slide]) -> Vec<&str> {
    slides.iter().map(|s| s.alt.as_str()).collect()
}

/// A slide list without touching the filesystem.
pub fn slides(names: &[&str]) -> Vec<Slide> {
    names
        .iter()
        .map(|name| {
            let stem = Path::new(name)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let (number, title) = crate::slides::parse_slide_name(&stem);
            Slide {
                number,
                filename: name.to_string(),
                src: name.to_string(),
                alt: if title.is_empty() { stem } else { title },
            }
        })
        .collect()
}
