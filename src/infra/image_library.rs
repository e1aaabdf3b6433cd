use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::types::ImageUpload;

const EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Optional directory of images uploaded alongside multipart creates.
///
/// `Barred Owl` is looked up as `barred_owl.jpg`, then `.jpeg`, `.png`, `.webp`, `.gif`.
#[derive(Debug, Clone, Default)]
pub struct ImageLibrary {
    dir: Option<PathBuf>,
}

impl ImageLibrary {
    pub fn new(dir: Option<PathBuf>) -> Self {
        if let Some(d) = &dir {
            if !d.is_dir() {
                warn!("Image directory {} does not exist, uploads disabled", d.display());
                return Self { dir: None };
            }
        }
        Self { dir }
    }

    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    pub fn lookup(&self, name: &str) -> Option<ImageUpload> {
        let dir = self.dir.as_deref()?;
        let slug = slugify(name);
        if slug.is_empty() {
            return None;
        }
        EXTENSIONS.iter().find_map(|ext| {
            let path = dir.join(format!("{slug}.{ext}"));
            if !path.is_file() {
                return None;
            }
            read_upload(&path)
        })
    }
}

fn read_upload(path: &Path) -> Option<ImageUpload> {
    match fs::read(path) {
        Ok(bytes) => {
            debug!("Attaching image {}", path.display());
            Some(ImageUpload {
                file_name: path.file_name()?.to_string_lossy().into_owned(),
                mime: mime_for(path),
                bytes,
            })
        }
        Err(e) => {
            warn!("Could not read image {}: {}", path.display(), e);
            None
        }
    }
}

/// Lowercase, runs of non-alphanumerics collapsed to `_`, trimmed.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

pub fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
