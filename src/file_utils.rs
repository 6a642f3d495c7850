use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @const: Directory tried as a fallback prefix for stale image references
const CORRECTED_IMAGE_DIR: &str = "v2_final";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating parent directories as needed
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    // @generates: Output path derived from the transcript name
    // @params: input_file, extension
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, extension: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(extension);

        input_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .join(output_filename)
    }

    /// Resolve an image reference from a transcript block against the
    /// transcript's directory. A reference that does not exist as written
    /// is retried under the corrected `v2_final/` prefix before being
    /// declared missing.
    pub fn resolve_image_path<P: AsRef<Path>>(reference: &str, base_dir: P) -> Option<PathBuf> {
        let base_dir = base_dir.as_ref();
        let direct = base_dir.join(reference);
        if Self::file_exists(&direct) {
            return Some(direct);
        }

        let corrected = base_dir.join(CORRECTED_IMAGE_DIR).join(reference);
        if Self::file_exists(&corrected) {
            return Some(corrected);
        }

        None
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{}", extension)
        };

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(&normalized_ext[1..]) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Whether the path looks like an image by extension
    pub fn is_image_file<P: AsRef<Path>>(path: P) -> bool {
        let image_extensions = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];
        path.as_ref()
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                image_extensions.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }

    /// Whether the path looks like a media container ffmpeg can open
    pub fn is_media_file<P: AsRef<Path>>(path: P) -> bool {
        let media_extensions = [
            "mp4", "mkv", "avi", "mov", "webm", "m4v", "mp3", "m4a", "wav", "aac", "flac", "ogg",
        ];
        path.as_ref()
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                media_extensions.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }
}
