//! Output file emission for finished documents.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Timestamp layout used in output filenames (second resolution).
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Derive the output filename: lower-cased, spaces replaced, so the result
/// is shell-friendly. Idempotent under re-application.
pub fn document_filename(course: &str, method: &str, timestamp: &str) -> String {
    format!("{course}_{method}_{timestamp}.tex")
        .to_lowercase()
        .replace(' ', "_")
}

/// Write the finished document under `out_dir`, creating the directory if
/// absent. A timestamp collision overwrites, by design of the naming scheme.
pub fn write_document(
    out_dir: &Path,
    course: &str,
    method: &str,
    document: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir {}", out_dir.display()))?;
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let path = out_dir.join(document_filename(course, method, &timestamp));
    fs::write(&path, document).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = document.len(), "wrote document");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_lowercased_and_space_free() {
        let name = document_filename("Matemática Computacional", "Método X", "20260830_120000");
        assert_eq!(
            name,
            "matemática_computacional_método_x_20260830_120000.tex"
        );
    }

    #[test]
    fn filename_derivation_is_idempotent() {
        let once = document_filename("Matemática Computacional", "Método X", "20260830_120000");
        let twice = once.to_lowercase().replace(' ', "_");
        assert_eq!(once, twice);
    }

    #[test]
    fn write_creates_the_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("handouts");
        let path =
            write_document(&out_dir, "Optimización", "Descenso de Gradiente", "contenido")
                .unwrap();
        assert!(path.starts_with(&out_dir));
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "contenido");
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("optimización_descenso_de_gradiente_"));
        assert!(name.ends_with(".tex"));
    }

    #[test]
    fn write_is_idempotent_for_an_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_document(dir.path(), "a", "b", "uno").unwrap();
        write_document(dir.path(), "a", "b", "dos").unwrap();
    }
}
