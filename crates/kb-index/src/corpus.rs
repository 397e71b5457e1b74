//! Corpus loading and blank-line segmentation.

use std::fs;
use std::path::Path;

use tracing::info;

use kb_types::Section;

use crate::error::KbError;

/// Split raw corpus text into sections on blank-line boundaries.
///
/// Fragments that are empty after trimming (runs of three or more
/// newlines, leading/trailing separators) are dropped, so a section is
/// never whitespace-only. Indices follow source order and are stable
/// across rebuilds of the same text.
pub fn split_sections(text: &str) -> Vec<Section> {
    let normalized = text.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .enumerate()
        .map(|(index, fragment)| Section::new(index, fragment))
        .collect()
}

/// Read a knowledge-base file and split it into sections.
///
/// Reads the whole file once and retains no handle. An unreadable file is
/// [`KbError::CorpusUnavailable`]; invalid UTF-8 is
/// [`KbError::InvalidEncoding`].
pub fn load_corpus(path: &Path) -> Result<Vec<Section>, KbError> {
    let bytes = fs::read(path).map_err(|source| KbError::CorpusUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| KbError::InvalidEncoding {
        path: path.to_path_buf(),
    })?;

    let sections = split_sections(&text);
    info!(
        path = %path.display(),
        sections = sections.len(),
        "Knowledge base loaded"
    );
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_basic() {
        let sections =
            split_sections("Checkout is open 24/7.\n\nRooms include free WiFi.\n\nPets are allowed with a fee.");
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].text, "Checkout is open 24/7.");
        assert_eq!(sections[2].text, "Pets are allowed with a fee.");
        assert_eq!(sections[2].index, 2);
    }

    #[test]
    fn test_split_filters_extra_blank_lines() {
        // Three or more consecutive newlines must not yield empty sections
        let sections = split_sections("First.\n\n\n\nSecond.\n\n\nThird.\n\n\n");
        let texts: Vec<&str> = sections.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["First.", "Second.", "Third."]);
        let indices: Vec<usize> = sections.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_split_handles_crlf() {
        let sections = split_sections("First.\r\n\r\nSecond.");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].text, "Second.");
    }

    #[test]
    fn test_split_trims_fragments() {
        let sections = split_sections("  padded  \n\n\ttabbed\t");
        assert_eq!(sections[0].text, "padded");
        assert_eq!(sections[1].text, "tabbed");
    }

    #[test]
    fn test_split_whitespace_only_input() {
        assert!(split_sections("\n\n\n\n").is_empty());
        assert!(split_sections("   ").is_empty());
        assert!(split_sections("").is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = load_corpus(&temp.path().join("nope.md")).unwrap_err();
        assert!(matches!(err, KbError::CorpusUnavailable { .. }));
    }

    #[test]
    fn test_load_invalid_utf8() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.md");
        std::fs::write(&path, [0xff, 0xfe, 0xfd]).unwrap();
        let err = load_corpus(&path).unwrap_err();
        assert!(matches!(err, KbError::InvalidEncoding { .. }));
    }

    #[test]
    fn test_load_reads_sections_in_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kb.md");
        std::fs::write(&path, "Alpha.\n\nBeta.\n\nGamma.").unwrap();
        let sections = load_corpus(&path).unwrap();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[1].index, 1);
        assert_eq!(sections[1].text, "Beta.");
    }
}
