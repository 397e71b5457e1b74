//! Section type for knowledge-base segmentation.

use serde::{Deserialize, Serialize};

/// One retrievable unit of knowledge-base text.
///
/// Sections are produced once at build time by splitting the corpus on
/// blank-line boundaries. `index` is the section's position in source
/// order and stays stable across rebuilds of the same corpus. `text` is
/// never empty or whitespace-only; the corpus loader filters such
/// fragments out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Position in the corpus, assigned in source order
    pub index: usize,

    /// Trimmed section content
    pub text: String,
}

impl Section {
    /// Create a new section
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_new() {
        let section = Section::new(2, "Pets are allowed with a fee.");
        assert_eq!(section.index, 2);
        assert_eq!(section.text, "Pets are allowed with a fee.");
    }
}
