//! Wordlist file loading.

use std::fs;
use std::path::Path;

use crate::{BenchError, Result};

/// Minimum number of distinct words a usable wordlist must provide.
pub const MIN_WORDS: usize = 50;

/// Load a plain-text wordlist: one candidate word per line, `#` starts a
/// comment, whitespace is trimmed, words are uppercased, multi-token lines
/// are dropped and duplicates removed preserving first occurrence.
pub fn load_wordlist<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let text = fs::read_to_string(path.as_ref())?;

    let mut words: Vec<String> = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for line in text.lines() {
        let w = line.trim();
        if w.is_empty() || w.starts_with('#') {
            continue;
        }
        let w = w.to_uppercase();
        if w.contains(' ') || w.contains('\t') {
            continue;
        }
        if seen.insert(w.clone()) {
            words.push(w);
        }
    }

    if words.len() < MIN_WORDS {
        return Err(BenchError::Wordlist(format!(
            "wordlist too small after filtering: {} words (need at least {})",
            words.len(),
            MIN_WORDS
        )));
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_list(lines: &[&str]) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(f, "{}", line).unwrap();
        }
        f
    }

    #[test]
    fn test_load_filters_and_uppercases() {
        let mut lines: Vec<String> = (0..60).map(|i| format!("word{}", i)).collect();
        lines.insert(0, "# comment line".to_string());
        lines.insert(1, "  spaced out  ".to_string()); // dropped: two tokens
        lines.insert(2, "".to_string());
        lines.insert(3, " word0 ".to_string()); // duplicate after trim+uppercase
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        let f = write_list(&refs);

        let words = load_wordlist(f.path()).unwrap();
        assert_eq!(words.len(), 60);
        assert_eq!(words[0], "WORD0");
        assert!(words.iter().all(|w| w.chars().all(|c| !c.is_lowercase())));
    }

    #[test]
    fn test_too_small_list_fails() {
        let f = write_list(&["alpha", "beta", "gamma"]);
        assert_matches!(load_wordlist(f.path()), Err(BenchError::Wordlist(_)));
    }
}
