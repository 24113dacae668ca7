//! Token-based text similarity
//!
//! Both texts are lowercased, split into alphanumeric tokens, and the tokens
//! sorted before comparison, so word order and punctuation do not count. The
//! ratio is the normalized insertion/deletion distance of the two token
//! strings, scaled to 0..=100.

/// Ratio at which the template merge accepts a match
pub const MERGE_THRESHOLD: u8 = 50;

/// Ratio at which two texts are considered equal by [`fuzzy_eq`]
pub const EQUALITY_THRESHOLD: u8 = 80;

/// Similarity of two texts, 0 (unrelated) to 100 (same tokens)
pub fn ratio(a: &str, b: &str) -> u8 {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() && b.is_empty() {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    let distance = indel_distance(&a, &b);
    let score = ((total - distance) * 200 + total) / (2 * total);
    score.min(100) as u8
}

/// True when `ratio(a, b) >= threshold`
pub fn is_match(a: &str, b: &str, threshold: u8) -> bool {
    ratio(a, b) >= threshold
}

/// Fuzzy equality at the default [`EQUALITY_THRESHOLD`]
pub fn fuzzy_eq(a: &str, b: &str) -> bool {
    is_match(a, b, EQUALITY_THRESHOLD)
}

/// Lowercased alphanumeric tokens, sorted and space-joined
fn normalize(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Edit distance counting insertions and deletions only (substitution = 2)
fn indel_distance(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut row = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j]
            } else {
                (prev[j + 1] + 1).min(row[j] + 1)
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_and_empty() {
        assert_eq!(ratio("Hello world", "Hello world"), 100);
        assert_eq!(ratio("", ""), 100);
        assert_eq!(ratio("Hello", ""), 0);
        assert_eq!(ratio("...", "hello"), 0);
    }

    #[test]
    fn test_token_order_and_case_ignored() {
        assert_eq!(ratio("World, hello!", "hello world"), 100);
    }

    #[test]
    fn test_typo_is_close() {
        // 4 + 5 chars, one insertion
        assert_eq!(ratio("Helo", "Hello"), 89);
        assert!(is_match("Helo", "Hello", MERGE_THRESHOLD));
        assert!(fuzzy_eq("Helo", "Hello"));
    }

    #[test]
    fn test_unrelated_texts() {
        assert!(ratio("Open file", "Quit") < MERGE_THRESHOLD);
        assert!(!fuzzy_eq("Save file", "Quit program"));
        assert!(fuzzy_eq("Save as", "Save all"));
    }

    #[test]
    fn test_indel_distance() {
        let a: Vec<char> = "kitten".chars().collect();
        let b: Vec<char> = "sitting".chars().collect();
        // k->s and e->i are substitutions (2 each) plus one insertion
        assert_eq!(indel_distance(&a, &b), 5);
    }
}
