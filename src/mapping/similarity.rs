//! Header similarity scoring.
//!
//! # Algorithm
//!
//! 1. Normalize both strings: lowercase, drop every non-alphanumeric character.
//! 2. Identical → 1.0.
//! 3. One contains the other → 0.8 (below exact, so direct matches win ties).
//! 4. Otherwise `1 - levenshtein / max(len_a, len_b)`.

/// Score awarded when one normalized string contains the other.
pub const CONTAINMENT_SCORE: f64 = 0.8;

/// Lowercases and strips everything but letters and digits.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Similarity of two header strings in `[0, 1]`.
///
/// # Examples
///
/// ```
/// use u_intake::mapping::similarity;
///
/// assert_eq!(similarity("Client_ID", "clientid"), 1.0);
/// assert_eq!(similarity("priority", "PriorityLevel"), 0.8);
/// assert!(similarity("skils", "skills") > 0.8);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    similarity_normalized(&a, &b)
}

/// Similarity of two already-normalized strings.
pub(crate) fn similarity_normalized(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    // An empty string is contained in everything; skip containment for it.
    if !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a)) {
        return CONTAINMENT_SCORE;
    }
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    let distance = strsim::levenshtein(a, b);
    1.0 - distance as f64 / longest as f64
}
