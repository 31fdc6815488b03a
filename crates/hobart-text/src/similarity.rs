//! Bag-of-words similarity measures between token lists.

use std::collections::{HashMap, HashSet};

/// Jaccard similarity between two token lists, treated as sets.
///
/// Returns the size of the intersection over the size of the union.
/// Two empty lists have similarity `0.0`.
///
/// # Example
///
/// ```
/// use hobart_text::jaccard_similarity;
///
/// let a: Vec<String> = ["risk", "factor"].iter().map(|s| s.to_string()).collect();
/// let b: Vec<String> = ["risk", "free"].iter().map(|s| s.to_string()).collect();
/// assert!((jaccard_similarity(&a, &b) - 1.0 / 3.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn jaccard_similarity(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}

/// Cosine similarity between two token lists, treated as count vectors.
///
/// Token counts form a vector over the union vocabulary; the result is
/// the cosine of the angle between the two vectors. If either list is
/// empty the similarity is `0.0`.
#[must_use]
pub fn cosine_similarity(a: &[String], b: &[String]) -> f64 {
    let counts_a = count_tokens(a);
    let counts_b = count_tokens(b);

    let dot: f64 = counts_a
        .iter()
        .filter_map(|(token, &n)| counts_b.get(token).map(|&m| f64::from(n) * f64::from(m)))
        .sum();
    let norm_a = vector_norm(&counts_a);
    let norm_b = vector_norm(&counts_b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn count_tokens(tokens: &[String]) -> HashMap<&str, u32> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    counts
}

fn vector_norm(counts: &HashMap<&str, u32>) -> f64 {
    counts
        .values()
        .map(|&n| f64::from(n) * f64::from(n))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_identical_lists() {
        let a = words(&["net", "income", "growth"]);
        assert_relative_eq!(jaccard_similarity(&a, &a), 1.0);
        assert_relative_eq!(cosine_similarity(&a, &a), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_disjoint_lists() {
        let a = words(&["alpha", "beta"]);
        let b = words(&["gamma", "delta"]);
        assert_relative_eq!(jaccard_similarity(&a, &b), 0.0);
        assert_relative_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_empty_lists() {
        let a = words(&[]);
        let b = words(&["alpha"]);
        assert_relative_eq!(jaccard_similarity(&a, &a), 0.0);
        assert_relative_eq!(jaccard_similarity(&a, &b), 0.0);
        assert_relative_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        let a = words(&["a", "b", "c"]);
        let b = words(&["b", "c", "d"]);
        assert_relative_eq!(jaccard_similarity(&a, &b), 0.5);
        assert_relative_eq!(cosine_similarity(&a, &b), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cosine_uses_counts() {
        let a = words(&["x", "x", "y"]);
        let b = words(&["x", "y"]);
        assert_relative_eq!(cosine_similarity(&a, &b), 3.0 / 10.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_jaccard_ignores_counts() {
        let a = words(&["x", "x", "y"]);
        let b = words(&["x", "y"]);
        assert_relative_eq!(jaccard_similarity(&a, &b), 1.0);
    }
}
