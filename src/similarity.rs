//! String similarity scoring
//!
//! Provides the partial-ratio scorer used to disambiguate filter key names
//! and department names. Scores are in `0.0..=100.0`.
//!
//! Both inputs are normalized first: lowercased, every non-alphanumeric
//! character replaced by a space, and trimmed.

/// Normalizes a string for scoring.
pub fn normalize(s: &str) -> String {
    let mapped: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect();
    mapped.trim().to_string()
}

/// Indel similarity of two character sequences: `200 * lcs / (|a| + |b|)`.
fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// Length of the longest common subsequence.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Best similarity of the shorter string against any alignment within the
/// longer one.
///
/// Every full-length window of the longer string is scored, plus the
/// partially overlapping windows at both ends. Empty input scores 0.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = normalize(a).chars().collect();
    let b: Vec<char> = normalize(b).chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let n = short.len();
    let mut best: f64 = 0.0;

    for start in 0..=(long.len() - n) {
        best = best.max(ratio_chars(short, &long[start..start + n]));
        if best >= 100.0 {
            return 100.0;
        }
    }

    for k in 1..n {
        best = best.max(ratio_chars(short, &long[..k]));
        best = best.max(ratio_chars(short, &long[long.len() - k..]));
    }

    best
}
