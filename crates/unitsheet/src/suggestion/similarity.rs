//! Fuzzy string similarity for auto-complete ranking.

/// Similarity of `query` to `candidate` on a 0..=100 scale.
///
/// The score is the better of a whole-string Levenshtein ratio and a
/// partial ratio that aligns the shorter string against windows of the
/// longer one (scaled by 0.9 so exact matches still rank first). Matching
/// is case-insensitive. An empty query scores 0.
pub fn similarity(query: &str, candidate: &str) -> u32 {
    let query: Vec<char> = query.trim().to_lowercase().chars().collect();
    let candidate: Vec<char> = candidate.to_lowercase().chars().collect();

    if query.is_empty() || candidate.is_empty() {
        return 0;
    }

    let full = ratio(&query, &candidate);

    let (short, long) = if query.len() <= candidate.len() {
        (&query, &candidate)
    } else {
        (&candidate, &query)
    };
    let partial = if short.len() == long.len() {
        full
    } else {
        let best = long
            .windows(short.len())
            .map(|window| ratio(short, window))
            .fold(0.0, f64::max);
        best * 0.9
    };

    full.max(partial).round() as u32
}

/// `100 * (1 - distance / max_len)`.
fn ratio(a: &[char], b: &[char]) -> f64 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 100.0;
    }
    100.0 * (1.0 - levenshtein(a, b) as f64 / max_len as f64)
}

/// Levenshtein edit distance.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
