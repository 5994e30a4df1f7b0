//! Grapheme-aware Levenshtein distance.
//!
//! Unlike a code-point or byte based edit distance, this treats each
//! Unicode extended grapheme cluster as one comparison unit, so a
//! base character plus its combining marks (e.g. `y` + combining
//! breve, rendered `y̆`) costs one substitution against a plain `y`,
//! not two.

use unicode_segmentation::UnicodeSegmentation;

/// Levenshtein distance between `a` and `b`, counted in grapheme
/// clusters. Insertion, deletion and substitution each cost 1.
pub fn distance(a: &str, b: &str) -> usize {
    let ga: Vec<&str> = a.graphemes(true).collect();
    let gb: Vec<&str> = b.graphemes(true).collect();
    levenshtein(&ga, &gb)
}

fn levenshtein(a: &[&str], b: &[&str]) -> usize {
    let (n, m) = (a.len(), b.len());
    if n == 0 {
        return m;
    }
    if m == 0 {
        return n;
    }

    let mut prev: Vec<usize> = (0..=m).collect();
    let mut curr = vec![0usize; m + 1];

    for i in 1..=n {
        curr[0] = i;
        for j in 1..=m {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m]
}

/// Bounded variant: returns the distance if it is `<= k`, or `None`
/// ("exceeds k") as soon as no alignment within budget `k` remains
/// possible.
///
/// Implemented as a diagonal-band dynamic program: only cells with
/// `|i - j| <= k` are ever computed, so the cost is
/// `O(k * min(|a|, |b|))` rather than `O(|a| * |b|)`.
pub fn distance_within(a: &str, b: &str, k: usize) -> Option<usize> {
    let ga: Vec<&str> = a.graphemes(true).collect();
    let gb: Vec<&str> = b.graphemes(true).collect();
    banded_levenshtein(&ga, &gb, k)
}

fn banded_levenshtein(a: &[&str], b: &[&str], k: usize) -> Option<usize> {
    let (n, m) = (a.len(), b.len());
    if n.abs_diff(m) > k {
        return None;
    }

    // Any cell outside the band is unreachable; `sentinel` stands in
    // for +infinity and is always strictly greater than any real
    // alignment cost we'd accept (<= k).
    let sentinel = k + 1;

    let mut prev = vec![sentinel; m + 1];
    for j in 0..=m.min(k) {
        prev[j] = j;
    }

    for i in 1..=n {
        let mut curr = vec![sentinel; m + 1];
        let lo = i.saturating_sub(k);
        let hi = (i + k).min(m);

        if lo == 0 {
            curr[0] = i;
        }

        for j in lo.max(1)..=hi {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let deletion = prev[j].saturating_add(1);
            let insertion = curr[j - 1].saturating_add(1);
            let substitution = prev[j - 1].saturating_add(cost);
            curr[j] = deletion.min(insertion).min(substitution);
        }

        if curr[lo..=hi].iter().all(|&v| v > k) {
            return None;
        }

        prev = curr;
    }

    (prev[m] <= k).then_some(prev[m])
}
