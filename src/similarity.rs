//! Gestalt (Ratcliff/Obershelp) string similarity.

/// Similarity of `a` and `b` in `[0, 1]`, computed as `2M / (|a| + |b|)`, where `M` is the number
/// of characters in matching blocks. Blocks are found by taking the longest common substring and
/// recursing into the unmatched text on either side of it.
pub fn gestalt_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

#[derive(Debug, PartialEq, Eq)]
struct Block {
    a_start: usize,
    b_start: usize,
    len: usize,
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let Block { a_start, b_start, len } = longest_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..a_start], &b[..b_start])
        + matching_chars(&a[a_start + len..], &b[b_start + len..])
}

/// The longest common substring of `a` and `b`. Of equally long candidates, the one ending earliest
/// in `a` (then in `b`) is returned.
fn longest_block(a: &[char], b: &[char]) -> Block {
    let mut best = Block { a_start: 0, b_start: 0, len: 0 };
    let mut prev = vec![0; b.len() + 1];
    let mut curr = vec![0; b.len() + 1];
    for (i, a_char) in a.iter().enumerate() {
        for (j, b_char) in b.iter().enumerate() {
            let len = if a_char == b_char { prev[j] + 1 } else { 0 };
            curr[j + 1] = len;
            if len > best.len {
                best = Block {
                    a_start: i + 1 - len,
                    b_start: j + 1 - len,
                    len,
                };
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    best
}
