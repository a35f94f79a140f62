#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringMatch {
    pub index: usize,
    /// Matched char range in the candidate, `None` for the empty query.
    pub range: Option<(usize, usize)>,
}

/// Case-insensitive substring filter.
///
/// Keeps candidate order and stops after `limit` matches. An empty query
/// matches every candidate.
pub fn filter(candidates: &[String], query: &str, limit: usize) -> Vec<SubstringMatch> {
    if limit == 0 {
        return Vec::new();
    }

    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    let mut matches = Vec::with_capacity(limit.min(candidates.len()));

    for (index, candidate) in candidates.iter().enumerate() {
        let range = if needle.is_empty() {
            None
        } else if let Some(range) = find_folded(candidate, &needle) {
            Some(range)
        } else {
            continue;
        };

        matches.push(SubstringMatch { index, range });
        if matches.len() == limit {
            break;
        }
    }

    matches
}

fn find_folded(candidate: &str, needle: &[char]) -> Option<(usize, usize)> {
    let mut folded = Vec::with_capacity(candidate.len());
    let mut owners = Vec::with_capacity(candidate.len());
    for (char_idx, ch) in candidate.chars().enumerate() {
        for lower in ch.to_lowercase() {
            folded.push(lower);
            owners.push(char_idx);
        }
    }

    if needle.len() > folded.len() {
        return None;
    }

    let start = folded
        .windows(needle.len())
        .position(|window| window == needle)?;
    let end = start + needle.len() - 1;
    Some((owners[start], owners[end] + 1))
}
