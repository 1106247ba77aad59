//! Two-level tier alignment.

/// Null tiers whose token count disagrees with the authoritative count.
///
/// The authoritative count `n` is the length of the first non-empty tier
/// in preference order. Every tier of a different length is replaced by
/// `n` empty strings; positional reuse across a mismatch is never
/// attempted.
///
/// Returns whether any non-empty tier was nulled. Empty tiers are padded
/// to `n` placeholders too, but absence is not a misalignment.
pub fn fix_misalignments(tiers: &mut [Vec<String>]) -> bool {
    let n = match tiers.iter().find(|t| !t.is_empty()) {
        Some(t) => t.len(),
        None => return false,
    };

    let mut nulled = false;
    for tier in tiers.iter_mut() {
        if tier.len() != n {
            nulled |= !tier.is_empty();
            *tier = vec![String::new(); n];
        }
    }

    nulled
}
