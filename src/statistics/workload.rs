use std::ops::Range;

/// Key range drawn from by worker `thread_id`.
///
/// Disjoint workers get consecutive, non-overlapping ranges of `key_space`
/// keys; shared workers all get `0..key_space`. Returns `None` when a disjoint
/// range would not fit in `u64`.
pub fn worker_key_range(thread_id: usize, key_space: u64, shared: bool) -> Option<Range<u64>> {
    if shared {
        return Some(0..key_space);
    }
    let start = u64::try_from(thread_id).ok()?.checked_mul(key_space)?;
    let end = start.checked_add(key_space)?;
    Some(start..end)
}
