//! Capacity-bounded batching of uploaded media items
//!
//! The remote attach call accepts a fixed maximum number of items per
//! request; this module partitions the uploaded sequence accordingly.

/// Maximum items the remote accepts per batch-attach call
pub const MAX_BATCH_ATTACH_ITEMS: usize = 50;

/// Partition items into batches of at most `capacity`, preserving order.
///
/// Every batch except possibly the last has exactly `capacity` items; the
/// last has between 1 and `capacity`. No items yields no batches.
pub fn partition<T>(items: Vec<T>, capacity: usize) -> Vec<Vec<T>> {
    debug_assert!(capacity > 0);
    let mut batches = Vec::with_capacity(items.len().div_ceil(capacity));
    let mut batch = Vec::with_capacity(capacity.min(items.len()));
    for item in items {
        if batch.len() == capacity {
            batches.push(std::mem::replace(&mut batch, Vec::with_capacity(capacity)));
        }
        batch.push(item);
    }
    if !batch.is_empty() {
        batches.push(batch);
    }
    batches
}
