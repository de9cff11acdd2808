//! Chronological K-Way Merge
//!
//! Fan-in of the per-followee post batches into one globally ordered
//! timeline. Each input batch is already timestamp-ascending (the store
//! appends in timestamp order), so the merge just repeatedly takes the
//! minimum head across the batches.

use crate::store::types::Post;

/// Merges timestamp-ascending batches into one timestamp-ascending sequence.
///
/// Timestamps are globally unique, so ties cannot occur; if the comparison
/// sees one anyway, the lower batch index wins, keeping the output
/// deterministic.
pub fn merge_chronological(batches: Vec<Vec<Post>>) -> Vec<Post> {
    if batches.len() == 1 {
        return batches.into_iter().next().unwrap_or_default();
    }

    let total: usize = batches.iter().map(Vec::len).sum();
    let mut timeline = Vec::with_capacity(total);
    let mut heads = vec![0usize; batches.len()];

    // Follower counts stay in the thousands, so a linear scan per pick is
    // fine; a heap would only pay off at much larger fan-in.
    loop {
        let mut best: Option<usize> = None;

        for (i, batch) in batches.iter().enumerate() {
            if heads[i] >= batch.len() {
                continue;
            }
            match best {
                Some(b) if batch[heads[i]].timestamp >= batches[b][heads[b]].timestamp => {}
                _ => best = Some(i),
            }
        }

        match best {
            Some(i) => {
                timeline.push(batches[i][heads[i]].clone());
                heads[i] += 1;
            }
            None => break,
        }
    }

    timeline
}
