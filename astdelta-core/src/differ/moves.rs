//! Move reconciliation.
//!
//! A removal and an addition with the same `(node_kind, description)` key are
//! taken to be the same content relocated, and both are dropped. The key is a
//! deliberate approximation: two different calls to the same function look
//! identical to it, while the same call with different argument literals does
//! not match.

use std::collections::{HashMap, VecDeque};

use crate::differ::changes::Difference;

/// Cancel matched removal/addition pairs within one comparison frame.
///
/// Each removal, in order, consumes the first unconsumed addition with an
/// identical key. The result lists the surviving removals first and then the
/// surviving additions, each group in its original relative order.
pub fn reconcile(differences: Vec<Difference>) -> Vec<Difference> {
    let (removals, additions): (Vec<Difference>, Vec<Difference>) =
        differences.into_iter().partition(Difference::is_removal);

    let mut keep_removal = vec![true; removals.len()];
    let mut keep_addition = vec![true; additions.len()];

    if !removals.is_empty() && !additions.is_empty() {
        let mut available: HashMap<(&str, Option<&str>), VecDeque<usize>> = HashMap::new();
        for (i, addition) in additions.iter().enumerate() {
            available.entry(addition.move_key()).or_default().push_back(i);
        }

        for (i, removal) in removals.iter().enumerate() {
            if let Some(j) = available
                .get_mut(&removal.move_key())
                .and_then(VecDeque::pop_front)
            {
                keep_removal[i] = false;
                keep_addition[j] = false;
            }
        }
    }

    removals
        .into_iter()
        .zip(keep_removal)
        .chain(additions.into_iter().zip(keep_addition))
        .filter_map(|(d, keep)| keep.then_some(d))
        .collect()
}
