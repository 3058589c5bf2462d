// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::NodeId;

/// A node reachable by typing its two-letter label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HintTarget {
    pub(crate) label: [char; 2],
    pub(crate) node_id: NodeId,
}

/// Assigns two-letter labels from `alphabet` to `node_ids`, in order.
///
/// Returns `None` when there are more nodes than distinct two-letter labels. Duplicate alphabet
/// characters are ignored.
pub(crate) fn two_letter_targets(node_ids: &[NodeId], alphabet: &str) -> Option<Vec<HintTarget>> {
    let mut chars = Vec::<char>::new();
    for ch in alphabet.chars().map(|ch| ch.to_ascii_uppercase()) {
        if !chars.contains(&ch) {
            chars.push(ch);
        }
    }

    let k = chars.len();
    if node_ids.len() > k.saturating_mul(k) {
        return None;
    }

    let targets = node_ids
        .iter()
        .enumerate()
        .map(|(idx, node_id)| HintTarget {
            label: [chars[idx / k], chars[idx % k]],
            node_id: node_id.clone(),
        })
        .collect();
    Some(targets)
}

#[cfg(test)]
mod tests {
    use super::two_letter_targets;
    use crate::model::fixtures::nid;

    #[test]
    fn labels_count_up_in_alphabet_order() {
        let ids = ["a", "b", "c", "d"].map(nid);
        let targets = two_letter_targets(&ids, "xyz").expect("targets");
        let labels = targets.iter().map(|target| target.label).collect::<Vec<_>>();
        assert_eq!(labels, vec![['X', 'X'], ['X', 'Y'], ['X', 'Z'], ['Y', 'X']]);
        assert_eq!(targets[3].node_id, nid("d"));
    }

    #[test]
    fn duplicate_alphabet_chars_are_ignored() {
        let ids = ["a", "b"].map(nid);
        let targets = two_letter_targets(&ids, "aAb").expect("targets");
        assert_eq!(targets[1].label, ['A', 'B']);
    }

    #[test]
    fn too_many_nodes_for_the_alphabet() {
        let ids = ["a", "b", "c", "d", "e"].map(nid);
        assert!(two_letter_targets(&ids, "ab").is_none());
        assert!(two_letter_targets(&ids[..1], "").is_none());
        assert_eq!(two_letter_targets(&[], "").map(|targets| targets.len()), Some(0));
    }
}
