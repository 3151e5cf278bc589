//! Sequence gap detection.

use crate::wire::Packet;

/// Return every sequence number absent from the contiguous range implied
/// by the observed minimum and maximum, in ascending order.
///
/// An empty input yields an empty result. Duplicate sequences are not
/// specially resolved. O(n log n), dominated by the sort.
pub fn find_missing(packets: &[Packet]) -> Vec<i32> {
    let mut seqs: Vec<i32> = packets.iter().map(|p| p.sequence).collect();
    seqs.sort_unstable();

    let mut missing = Vec::new();
    let Some(&first) = seqs.first() else {
        return missing;
    };
    let mut expected = first;
    for seq in seqs {
        while expected < seq {
            missing.push(expected);
            expected += 1;
        }
        expected += 1;
    }
    missing
}
