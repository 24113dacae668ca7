//! Open-addressing hash index embedded in MO files
//!
//! Slots hold 1-based positions into the sorted string tables, 0 marks an
//! empty slot. Collisions are resolved by stepping `1 + hash % (size - 2)`
//! with a subtraction-based wraparound; readers replay the exact same slot
//! sequence, so the arithmetic here must not change.

/// Smallest table size ever written
pub const MIN_SIZE: u32 = 3;

/// Default table size for `count` entries: `max(3, next_prime(count * 4 / 3))`
pub fn auto_size(count: u32) -> u32 {
    let wanted = (u64::from(count) * 4 / 3).min(u64::from(u32::MAX)) as u32;
    next_prime(wanted).max(MIN_SIZE)
}

/// Smallest odd prime not below `seed`
pub fn next_prime(seed: u32) -> u32 {
    let mut candidate = seed | 1;
    while !is_prime(candidate) {
        candidate += 2;
    }
    candidate
}

fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let n = u64::from(n);
    let mut div = 3u64;
    while div * div <= n {
        if n % div == 0 {
            return false;
        }
        div += 2;
    }
    true
}

/// Step used after the first collision
fn increment(hash: u32, size: u32) -> u32 {
    1 + hash % (size - 2)
}

/// Next slot in the lookup sequence
fn advance(idx: u32, incr: u32, size: u32) -> u32 {
    if idx >= size - incr {
        idx - (size - incr)
    } else {
        idx + incr
    }
}

/// Iterator over the slot indices visited for `hash`, at most `size` of them
pub fn slot_sequence(hash: u32, size: u32) -> impl Iterator<Item = u32> {
    let incr = increment(hash, size);
    let mut idx = hash % size;
    let mut remaining = size;
    std::iter::from_fn(move || {
        if remaining == 0 {
            return None;
        }
        remaining -= 1;
        let current = idx;
        idx = advance(idx, incr, size);
        Some(current)
    })
}

/// Build the slot table for hashes given in final (sorted) entry order
///
/// `size` must be a prime larger than `hashes.len()`.
pub fn build(hashes: &[u32], size: u32) -> Vec<u32> {
    debug_assert!(size >= MIN_SIZE && (size as usize) > hashes.len());
    let mut slots = vec![0u32; size as usize];

    for (seq, &hash) in (1u32..).zip(hashes) {
        let mut idx = hash % size;
        if slots[idx as usize] != 0 {
            let incr = increment(hash, size);
            loop {
                idx = advance(idx, incr, size);
                if slots[idx as usize] == 0 {
                    break;
                }
            }
        }
        slots[idx as usize] = seq;
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(0), 3);
        assert_eq!(next_prime(2), 3);
        assert_eq!(next_prime(3), 3);
        assert_eq!(next_prime(8), 11);
        assert_eq!(next_prime(24), 29);
        assert_eq!(next_prime(25), 29);
    }

    #[test]
    fn test_auto_size() {
        assert_eq!(auto_size(0), 3);
        assert_eq!(auto_size(1), 3);
        assert_eq!(auto_size(2), 3);
        assert_eq!(auto_size(6), 11);
        assert_eq!(auto_size(100), 137);
    }

    #[test]
    fn test_subtraction_wraparound() {
        // size 7, incr 1 + 5 % 5 = 1: 5 -> 6 -> 0 -> 1
        let seq: Vec<u32> = slot_sequence(5, 7).take(4).collect();
        assert_eq!(seq, vec![5, 6, 0, 1]);
        // incr 1 + 12 % 5 = 3: 5 -> 1 -> 4 -> 0
        let seq: Vec<u32> = slot_sequence(12, 7).take(4).collect();
        assert_eq!(seq, vec![5, 1, 4, 0]);
    }

    #[test]
    fn test_slot_sequence_visits_every_slot() {
        let mut seen: Vec<u32> = slot_sequence(0xdead_beef, 13).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..13).collect::<Vec<_>>());
    }

    #[test]
    fn test_collisions_are_resolved() {
        // All three hash to slot 2 of 5
        let hashes = [2, 7, 12];
        let slots = build(&hashes, 5);
        let mut used: Vec<u32> = slots.iter().copied().filter(|&s| s != 0).collect();
        used.sort_unstable();
        assert_eq!(used, vec![1, 2, 3]);
        assert_eq!(slots[2], 1);

        for (seq, &hash) in (1u32..).zip(&hashes) {
            assert!(slot_sequence(hash, 5).any(|idx| slots[idx as usize] == seq));
        }
    }
}
