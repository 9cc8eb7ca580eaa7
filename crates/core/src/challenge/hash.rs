//! Obfuscated hash used by the catalog's challenge check.
//!
//! The upstream verifies tokens with 32-bit JavaScript arithmetic, so every
//! step here runs on `i32` with wrapping semantics and the input is walked as
//! UTF-16 code units.

const SEED_1: i32 = 0xdeadbeef_u32 as i32;
const SEED_2: i32 = 0x41c6ce57;
const ROUND_MUL_1: i32 = 2654435761_u32 as i32;
const ROUND_MUL_2: i32 = 1597334677;
const MIX_MUL_1: i32 = 1566083941;
const MIX_MUL_2: i32 = 2024237689;

/// Stands in for each character `second` lacks during the interleave.
const MISSING_CHAR: &str = "undefined";

/// Two-lane multiplicative hash, rendered as unpadded lowercase hex.
pub fn dual_hash(s: &str) -> String {
    let units: Vec<u16> = s.encode_utf16().collect();
    let len = units.len() as i32;

    let mut h1 = SEED_1 ^ len;
    let mut h2 = SEED_2 ^ len;

    for unit in units {
        let c = i32::from(unit);
        h1 = (h1 ^ c).wrapping_mul(ROUND_MUL_1).rotate_left(5);
        h2 = (h2 ^ c).wrapping_mul(ROUND_MUL_2).rotate_left(5);
    }

    // The second mix reads the already-updated h1.
    h1 = h1.wrapping_add(h2.wrapping_mul(MIX_MUL_1));
    h2 = h2.wrapping_add(h1.wrapping_mul(MIX_MUL_2));

    format!("{:x}", (h1 ^ h2) as u32)
}

/// Interleave the leading halves, then append both trailing halves reversed.
///
/// The split index is taken from `first` and applied to both inputs. Inputs
/// are hex digests, so byte indexing is safe; indices are clamped the way a
/// substring call would clamp them. When `second` runs out before the
/// interleave does, the upstream verifier pads with the literal `undefined`,
/// so the same padding is emitted here.
pub fn combine_hashes(first: &str, second: &str) -> String {
    let half = first.len() / 2;
    let (head_1, tail_1) = first.split_at(half);
    let (head_2, tail_2) = second.split_at(half.min(second.len()));

    let mut out = String::with_capacity(first.len() + second.len());
    let mut paired = head_2.chars();
    for a in head_1.chars() {
        out.push(a);
        match paired.next() {
            Some(b) => out.push(b),
            None => out.push_str(MISSING_CHAR),
        }
    }
    out.extend(tail_2.chars().rev());
    out.extend(tail_1.chars().rev());
    out
}
