//! Quantization-index modulation, shared by the DCT and DWT carriers.
//!
//! Both carriers pick a fixed set of real-valued coefficients per embedding
//! unit (a DCT block, a DWT sub-band) and snap each to the nearest multiple
//! of a step `Δ`/`Q` whose parity encodes one bit. Centralizing this here
//! keeps the two carriers' embed/extract loops from drifting apart on the
//! rounding mode, a detail that must be picked once and kept consistent.

/// Ties round to even: half-to-even is used uniformly so that `q == 0`
/// after embedding behaves identically whichever carrier produced it.
fn round_half_to_even(x: f64) -> f64 {
    x.round_ties_even()
}

/// Embeds one bit into coefficient `c` using quantization step `delta`.
///
/// 1. `q = round(c / delta)`.
/// 2. If `q mod 2 != bit`, nudge `q` by `sign(c)` (treating `sign(0)` as +1).
/// 3. If that produced `q == 0` while `bit == 1`, force `q = sign(c)` so a
///    zero coefficient never silently encodes a 1 as a 0 on extract.
/// 4. Return `q * delta`.
pub fn embed_bit(c: f64, bit: bool, delta: f64) -> f64 {
    let mut q = round_half_to_even(c / delta) as i64;
    let sign = if c < 0.0 { -1i64 } else { 1i64 };
    let bit = bit as i64;

    if q.rem_euclid(2) != bit {
        q += sign;
    }
    if q == 0 && bit == 1 {
        q = sign;
    }
    q as f64 * delta
}

/// Extracts the bit QIM-encoded into coefficient `c` under step `delta`.
/// A coefficient that rounds to exactly zero is read as bit 0.
pub fn extract_bit(c: f64, delta: f64) -> bool {
    let q = round_half_to_even(c / delta) as i64;
    if q == 0 {
        false
    } else {
        q.rem_euclid(2) == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_and_extracts_both_bits() {
        for &c in &[-40.0, -13.5, -1.0, 0.0, 0.3, 7.0, 100.25] {
            for &bit in &[false, true] {
                let embedded = embed_bit(c, bit, 12.0);
                assert_eq!(
                    extract_bit(embedded, 12.0),
                    bit,
                    "c={c} bit={bit} embedded={embedded}"
                );
            }
        }
    }

    #[test]
    fn zero_coefficient_never_ambiguous() {
        let embedded = embed_bit(0.0, true, 14.0);
        assert_ne!(embedded, 0.0);
        assert!(extract_bit(embedded, 14.0));

        let embedded0 = embed_bit(0.0, false, 14.0);
        assert!(!extract_bit(embedded0, 14.0));
    }

    #[test]
    fn survives_small_perturbation() {
        // Within half a step, extraction must still recover the bit,
        // this is the margin DCT/DWT round-tripping relies on.
        let delta = 12.0;
        let embedded = embed_bit(5.3, true, delta);
        let perturbed = embedded + delta * 0.4;
        assert!(extract_bit(perturbed, delta));
    }
}
