use crate::hash::SeedHex;

/// Mulberry32: a 32-bit integer hash-mix generator.
///
/// Each call adds `0x6D2B79F5` to the state and mixes it with two
/// multiply-xorshift rounds. All arithmetic is wrapping `u32`, which makes the
/// sequence identical on every platform and to the JavaScript reference
/// (`Math.imul`, `>>>`).
///
/// Draw order is part of the contract: consumers must pull values in their
/// documented order or every later value shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn from_hex(hex: &SeedHex) -> Self {
        Self::new(hex.seed())
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(1 | a);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        t ^ (t >> 14)
    }

    /// Next value in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }

    /// Next value scaled to `(r - 0.5) * amplitude`, i.e. centered on zero.
    #[inline]
    pub fn centered(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() - 0.5) * amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_sequence_seed_zero() {
        let mut rng = Mulberry32::new(0);
        assert_eq!(rng.next_u32(), 1_144_304_738);
        assert_eq!(rng.next_u32(), 1_416_247);
        assert_eq!(rng.next_u32(), 958_946_056);
    }

    #[test]
    fn matches_reference_floats() {
        let mut rng = Mulberry32::new(0);
        assert_eq!(rng.next_f64(), 0.26642920868471265);
        assert_eq!(rng.next_f64(), 0.0003297457005828619);
        assert_eq!(rng.next_f64(), 0.2232720274478197);

        let mut rng = Mulberry32::new(42);
        assert_eq!(rng.next_f64(), 0.6011037519201636);
        assert_eq!(rng.next_f64(), 0.44829055899754167);
        assert_eq!(rng.next_f64(), 0.8524657934904099);
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = Mulberry32::new(0xDEAD_BEEF);
        let mut b = Mulberry32::new(0xDEAD_BEEF);
        for _ in 0..1000 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn floats_stay_in_unit_interval() {
        let mut rng = Mulberry32::new(7);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn centered_is_symmetric_range() {
        let mut rng = Mulberry32::new(99);
        for _ in 0..10_000 {
            let v = rng.centered(80.0);
            assert!((-40.0..40.0).contains(&v));
        }
    }
}
