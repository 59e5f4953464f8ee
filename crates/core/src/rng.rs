//! RNG module - deterministic symbol generation
//!
//! Every random symbol the engine needs (initial fill, refill after a cascade,
//! shuffle) comes from a [`SymbolSource`]. The default source is a small LCG so
//! that the same seed always replays the same game; tests can swap in a
//! [`ScriptedSource`] to control exactly which symbols fall into the grid.

use crate::types::Symbol;

/// Supplies symbols for new tiles.
///
/// `alphabet` is the number of symbols in play (the first `alphabet` entries
/// of [`Symbol::ALL`]); implementations should draw uniformly from it.
pub trait SymbolSource {
    fn draw(&mut self, alphabet: usize) -> Symbol;
}

impl<S: SymbolSource + ?Sized> SymbolSource for &mut S {
    fn draw(&mut self, alphabet: usize) -> Symbol {
        (**self).draw(alphabet)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales by the high bits; the low bits of this LCG have short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max <= 1 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current internal state (reseeding with it continues the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SymbolSource for SimpleRng {
    fn draw(&mut self, alphabet: usize) -> Symbol {
        let alphabet = alphabet.clamp(1, Symbol::COUNT);
        let index = self.next_range(alphabet as u32) as usize;
        Symbol::ALL[index]
    }
}

/// Replays a fixed list of symbols, wrapping around when exhausted.
///
/// Ignores the alphabet size; the script decides.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    symbols: Vec<Symbol>,
    cursor: usize,
}

impl ScriptedSource {
    /// `symbols` must not be empty.
    pub fn new(symbols: Vec<Symbol>) -> Self {
        assert!(!symbols.is_empty(), "scripted source needs at least one symbol");
        Self { symbols, cursor: 0 }
    }

    /// Script from glyph characters (`"HUNDTE"`); unknown glyphs are skipped.
    pub fn from_glyphs(glyphs: &str) -> Self {
        Self::new(glyphs.chars().filter_map(Symbol::from_glyph).collect())
    }

    /// Number of symbols handed out so far
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl SymbolSource for ScriptedSource {
    fn draw(&mut self, _alphabet: usize) -> Symbol {
        let symbol = self.symbols[self.cursor % self.symbols.len()];
        self.cursor += 1;
        symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_zero_seed_is_remapped() {
        let mut zero = SimpleRng::new(0);
        let mut one = SimpleRng::new(1);
        assert_eq!(zero.next_u32(), one.next_u32());
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(6) < 6);
        }
        assert_eq!(rng.next_range(0), 0);
        assert_eq!(rng.next_range(1), 0);
    }

    #[test]
    fn test_draw_covers_alphabet() {
        let mut rng = SimpleRng::new(99);
        let mut seen = [0u32; Symbol::COUNT];
        for _ in 0..6000 {
            seen[rng.draw(6).index()] += 1;
        }
        // Roughly uniform: every symbol well represented.
        for count in seen {
            assert!(count > 800, "skewed distribution: {:?}", seen);
        }
    }

    #[test]
    fn test_draw_respects_restricted_alphabet() {
        let mut rng = SimpleRng::new(3);
        for _ in 0..500 {
            assert!(rng.draw(3).index() < 3);
        }
    }

    #[test]
    fn test_draw_parity_is_not_striped() {
        // Consecutive draws must not simply alternate parity.
        let mut rng = SimpleRng::new(5);
        let parities: Vec<usize> = (0..64).map(|_| rng.draw(6).index() % 2).collect();
        let alternating = parities.windows(2).all(|w| w[0] != w[1]);
        assert!(!alternating);
    }

    #[test]
    fn test_scripted_source_wraps() {
        let mut src = ScriptedSource::from_glyphs("HU");
        assert_eq!(src.draw(6), Symbol::Hmstr);
        assert_eq!(src.draw(6), Symbol::Usdt);
        assert_eq!(src.draw(6), Symbol::Hmstr);
        assert_eq!(src.drawn(), 3);
    }
}
