//! Seedable random number generation for reproducible turn resolution.
//!
//! All randomness in the engine (battle participant shuffling, battle
//! ordering) flows through a [`SeededRng`] passed into
//! [`Game::apply_turn`](crate::game::Game::apply_turn). The same seed and
//! the same inputs produce identical turn outcomes.

/// Deterministic random number generator (xorshift64*).
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new RNG from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        // Combine seed bytes into initial state using a mixing function
        // to ensure different seeds produce different states
        let mut state: u64 = 0xcbf29ce484222325; // FNV offset basis
        for &byte in seed.iter() {
            state ^= byte as u64;
            state = state.wrapping_mul(0x100000001b3); // FNV prime
        }
        // Ensure non-zero state
        if state == 0 {
            state = 0x853c49e6748fea9b;
        }
        Self { state }
    }

    /// Create a new RNG from a bare integer seed.
    pub fn from_u64(seed: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&seed.to_le_bytes());
        Self::from_seed(&bytes)
    }

    /// Generate next random u64.
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate a random u32.
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Generate a random number in range [0, max).
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }

    /// Shuffle a slice in place (Fisher-Yates).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range(i as u32 + 1) as usize;
            slice.swap(i, j);
        }
    }
}
