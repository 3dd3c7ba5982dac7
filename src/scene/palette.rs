use rand::Rng;

/// Characters a curve may draw along its chain. All ASCII, picked once at
/// creation.
pub const GLYPHS: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-=+[]{}|;:<>,.?/";

/// The fixed 8-color palette, as sRGB triples.
pub const PALETTE: [(u8, u8, u8); 8] = [
    (0xFF, 0xFF, 0x00), // yellow
    (0xFF, 0xA5, 0x00), // orange
    (0xFF, 0x00, 0x00), // red
    (0x00, 0x00, 0xFF), // blue
    (0xFF, 0x00, 0xFF), // magenta
    (0x00, 0x80, 0x00), // green
    (0x00, 0xFF, 0xFF), // cyan
    (0x80, 0x00, 0x80), // purple
];

/// The fixed note set the population cycles through.
pub const NOTE_NAMES: [&str; 8] = ["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"];

/// At most this many live curves may share one palette color.
pub const COLOR_CAP: u8 = 2;

/// Index into [`PALETTE`].
pub type ColorIx = usize;

/// Per-color usage counts for the live population. Only touched during a
/// population build, which is single-threaded.
#[derive(Clone, Debug, Default)]
pub struct ColorLedger {
    counts: [u8; PALETTE.len()],
}

impl ColorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of curves a color index can still be handed to.
    pub fn counts(&self) -> &[u8; PALETTE.len()] {
        &self.counts
    }

    pub fn total_assigned(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    /// Pick uniformly among colors below the cap and charge one use.
    /// Uniform choice (not first-fit) so low palette indices do not
    /// dominate early in a build. `None` when every color is saturated.
    pub fn assign<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<ColorIx> {
        let available: Vec<ColorIx> = (0..PALETTE.len())
            .filter(|&ix| self.counts[ix] < COLOR_CAP)
            .collect();
        if available.is_empty() {
            return None;
        }
        let ix = available[rng.random_range(0..available.len())];
        self.counts[ix] += 1;
        Some(ix)
    }

    pub fn reset(&mut self) {
        self.counts = [0; PALETTE.len()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn cap_is_never_exceeded() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut ledger = ColorLedger::new();
        for _ in 0..16 {
            assert!(ledger.assign(&mut rng).is_some());
            assert!(ledger.counts().iter().all(|&c| c <= COLOR_CAP));
        }
        // 8 colors x cap 2 = 16 slots; the 17th request has nowhere to go.
        assert_eq!(ledger.assign(&mut rng), None);
        assert_eq!(ledger.total_assigned(), 16);
    }

    #[test]
    fn reset_clears_all_counts() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut ledger = ColorLedger::new();
        for _ in 0..5 {
            ledger.assign(&mut rng);
        }
        ledger.reset();
        assert_eq!(ledger.total_assigned(), 0);
        assert!(ledger.assign(&mut rng).is_some());
    }

    #[test]
    fn assignment_spreads_over_palette() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut ledger = ColorLedger::new();
        for _ in 0..16 {
            ledger.assign(&mut rng);
        }
        // Full capacity means every color carries exactly the cap.
        assert!(ledger.counts().iter().all(|&c| c == COLOR_CAP));
    }
}
