use crate::core::geometry::{Bounds, Vec2};
use crate::scene::palette::{ColorIx, ColorLedger, GLYPHS};
use crate::synth::voice::VoiceHandle;
use rand::Rng;
use std::f32::consts::TAU;

/// Chain length range, half-open.
pub const POINT_COUNT_RANGE: std::ops::Range<usize> = 5..40;
/// Velocity magnitude range at spawn, half-open.
pub const SPEED_RANGE: std::ops::Range<f32> = 0.5..2.0;
/// Speed above which the head triggers its voice.
pub const TRIGGER_SPEED: f32 = 1.5;
/// Lerp factor for the tail-first chain relaxation.
pub const RELAX_FACTOR: f32 = 0.05;
/// Spacing of the initial polygon, per chain index.
pub const POLYGON_SPACING: f32 = 25.0;
/// Envelope shape: fast attack, amplitude held for `point_count` tenths
/// of a second, slow release.
pub const ENVELOPE_AMP: f32 = 0.5;
pub const ATTACK_SEC: f32 = 0.05;
pub const RELEASE_SEC: f32 = 0.5;
pub const HOLD_SEC_PER_POINT: f64 = 0.1;

/// Where to draw one glyph: position plus heading toward the next chain
/// point.
#[derive(Clone, Copy, Debug)]
pub struct GlyphPlacement {
    pub pos: Vec2,
    pub angle: f32,
}

/// One wandering glyph trail. Glyph, color, note and voice are fixed at
/// spawn; only the head, chain and envelope state mutate per frame.
#[derive(Debug)]
pub struct Curve {
    pub glyph: char,
    pub color: ColorIx,
    pub note: &'static str,
    voice: VoiceHandle,
    point_count: usize,
    head: Vec2,
    vel: Vec2,
    chain: Vec<Vec2>,
    playing: bool,
    envelope_end: Option<f64>,
}

impl Curve {
    /// Build a candidate curve. Fails (returning `None`) only when the
    /// ledger has no color below the cap; the caller rejects the
    /// candidate and retries.
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        bounds: Bounds,
        note: &'static str,
        voice: VoiceHandle,
        ledger: &mut ColorLedger,
    ) -> Option<Self> {
        let color = ledger.assign(rng)?;
        let glyph = GLYPHS[rng.random_range(0..GLYPHS.len())] as char;
        let point_count = rng.random_range(POINT_COUNT_RANGE);
        let head = Vec2::new(
            rng.random_range(0.0..bounds.width),
            rng.random_range(0.0..bounds.height),
        );
        let vel = Vec2::from_angle(rng.random_range(0.0..TAU))
            * rng.random_range(SPEED_RANGE);

        // Initial chain: a regular polygon spiralling out from the head,
        // radius growing 25 units per index.
        let chain = (0..point_count)
            .map(|i| {
                let theta = TAU / point_count as f32 * i as f32;
                head + Vec2::from_angle(theta) * (POLYGON_SPACING * i as f32)
            })
            .collect();

        Some(Self {
            glyph,
            color,
            note,
            voice,
            point_count,
            head,
            vel,
            chain,
            playing: false,
            envelope_end: None,
        })
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn head(&self) -> Vec2 {
        self.head
    }

    pub fn chain(&self) -> &[Vec2] {
        &self.chain
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// One simulation step at scene time `now_sec`: move and wrap the
    /// head, relax the chain, retire an expired envelope, then check the
    /// speed trigger.
    pub fn advance(&mut self, bounds: Bounds, now_sec: f64) {
        self.head += self.vel;
        bounds.wrap(&mut self.head);

        // Tail-first, so each point chases where its leader was last
        // frame, which gives the exponential-decay trail.
        for i in (1..self.point_count).rev() {
            let leader = self.chain[i - 1];
            self.chain[i] = self.chain[i].lerp(leader, RELAX_FACTOR);
        }
        self.chain[0] = self.head;

        if let Some(end) = self.envelope_end {
            if now_sec >= end {
                self.voice.set_amp(0.0, RELEASE_SEC);
                self.playing = false;
                self.envelope_end = None;
            }
        }

        if self.speed() > TRIGGER_SPEED && !self.playing {
            self.play_sound(now_sec);
        }
    }

    /// Start the envelope: fast ramp up, hold for a duration scaled by
    /// the chain length. Blocked while already sounding, so speed
    /// flutter above the threshold cannot stutter the voice.
    fn play_sound(&mut self, now_sec: f64) {
        self.playing = true;
        self.voice.set_amp(ENVELOPE_AMP, ATTACK_SEC);
        self.envelope_end = Some(now_sec + self.point_count as f64 * HOLD_SEC_PER_POINT);
    }

    /// Glyph positions for rendering: each chain point except the last,
    /// rotated toward its successor. The final point only anchors the
    /// tail.
    pub fn glyph_placements(&self) -> impl Iterator<Item = GlyphPlacement> + '_ {
        self.chain.windows(2).map(|pair| GlyphPlacement {
            pos: pair[0],
            angle: pair[0].heading_to(pair[1]),
        })
    }

    #[cfg(test)]
    pub(crate) fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    #[cfg(test)]
    pub(crate) fn set_head(&mut self, head: Vec2) {
        self.head = head;
    }

    #[cfg(test)]
    pub(crate) fn envelope_end(&self) -> Option<f64> {
        self.envelope_end
    }
}
