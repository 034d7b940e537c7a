//! Gain Controls
//!
//! Slider mapping, built-in presets and a lock-free gain store shared
//! between a control thread and the render loop.

use std::sync::atomic::{AtomicU32, Ordering};

use trieq_dsp::{BandGains, BandKind};

/// Highest slider position; sliders run 0..=SLIDER_MAX
pub const SLIDER_MAX: i32 = 10;

/// Slider position that maps to 0 dB
pub const SLIDER_CENTER: i32 = 5;

/// Gain per slider step, giving -12 dB at 0 and +12 dB at 10
pub const DB_PER_STEP: f32 = 2.4;

/// Convert a slider position to a gain in dB
///
/// Positions outside 0..=10 are clamped.
pub fn slider_to_db(position: i32) -> f32 {
    (position.clamp(0, SLIDER_MAX) - SLIDER_CENTER) as f32 * DB_PER_STEP
}

/// Nearest slider position for a gain in dB
pub fn db_to_slider(gain_db: f32) -> i32 {
    if !gain_db.is_finite() {
        return SLIDER_CENTER;
    }
    let steps = (gain_db / DB_PER_STEP).round() as i32;
    (SLIDER_CENTER + steps).clamp(0, SLIDER_MAX)
}

/// Build gains from three slider positions
pub fn gains_from_sliders(bass: i32, mid: i32, treble: i32) -> BandGains {
    BandGains::new(slider_to_db(bass), slider_to_db(mid), slider_to_db(treble))
}

/// Named preset with bass/mid/treble gains
pub type Preset = (&'static str, BandGains);

/// List of built-in presets
pub const PRESETS: &[Preset] = &[
    ("Flat", BandGains::FLAT),
    ("Bass Boost", BandGains { bass_db: 6.0, mid_db: 0.0, treble_db: 0.0 }),
    ("Bass Reduce", BandGains { bass_db: -6.0, mid_db: 0.0, treble_db: 0.0 }),
    ("Treble Boost", BandGains { bass_db: 0.0, mid_db: 0.0, treble_db: 6.0 }),
    ("Vocal", BandGains { bass_db: -2.4, mid_db: 4.8, treble_db: 2.4 }),
    ("Loudness", BandGains { bass_db: 7.2, mid_db: -2.4, treble_db: 4.8 }),
];

/// Look up a built-in preset by name (case-insensitive)
pub fn preset(name: &str) -> Option<BandGains> {
    PRESETS
        .iter()
        .find(|(preset_name, _)| preset_name.eq_ignore_ascii_case(name))
        .map(|(_, gains)| *gains)
}

/// Gains shared between a control thread and the render loop
///
/// Each band is stored as f32 bits in its own atomic, so no read ever sees
/// a torn value. The bands are independent: a [`snapshot`](SharedGains::snapshot)
/// taken while [`store`](SharedGains::store) runs may pair new bass with old
/// treble. The render loop snapshots once per block, so such a mix lasts one
/// block and the next block sees all three new values.
#[derive(Debug)]
pub struct SharedGains {
    bass_bits: AtomicU32,
    mid_bits: AtomicU32,
    treble_bits: AtomicU32,
}

impl SharedGains {
    pub fn new(gains: BandGains) -> Self {
        Self {
            bass_bits: AtomicU32::new(gains.bass_db.to_bits()),
            mid_bits: AtomicU32::new(gains.mid_db.to_bits()),
            treble_bits: AtomicU32::new(gains.treble_db.to_bits()),
        }
    }

    fn slot(&self, band: BandKind) -> &AtomicU32 {
        match band {
            BandKind::Bass => &self.bass_bits,
            BandKind::Mid => &self.mid_bits,
            BandKind::Treble => &self.treble_bits,
        }
    }

    /// Set one band's gain in dB
    pub fn set(&self, band: BandKind, gain_db: f32) {
        self.slot(band).store(gain_db.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self, band: BandKind) -> f32 {
        f32::from_bits(self.slot(band).load(Ordering::Relaxed))
    }

    pub fn set_bass(&self, gain_db: f32) {
        self.set(BandKind::Bass, gain_db);
    }

    pub fn set_mid(&self, gain_db: f32) {
        self.set(BandKind::Mid, gain_db);
    }

    pub fn set_treble(&self, gain_db: f32) {
        self.set(BandKind::Treble, gain_db);
    }

    /// Replace all three gains, one band at a time
    pub fn store(&self, gains: BandGains) {
        self.set_bass(gains.bass_db);
        self.set_mid(gains.mid_db);
        self.set_treble(gains.treble_db);
    }

    /// Current gains, read once per block
    pub fn snapshot(&self) -> BandGains {
        BandGains::new(
            self.get(BandKind::Bass),
            self.get(BandKind::Mid),
            self.get(BandKind::Treble),
        )
    }
}

impl Default for SharedGains {
    fn default() -> Self {
        Self::new(BandGains::FLAT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_slider_mapping() {
        assert_eq!(slider_to_db(5), 0.0);
        assert!((slider_to_db(0) + 12.0).abs() < 1e-5);
        assert!((slider_to_db(10) - 12.0).abs() < 1e-5);
        assert!((slider_to_db(7) - 4.8).abs() < 1e-5);
    }

    #[test]
    fn test_slider_clamping() {
        assert_eq!(slider_to_db(-3), slider_to_db(0));
        assert_eq!(slider_to_db(42), slider_to_db(10));
    }

    #[test]
    fn test_db_to_slider_round_trip() {
        for position in 0..=SLIDER_MAX {
            assert_eq!(db_to_slider(slider_to_db(position)), position);
        }
        assert_eq!(db_to_slider(100.0), SLIDER_MAX);
        assert_eq!(db_to_slider(f32::NAN), SLIDER_CENTER);
    }

    #[test]
    fn test_gains_from_sliders() {
        let gains = gains_from_sliders(5, 5, 5);
        assert_eq!(gains, BandGains::FLAT);

        let gains = gains_from_sliders(10, 5, 0);
        assert!(gains.bass_db > 11.9);
        assert_eq!(gains.mid_db, 0.0);
        assert!(gains.treble_db < -11.9);
    }

    #[test]
    fn test_presets() {
        assert_eq!(preset("flat"), Some(BandGains::FLAT));
        assert_eq!(preset("Bass Boost").map(|g| g.bass_db), Some(6.0));
        assert_eq!(preset("does not exist"), None);

        for (name, gains) in PRESETS {
            assert!(gains.is_nominal(), "{name} outside nominal range");
        }
    }

    #[test]
    fn test_shared_gains_setters() {
        let shared = SharedGains::default();
        assert_eq!(shared.snapshot(), BandGains::FLAT);

        shared.set_bass(6.0);
        shared.set_mid(-1.5);
        shared.set_treble(3.0);
        assert_eq!(shared.snapshot(), BandGains::new(6.0, -1.5, 3.0));

        shared.store(BandGains::FLAT);
        assert_eq!(shared.get(BandKind::Mid), 0.0);
    }

    #[test]
    fn test_shared_gains_across_threads() {
        let shared = Arc::new(SharedGains::default());
        let writer = Arc::clone(&shared);

        std::thread::spawn(move || {
            writer.store(BandGains::new(1.0, 2.0, 3.0));
        })
        .join()
        .unwrap();

        assert_eq!(shared.snapshot(), BandGains::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_racing_snapshot_sees_only_stored_values() {
        let low = BandGains::new(-6.0, -3.0, -1.5);
        let high = BandGains::new(6.0, 3.0, 1.5);
        let shared = Arc::new(SharedGains::new(low));
        let writer = Arc::clone(&shared);

        let handle = std::thread::spawn(move || {
            for i in 0..10_000 {
                writer.store(if i % 2 == 0 { high } else { low });
            }
        });

        // Bands may come from different stores, but each is a whole stored value
        for _ in 0..10_000 {
            let snap = shared.snapshot();
            for band in BandKind::ALL {
                let value = snap.get(band);
                assert!(value == low.get(band) || value == high.get(band), "{band}: {value}");
            }
        }
        handle.join().unwrap();
    }
}
