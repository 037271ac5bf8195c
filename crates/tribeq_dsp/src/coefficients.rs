//! Band Layout and Coefficient Derivation
//!
//! Each band is one second-order section designed with the RBJ
//! (Robert Bristow-Johnson) Audio EQ Cookbook formulas, via
//! `biquad::Coefficients::<f64>::from_params`:
//!
//! | band | shape      | frequency | Q      |
//! |------|------------|-----------|--------|
//! | low  | low shelf  | 300 Hz    | 1/√2   |
//! | mid  | peaking    | 1 kHz     | 0.7    |
//! | high | high shelf | 3 kHz     | 1/√2   |
//!
//! # Flat at 0 dB
//!
//! At 0 dB the cookbook's `A` is exactly `1.0`, and the f64 design then
//! produces numerator terms with the same IEEE value as their denominator
//! twins (`b0 == a0`, `b1 == a1`, `b2 == a2`). Narrowed to f32 that gives
//! `b0 == 1.0`, and a section with zero history returns its input bit for bit.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use biquad::{Coefficients, Errors, Hertz, Type};

use crate::error::DspError;

/// Number of bands in the cascade
pub const BAND_COUNT: usize = 3;

/// Low shelf corner frequency (Hz)
pub const LOW_SHELF_HZ: f32 = 300.0;

/// Mid peaking center frequency (Hz), roughly the geometric mean of the shelves
pub const MID_PEAK_HZ: f32 = 1000.0;

/// High shelf corner frequency (Hz)
pub const HIGH_SHELF_HZ: f32 = 3000.0;

/// Shelf Q (Butterworth, shelf slope S = 1)
pub const SHELF_Q: f32 = FRAC_1_SQRT_2 as f32;

/// Mid band Q, a little under two octaves wide
pub const MID_PEAK_Q: f32 = 0.7;

/// Filter shape of a band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandType {
    LowShelf,
    Peaking,
    HighShelf,
}

/// One of the three equalizer bands, in cascade order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Low,
    Mid,
    High,
}

impl Band {
    /// All bands in processing order (low → mid → high)
    pub const ALL: [Band; BAND_COUNT] = [Band::Low, Band::Mid, Band::High];

    /// Position of this band in the cascade
    pub const fn index(self) -> usize {
        match self {
            Band::Low => 0,
            Band::Mid => 1,
            Band::High => 2,
        }
    }

    pub const fn band_type(self) -> BandType {
        match self {
            Band::Low => BandType::LowShelf,
            Band::Mid => BandType::Peaking,
            Band::High => BandType::HighShelf,
        }
    }

    /// Corner (shelf) or center (peak) frequency in Hz
    pub const fn frequency(self) -> f32 {
        match self {
            Band::Low => LOW_SHELF_HZ,
            Band::Mid => MID_PEAK_HZ,
            Band::High => HIGH_SHELF_HZ,
        }
    }

    pub const fn q(self) -> f32 {
        match self {
            Band::Low | Band::High => SHELF_Q,
            Band::Mid => MID_PEAK_Q,
        }
    }

    /// Derive the section coefficients for this band
    ///
    /// Pure function of its inputs: the same rate and gain always produce
    /// bit-identical coefficients. Fails when the band frequency does not
    /// sit below Nyquist, which cannot happen for a supported sample rate.
    pub fn coefficients(
        self,
        sample_rate: u32,
        gain_db: f32,
    ) -> Result<SectionCoefficients, DspError> {
        let gain_db = f64::from(gain_db);
        let filter = match self.band_type() {
            BandType::LowShelf => Type::LowShelf(gain_db),
            BandType::Peaking => Type::PeakingEQ(gain_db),
            BandType::HighShelf => Type::HighShelf(gain_db),
        };

        // Designed in f64 and rounded once, so the paired terms stay identical
        let invalid = |_: Errors| DspError::InvalidCoefficients {
            frequency: self.frequency(),
            sample_rate,
        };
        let fs = Hertz::<f64>::from_hz(f64::from(sample_rate)).map_err(invalid)?;
        let f0 = Hertz::<f64>::from_hz(f64::from(self.frequency())).map_err(invalid)?;

        Coefficients::<f64>::from_params(filter, fs, f0, f64::from(self.q()))
            .map(SectionCoefficients::from)
            .map_err(invalid)
    }
}

/// Normalized (a0 = 1) coefficients of one second-order section
///
/// Transfer function: `H(z) = (b0 + b1·z⁻¹ + b2·z⁻²) / (1 + a1·z⁻¹ + a2·z⁻²)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl SectionCoefficients {
    /// Pass-through section
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// True when numerator and denominator cancel exactly
    pub fn is_flat(&self) -> bool {
        self.b0 == 1.0 && self.b1 == self.a1 && self.b2 == self.a2
    }

    /// Magnitude response at `frequency` Hz, evaluated on the unit circle
    pub fn magnitude_at(&self, frequency: f32, sample_rate: u32) -> f32 {
        let w = 2.0 * PI * f64::from(frequency) / f64::from(sample_rate);
        let (b0, b1, b2) = (f64::from(self.b0), f64::from(self.b1), f64::from(self.b2));
        let (a1, a2) = (f64::from(self.a1), f64::from(self.a2));

        // e^{-jw} and e^{-2jw}
        let (c1, s1) = (w.cos(), -w.sin());
        let (c2, s2) = ((2.0 * w).cos(), -(2.0 * w).sin());

        let num_re = b0 + b1 * c1 + b2 * c2;
        let num_im = b1 * s1 + b2 * s2;
        let den_re = 1.0 + a1 * c1 + a2 * c2;
        let den_im = a1 * s1 + a2 * s2;

        (num_re.hypot(num_im) / den_re.hypot(den_im)) as f32
    }
}

impl From<Coefficients<f64>> for SectionCoefficients {
    fn from(c: Coefficients<f64>) -> Self {
        Self {
            b0: c.b0 as f32,
            b1: c.b1 as f32,
            b2: c.b2 as f32,
            a1: c.a1 as f32,
            a2: c.a2 as f32,
        }
    }
}

impl From<SectionCoefficients> for Coefficients<f32> {
    fn from(c: SectionCoefficients) -> Self {
        Coefficients {
            a1: c.a1,
            a2: c.a2,
            b0: c.b0,
            b1: c.b1,
            b2: c.b2,
        }
    }
}

/// Cached coefficients for the whole cascade, indexed by [`Band::index`]
///
/// Derived data: only the equalizer rewrites it, whenever its sample rate
/// or one of its gains changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientSet {
    sections: [SectionCoefficients; BAND_COUNT],
}

impl CoefficientSet {
    /// Derive all three sections from scratch
    pub fn derive(sample_rate: u32, gains_db: [f32; BAND_COUNT]) -> Result<Self, DspError> {
        let mut sections = [SectionCoefficients::IDENTITY; BAND_COUNT];
        for band in Band::ALL {
            sections[band.index()] = band.coefficients(sample_rate, gains_db[band.index()])?;
        }
        Ok(Self { sections })
    }

    pub fn band(&self, band: Band) -> &SectionCoefficients {
        &self.sections[band.index()]
    }

    pub(crate) fn set_band(&mut self, band: Band, coefficients: SectionCoefficients) {
        self.sections[band.index()] = coefficients;
    }

    /// Combined magnitude of the cascade at `frequency` Hz
    pub fn magnitude_at(&self, frequency: f32, sample_rate: u32) -> f32 {
        self.sections
            .iter()
            .map(|s| s.magnitude_at(frequency, sample_rate))
            .product()
    }

    pub fn is_flat(&self) -> bool {
        self.sections.iter().all(SectionCoefficients::is_flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATES: [u32; 6] = [8000, 22050, 44100, 48000, 96000, 192000];

    fn db(linear: f32) -> f32 {
        20.0 * linear.log10()
    }

    #[test]
    fn test_band_layout() {
        assert_eq!(Band::Low.band_type(), BandType::LowShelf);
        assert_eq!(Band::Mid.band_type(), BandType::Peaking);
        assert_eq!(Band::High.band_type(), BandType::HighShelf);

        for (i, band) in Band::ALL.iter().enumerate() {
            assert_eq!(band.index(), i);
        }
        assert!(LOW_SHELF_HZ < MID_PEAK_HZ && MID_PEAK_HZ < HIGH_SHELF_HZ);
    }

    #[test]
    fn test_zero_db_is_exactly_flat() {
        for rate in RATES {
            for band in Band::ALL {
                let c = band.coefficients(rate, 0.0).unwrap();
                assert_eq!(c.b0, 1.0, "{:?} at {} Hz", band, rate);
                assert_eq!(c.b1, c.a1, "{:?} at {} Hz", band, rate);
                assert_eq!(c.b2, c.a2, "{:?} at {} Hz", band, rate);
                assert!(c.is_flat());
            }
        }
    }

    #[test]
    fn test_negative_zero_is_flat_too() {
        let c = Band::Low.coefficients(44100, -0.0).unwrap();
        assert!(c.is_flat());
    }

    #[test]
    fn test_derivation_is_deterministic() {
        for band in Band::ALL {
            let first = band.coefficients(48000, 7.5).unwrap();
            let second = band.coefficients(48000, 7.5).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_boost_is_not_flat() {
        for band in Band::ALL {
            assert!(!band.coefficients(48000, 6.0).unwrap().is_flat());
        }
    }

    #[test]
    fn test_peak_gain_at_center() {
        // Peaking section reaches the full gain at its center frequency
        let c = Band::Mid.coefficients(48000, 12.0).unwrap();
        let gain = db(c.magnitude_at(MID_PEAK_HZ, 48000));
        assert!((gain - 12.0).abs() < 0.01, "got {} dB", gain);
    }

    #[test]
    fn test_shelf_gain_at_corner_is_half() {
        // RBJ shelves pass through half the dB gain at the corner frequency
        let low = Band::Low.coefficients(48000, 12.0).unwrap();
        let gain = db(low.magnitude_at(LOW_SHELF_HZ, 48000));
        assert!((gain - 6.0).abs() < 0.05, "got {} dB", gain);

        let high = Band::High.coefficients(48000, -12.0).unwrap();
        let gain = db(high.magnitude_at(HIGH_SHELF_HZ, 48000));
        assert!((gain + 6.0).abs() < 0.05, "got {} dB", gain);
    }

    #[test]
    fn test_shelf_plateaus() {
        let low = Band::Low.coefficients(48000, 9.0).unwrap();
        assert!((db(low.magnitude_at(20.0, 48000)) - 9.0).abs() < 0.1);
        assert!(db(low.magnitude_at(15000.0, 48000)).abs() < 0.1);

        let high = Band::High.coefficients(48000, 9.0).unwrap();
        assert!((db(high.magnitude_at(20000.0, 48000)) - 9.0).abs() < 0.2);
        assert!(db(high.magnitude_at(50.0, 48000)).abs() < 0.1);
    }

    #[test]
    fn test_poles_inside_unit_circle() {
        // Stability triangle for a2/a1 over the whole supported gain range
        for rate in RATES {
            for band in Band::ALL {
                for gain in [-96.0, -48.0, -12.0, 0.0, 12.0, 24.0] {
                    let c = band.coefficients(rate, gain).unwrap();
                    assert!(c.a2.abs() < 1.0, "{:?} {} {}", band, rate, gain);
                    assert!(c.a1.abs() < 1.0 + c.a2, "{:?} {} {}", band, rate, gain);
                }
            }
        }
    }

    #[test]
    fn test_coefficient_set_tracks_bands() {
        let set = CoefficientSet::derive(44100, [3.0, 0.0, -3.0]).unwrap();
        assert_eq!(*set.band(Band::Low), Band::Low.coefficients(44100, 3.0).unwrap());
        assert!(set.band(Band::Mid).is_flat());
        assert!(!set.is_flat());

        let flat = CoefficientSet::derive(44100, [0.0; BAND_COUNT]).unwrap();
        assert!(flat.is_flat());
        assert!((flat.magnitude_at(1000.0, 44100) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_band_above_nyquist_is_rejected() {
        // 3 kHz shelf needs a rate above 6 kHz
        assert_eq!(
            Band::High.coefficients(4000, 0.0),
            Err(DspError::InvalidCoefficients {
                frequency: HIGH_SHELF_HZ,
                sample_rate: 4000
            })
        );
        assert!(Band::Low.coefficients(0, 0.0).is_err());
        assert!(CoefficientSet::derive(4000, [0.0; BAND_COUNT]).is_err());
    }

    #[test]
    fn test_matches_biquad_design() {
        let direct = Coefficients::<f64>::from_params(
            Type::PeakingEQ(-7.0),
            Hertz::<f64>::from_hz(44100.0).unwrap(),
            Hertz::<f64>::from_hz(1000.0).unwrap(),
            0.7,
        )
        .unwrap();
        let c = Band::Mid.coefficients(44100, -7.0).unwrap();
        assert_eq!(c.b0, direct.b0 as f32);
        assert_eq!(c.a1, direct.a1 as f32);
    }

    #[test]
    fn test_into_biquad_coefficients() {
        let c = Band::Mid.coefficients(48000, 4.0).unwrap();
        let converted: Coefficients<f32> = c.into();
        assert_eq!(converted.b0, c.b0);
        assert_eq!(converted.a2, c.a2);
    }
}
