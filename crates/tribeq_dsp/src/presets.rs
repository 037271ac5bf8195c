//! Built-in EQ Presets

/// Named EQ preset with low/mid/high gains in dB
pub type Preset = (&'static str, [f32; 3]);

/// List of built-in presets
pub const PRESETS: &[Preset] = &[
    ("Flat", [0.0; 3]),
    ("Bass Boost", [6.0, 0.0, 0.0]),
    ("Bass Reduce", [-6.0, 0.0, 0.0]),
    ("Treble Boost", [0.0, 0.0, 6.0]),
    ("Vocal Clarity", [-2.0, 4.0, 2.0]),
    ("Loudness", [6.0, -2.0, 5.0]),
    ("Warm", [10.0, 0.0, -10.0]),
    ("Telephone", [-24.0, 6.0, -24.0]),
];

/// Look up a built-in preset by name (case-insensitive)
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|(n, _)| n.eq_ignore_ascii_case(name))
}
