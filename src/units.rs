//! Stress and length unit conversions.
//!
//! Material data is held in SI (Pa). Stress results come in the units
//! of the model and are converted with `StressUnit::to_pascal`.

/// Pascals in one ksi.
pub const PA_PER_KSI: f64 = 6_894_760.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StressUnit {
    Pa,
    KPa,
    MPa,
    GPa,
    Psi,
    Ksi,
}

impl StressUnit {
    /// Multiplier from this unit to Pa.
    pub fn to_pascal(&self) -> f64 {
        match *self {
            StressUnit::Pa => 1.0,
            StressUnit::KPa => 1e3,
            StressUnit::MPa => 1e6,
            StressUnit::GPa => 1e9,
            StressUnit::Psi => PA_PER_KSI / 1000.0,
            StressUnit::Ksi => PA_PER_KSI,
        }
    }

    pub fn text(&self) -> &'static str {
        match *self {
            StressUnit::Pa => "Pa",
            StressUnit::KPa => "kPa",
            StressUnit::MPa => "MPa",
            StressUnit::GPa => "GPa",
            StressUnit::Psi => "psi",
            StressUnit::Ksi => "ksi",
        }
    }

    pub fn from_text(input: &str) -> Option<StressUnit> {
        match input {
            "Pa" => Some(StressUnit::Pa),
            "kPa" => Some(StressUnit::KPa),
            "MPa" | "N mm^-2" | "N/mm^2" => Some(StressUnit::MPa),
            "GPa" => Some(StressUnit::GPa),
            "psi" => Some(StressUnit::Psi),
            "ksi" => Some(StressUnit::Ksi),
            _ => None,
        }
    }
}

/// Length units of the model, used for the notch radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Meter,
    Centimeter,
    Millimeter,
    Micrometer,
    Foot,
    Inch,
}

impl LengthUnit {
    /// Multiplier from this unit to inches.
    pub fn to_inch(&self) -> f64 {
        match *self {
            LengthUnit::Meter => 1000.0 / 25.4,
            LengthUnit::Centimeter => 10.0 / 25.4,
            LengthUnit::Millimeter => 1.0 / 25.4,
            LengthUnit::Micrometer => 1e-3 / 25.4,
            LengthUnit::Foot => 12.0,
            LengthUnit::Inch => 1.0,
        }
    }

    pub fn text(&self) -> &'static str {
        match *self {
            LengthUnit::Meter => "m",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Millimeter => "mm",
            LengthUnit::Micrometer => "um",
            LengthUnit::Foot => "ft",
            LengthUnit::Inch => "in",
        }
    }

    pub fn from_text(input: &str) -> Option<LengthUnit> {
        match input {
            "m" => Some(LengthUnit::Meter),
            "cm" => Some(LengthUnit::Centimeter),
            "mm" => Some(LengthUnit::Millimeter),
            "um" => Some(LengthUnit::Micrometer),
            "ft" => Some(LengthUnit::Foot),
            "in" => Some(LengthUnit::Inch),
            _ => None,
        }
    }
}
