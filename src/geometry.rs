//! Length primitives shared by the layout engine and rendering surfaces.
//!
//! The engine never interprets gutter units. It carries them through to the
//! emitted length expressions and asks the surface for a pixel value when a
//! number is needed (see [`crate::surface::Measure::resolve_gutter`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// CSS-style length unit attached to the gutter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LengthUnit {
    #[default]
    Px,
    Percent,
    Em,
    Rem,
    Vw,
    Vh,
    /// Any unit the engine has no name for. Passed through verbatim.
    Other(String),
}

impl LengthUnit {
    pub fn as_str(&self) -> &str {
        match self {
            LengthUnit::Px => "px",
            LengthUnit::Percent => "%",
            LengthUnit::Em => "em",
            LengthUnit::Rem => "rem",
            LengthUnit::Vw => "vw",
            LengthUnit::Vh => "vh",
            LengthUnit::Other(unit) => unit.as_str(),
        }
    }
}

impl From<&str> for LengthUnit {
    fn from(value: &str) -> Self {
        match value.trim() {
            "px" => LengthUnit::Px,
            "%" => LengthUnit::Percent,
            "em" => LengthUnit::Em,
            "rem" => LengthUnit::Rem,
            "vw" => LengthUnit::Vw,
            "vh" => LengthUnit::Vh,
            other => LengthUnit::Other(other.to_string()),
        }
    }
}

impl From<String> for LengthUnit {
    fn from(value: String) -> Self {
        LengthUnit::from(value.as_str())
    }
}

impl From<LengthUnit> for String {
    fn from(value: LengthUnit) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for LengthUnit {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(LengthUnit::from(s))
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spacing inserted between adjacent columns and rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gutter {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Gutter {
    pub fn new(value: f64, unit: impl Into<LengthUnit>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    pub fn px(value: f64) -> Self {
        Self::new(value, LengthUnit::Px)
    }
}

impl Default for Gutter {
    fn default() -> Self {
        Self::px(10.0)
    }
}

impl fmt::Display for Gutter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

/// Length expression written to an item or the container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Length {
    Zero,
    Px(f64),
    /// `calc(<px>px + <plus><unit>)`
    PxPlus { px: f64, plus: f64, unit: LengthUnit },
    /// `calc(<percent>% - <minus><unit>)`
    PercentMinus {
        percent: f64,
        minus: f64,
        unit: LengthUnit,
    },
}

impl Length {
    /// Pixel amount plus `gutters` whole gutters.
    pub fn offset(px: f64, gutters: u32, gutter: &Gutter) -> Self {
        if gutters == 0 {
            if px == 0.0 { Length::Zero } else { Length::Px(px) }
        } else {
            Length::PxPlus {
                px,
                plus: gutter.value * f64::from(gutters),
                unit: gutter.unit.clone(),
            }
        }
    }

    /// Width of one column: an equal share of the container minus one gutter.
    pub fn column_width(columns: std::num::NonZeroUsize, gutter: &Gutter) -> Self {
        Length::PercentMinus {
            percent: 100.0 / columns.get() as f64,
            minus: gutter.value,
            unit: gutter.unit.clone(),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Zero => f.write_str("0"),
            Length::Px(px) => write!(f, "{px}px"),
            Length::PxPlus { px, plus, unit } => write!(f, "calc({px}px + {plus}{unit})"),
            Length::PercentMinus {
                percent,
                minus,
                unit,
            } => write!(f, "calc({percent}% - {minus}{unit})"),
        }
    }
}

/// Positioning scheme applied to the container and its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionMode {
    Static,
    Relative,
    Absolute,
}
