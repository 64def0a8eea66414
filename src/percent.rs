//! Percentage value type
//!
//! Stores a decimal fraction and converts to and from a percentage.

use core::fmt;

/// A ratio stored as a decimal fraction (`0.25` is 25%).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Percent(f64);

impl Percent {
    /// Create from a percentage value (0 to 100).
    pub fn from_percentage(percentage: f64) -> Self {
        Self(percentage / 100.0)
    }

    /// Create from a decimal value (0.0 to 1.0).
    pub const fn from_decimal(decimal: f64) -> Self {
        Self(decimal)
    }

    /// The stored fraction (0.0 to 1.0).
    pub const fn as_decimal(self) -> f64 {
        self.0
    }

    /// The fraction scaled to a percentage (0 to 100).
    pub fn as_percentage(self) -> f64 {
        self.0 * 100.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.as_percentage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_conversions() {
        let half = Percent::from_percentage(50.0);
        assert_eq!(half.as_decimal(), 0.5);
        assert_eq!(half.as_percentage(), 50.0);

        let quarter = Percent::from_decimal(0.25);
        assert_eq!(quarter.as_decimal(), 0.25);
        assert_eq!(quarter.as_percentage(), 25.0);
        assert!(quarter < half);
    }

    #[test]
    fn test_percent_display() {
        let value = Percent::from_decimal(0.125);
        assert_eq!(alloc::format!("{}", value), "12.50%");
    }
}
