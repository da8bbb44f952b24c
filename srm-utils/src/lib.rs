//! Shared utility functions for species range mapping crates.

/// Linear distances written the way GIS tools take them, e.g. "5 Miles".
pub mod distance {
    use crate::error::DistanceError;
    use std::fmt;
    use std::str::FromStr;

    /// Buffer distance used when none is given.
    pub const DEFAULT_BUFFER_DISTANCE: &str = "5 Miles";

    /// Supported linear units
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum LinearUnit {
        Meters,
        Kilometers,
        Feet,
        Yards,
        Miles,
        NauticalMiles,
    }

    impl LinearUnit {
        /// Length of one unit in meters (international foot/yard/mile)
        pub fn meters(&self) -> f64 {
            match self {
                LinearUnit::Meters => 1.0,
                LinearUnit::Kilometers => 1000.0,
                LinearUnit::Feet => 0.3048,
                LinearUnit::Yards => 0.9144,
                LinearUnit::Miles => 1609.344,
                LinearUnit::NauticalMiles => 1852.0,
            }
        }

        pub fn name(&self) -> &'static str {
            match self {
                LinearUnit::Meters => "Meters",
                LinearUnit::Kilometers => "Kilometers",
                LinearUnit::Feet => "Feet",
                LinearUnit::Yards => "Yards",
                LinearUnit::Miles => "Miles",
                LinearUnit::NauticalMiles => "NauticalMiles",
            }
        }
    }

    impl FromStr for LinearUnit {
        type Err = DistanceError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let unit = match s.to_ascii_lowercase().as_str() {
                "m" | "meter" | "meters" | "metre" | "metres" => LinearUnit::Meters,
                "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => {
                    LinearUnit::Kilometers
                }
                "ft" | "foot" | "feet" => LinearUnit::Feet,
                "yd" | "yard" | "yards" => LinearUnit::Yards,
                "mi" | "mile" | "miles" => LinearUnit::Miles,
                "nmi" | "nauticalmile" | "nauticalmiles" => LinearUnit::NauticalMiles,
                _ => return Err(DistanceError::UnknownUnit(s.to_string())),
            };
            Ok(unit)
        }
    }

    /// A positive length with its unit.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Distance {
        pub value: f64,
        pub unit: LinearUnit,
    }

    impl Distance {
        pub fn new(value: f64, unit: LinearUnit) -> Result<Self, DistanceError> {
            if !value.is_finite() || value <= 0.0 {
                return Err(DistanceError::NotPositive(value.to_string()));
            }
            Ok(Distance { value, unit })
        }

        pub fn to_meters(&self) -> f64 {
            self.value * self.unit.meters()
        }
    }

    impl Default for Distance {
        fn default() -> Self {
            Distance {
                value: 5.0,
                unit: LinearUnit::Miles,
            }
        }
    }

    impl FromStr for Distance {
        type Err = DistanceError;

        /// Parse "<value> <unit>", e.g. "5 Miles" or "2.5 km".
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let mut parts = s.split_whitespace();
            let (Some(value), Some(unit), None) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(DistanceError::Format(s.to_string()));
            };
            let value: f64 = value
                .parse()
                .map_err(|_| DistanceError::Format(s.to_string()))?;
            Distance::new(value, unit.parse()?)
        }
    }

    impl fmt::Display for Distance {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{} {}", self.value, self.unit.name())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_default_buffer_distance() {
            let distance: Distance = DEFAULT_BUFFER_DISTANCE.parse().unwrap();
            assert_eq!(distance, Distance::default());
            assert!((distance.to_meters() - 8046.72).abs() < 1e-9);
        }

        #[test]
        fn test_parse_units_case_insensitive() {
            assert_eq!(
                "10 MILES".parse::<Distance>().unwrap().unit,
                LinearUnit::Miles
            );
            assert_eq!("2.5 km".parse::<Distance>().unwrap().to_meters(), 2500.0);
            assert_eq!(
                "100 Feet".parse::<Distance>().unwrap().unit,
                LinearUnit::Feet
            );
            assert_eq!(
                "1 NauticalMiles".parse::<Distance>().unwrap().to_meters(),
                1852.0
            );
        }

        #[test]
        fn test_parse_rejects_bad_input() {
            assert!(matches!(
                "5".parse::<Distance>(),
                Err(DistanceError::Format(_))
            ));
            assert!(matches!(
                "five Miles".parse::<Distance>(),
                Err(DistanceError::Format(_))
            ));
            assert!(matches!(
                "5 Furlongs".parse::<Distance>(),
                Err(DistanceError::UnknownUnit(_))
            ));
            assert!(matches!(
                "-1 Miles".parse::<Distance>(),
                Err(DistanceError::NotPositive(_))
            ));
            assert!("0 Meters".parse::<Distance>().is_err());
        }

        #[test]
        fn test_display() {
            let distance: Distance = "10 mi".parse().unwrap();
            assert_eq!(distance.to_string(), "10 Miles");
        }
    }
}

/// Error types
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum DistanceError {
        #[error("expected \"<value> <unit>\", got \"{0}\"")]
        Format(String),

        #[error("unknown linear unit: {0}")]
        UnknownUnit(String),

        #[error("distance must be positive, got {0}")]
        NotPositive(String),
    }
}
