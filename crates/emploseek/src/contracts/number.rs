use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

const PREFIX: &str = "CTR";
const SERIAL_SPACE: u32 = 100_000;

/// Human-presentable contract identifier, `CTR-<year>-<5 digit serial>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractNumber(String);

impl ContractNumber {
    /// Build a number from its parts. Serials outside the 5 digit space wrap.
    pub fn compose(year: i32, serial: u32) -> Self {
        Self(format!("{PREFIX}-{year:04}-{:05}", serial % SERIAL_SPACE))
    }

    /// Wrap a caller-supplied value without checking its shape.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the value has the `CTR-YYYY-NNNNN` shape.
    pub fn is_well_formed(&self) -> bool {
        let mut parts = self.0.split('-');
        let (Some(prefix), Some(year), Some(serial), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return false;
        };

        prefix == PREFIX
            && year.len() == 4
            && year.bytes().all(|b| b.is_ascii_digit())
            && serial.len() == 5
            && serial.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn year(&self) -> Option<i32> {
        if !self.is_well_formed() {
            return None;
        }
        self.0.get(4..8).and_then(|year| year.parse().ok())
    }
}

impl fmt::Display for ContractNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of candidate contract numbers. Uniqueness is enforced by the store,
/// so implementations only need to spread candidates across the serial space.
pub trait ContractNumberGenerator: Send + Sync {
    fn generate(&self, year: i32) -> ContractNumber;
}

/// Draws the serial uniformly from `[0, 100000)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomContractNumbers;

impl ContractNumberGenerator for RandomContractNumbers {
    fn generate(&self, year: i32) -> ContractNumber {
        let serial = rand::thread_rng().gen_range(0..SERIAL_SPACE);
        ContractNumber::compose(year, serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_zero_pads_serial() {
        assert_eq!(ContractNumber::compose(2024, 4821).as_str(), "CTR-2024-04821");
        assert_eq!(ContractNumber::compose(2024, 0).as_str(), "CTR-2024-00000");
        assert_eq!(ContractNumber::compose(2024, 99_999).as_str(), "CTR-2024-99999");
    }

    #[test]
    fn random_numbers_match_pattern_for_requested_year() {
        let generator = RandomContractNumbers;
        for _ in 0..200 {
            let number = generator.generate(2026);
            assert!(number.is_well_formed(), "unexpected shape: {number}");
            assert_eq!(number.year(), Some(2026));
        }
    }

    #[test]
    fn well_formed_rejects_other_shapes() {
        for raw in [
            "CTR-2024-4821",
            "CTR-24-04821",
            "ctr-2024-04821",
            "CTR-2024-04821-1",
            "CTR-2024-0482a",
            "",
        ] {
            assert!(
                !ContractNumber::from_raw(raw).is_well_formed(),
                "{raw} should be rejected"
            );
        }
        assert_eq!(ContractNumber::from_raw("CTR-2O24-04821").year(), None);
    }
}
