//! The `CallSign` value type.

use std::fmt;

use dispatch_core::UnitType;

use crate::phonetic::{letter_word, spoken_digits};

/// Officer or supervisor.  Supervisors draw from their own pool.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rank {
    Officer,
    Supervisor,
}

impl Rank {
    #[inline]
    pub fn from_supervisor(supervisor: bool) -> Rank {
        if supervisor { Rank::Supervisor } else { Rank::Officer }
    }
}

/// An immutable identifier for a unit within its jurisdiction.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallSign {
    /// A single number from a banded range, e.g. `214`.
    Numeric {
        number:     u16,
        unit_type:  UnitType,
        supervisor: bool,
    },
    /// Division, unit letter and beat, e.g. `1-Adam-12`.
    Structured {
        division: u8,
        letter:   char,
        beat:     u8,
    },
}

impl CallSign {
    /// Radio letter for a unit type.  Supervisors always use `L` (Lincoln).
    pub fn letter_for(unit_type: UnitType, supervisor: bool) -> char {
        if supervisor {
            return 'L';
        }
        match unit_type {
            UnitType::Patrol    => 'A',
            UnitType::Traffic   => 'T',
            UnitType::Canine    => 'K',
            UnitType::Detective => 'D',
            UnitType::Engine    => 'E',
            UnitType::Ambulance => 'M',
        }
    }

    /// The pooled number this sign was drawn from (number or beat).
    pub fn number(&self) -> u16 {
        match self {
            CallSign::Numeric { number, .. } => *number,
            CallSign::Structured { beat, .. } => *beat as u16,
        }
    }

    /// Short written form: `214` or `1A12`.
    pub fn display_name(&self) -> String {
        self.to_string()
    }

    /// The form read out over the radio: `two one four` or `1-Adam-12`.
    pub fn radio_name(&self) -> String {
        match self {
            CallSign::Numeric { number, .. } => spoken_digits(*number as u32),
            CallSign::Structured { division, letter, beat } => {
                format!("{division}-{}-{beat}", letter_word(*letter))
            }
        }
    }
}

impl fmt::Display for CallSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallSign::Numeric { number, .. } => write!(f, "{number}"),
            CallSign::Structured { division, letter, beat } => {
                write!(f, "{division}{letter}{beat}")
            }
        }
    }
}
