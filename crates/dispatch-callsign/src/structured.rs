//! Structured strategy: `division-letter-beat`, e.g. `1-Adam-12`.
//!
//! One pool per district (agency).  Every line unit type gets the full line
//! beat range (signs still differ by letter); supervisors share one queue
//! under the `L` letter.

use std::ops::RangeInclusive;

use dispatch_core::{SimRng, UnitType};
use tracing::debug;

use crate::allocator::PoolQueues;
use crate::{CallSign, CallSignAllocator, CallSignError, CallSignResult, PoolKey};

const ALL_LINE_TYPES: [UnitType; 6] = [
    UnitType::Patrol,
    UnitType::Traffic,
    UnitType::Canine,
    UnitType::Detective,
    UnitType::Engine,
    UnitType::Ambulance,
];

/// Beat layout for a [`StructuredPool`].
#[derive(Clone, Debug)]
pub struct StructuredBeats {
    /// District division number, 1–10.
    pub division:         u8,
    /// Beats available to line units.  Default 11–98.
    pub line_beats:       RangeInclusive<u8>,
    /// Beats available to supervisors.  Default 1–10.
    pub supervisor_beats: RangeInclusive<u8>,
}

impl StructuredBeats {
    pub fn division(division: u8) -> Self {
        Self {
            division,
            line_beats:       11..=98,
            supervisor_beats: 1..=10,
        }
    }

    fn validate(&self) -> CallSignResult<()> {
        if !(1..=10).contains(&self.division) {
            return Err(CallSignError::DivisionOutOfRange(self.division));
        }
        for beats in [&self.line_beats, &self.supervisor_beats] {
            if beats.is_empty() || *beats.start() == 0 || *beats.end() > 99 {
                return Err(CallSignError::InvalidBeats(*beats.start(), *beats.end()));
            }
        }
        Ok(())
    }
}

/// Division/letter/beat call-sign pool for one district.
#[derive(Debug)]
pub struct StructuredPool {
    division: u8,
    queues:   PoolQueues,
}

impl StructuredPool {
    pub fn new(beats: &StructuredBeats, rng: &mut SimRng) -> CallSignResult<Self> {
        beats.validate()?;
        let mut queues = PoolQueues::default();
        let line: Vec<u16> = beats.line_beats.clone().map(u16::from).collect();
        for unit_type in ALL_LINE_TYPES {
            queues.insert(PoolKey::Line(unit_type), line.clone(), rng);
        }
        queues.insert(
            PoolKey::Supervisor,
            beats.supervisor_beats.clone().map(u16::from).collect(),
            rng,
        );
        Ok(Self { division: beats.division, queues })
    }

    pub fn division(&self) -> u8 {
        self.division
    }
}

impl CallSignAllocator for StructuredPool {
    fn next(&mut self, unit_type: UnitType, supervisor: bool) -> Option<CallSign> {
        let key = PoolKey::new(unit_type, supervisor);
        let Some(beat) = self.queues.pop(key) else {
            debug!(division = self.division, ?key, "structured call-sign pool exhausted");
            return None;
        };
        Some(CallSign::Structured {
            division: self.division,
            letter:   CallSign::letter_for(unit_type, supervisor),
            beat:     beat as u8,
        })
    }

    fn available_beats(&self, unit_type: UnitType, supervisor: bool) -> Vec<u16> {
        self.queues.peek_all(PoolKey::new(unit_type, supervisor))
    }
}
