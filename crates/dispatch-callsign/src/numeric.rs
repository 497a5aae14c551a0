//! Numeric strategy: one integer band per line unit type plus a shared
//! supervisor band.

use std::ops::RangeInclusive;

use dispatch_core::{SimRng, UnitType};
use tracing::debug;

use crate::allocator::PoolQueues;
use crate::{CallSign, CallSignAllocator, CallSignError, CallSignResult, PoolKey};

/// Band layout for a [`NumericPool`].
#[derive(Clone, Debug)]
pub struct NumericBands {
    /// One band per line unit type the agency fields.
    pub line:       Vec<(UnitType, RangeInclusive<u16>)>,
    /// Shared by supervisors of every unit type.
    pub supervisor: RangeInclusive<u16>,
}

impl NumericBands {
    /// Default police layout: patrol 100–399, traffic 400–499, canine
    /// 500–549, detective 600–699, supervisors 10–99.
    pub fn police() -> Self {
        Self {
            line: vec![
                (UnitType::Patrol,    100..=399),
                (UnitType::Traffic,   400..=499),
                (UnitType::Canine,    500..=549),
                (UnitType::Detective, 600..=699),
            ],
            supervisor: 10..=99,
        }
    }

    /// Default fire/EMS layout: engines 1–60, ambulances 61–99, chiefs 100–109.
    pub fn fire_rescue() -> Self {
        Self {
            line: vec![
                (UnitType::Engine,    1..=60),
                (UnitType::Ambulance, 61..=99),
            ],
            supervisor: 100..=109,
        }
    }

    fn validate(&self) -> CallSignResult<()> {
        if self.supervisor.is_empty() {
            return Err(CallSignError::EmptySupervisorBand);
        }
        for (unit_type, band) in &self.line {
            if band.is_empty() {
                return Err(CallSignError::EmptyBand(*unit_type));
            }
        }
        let mut all: Vec<&RangeInclusive<u16>> = self.line.iter().map(|(_, b)| b).collect();
        all.push(&self.supervisor);
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                if a.start() <= b.end() && b.start() <= a.end() {
                    return Err(CallSignError::OverlappingBands(
                        *a.start(), *a.end(), *b.start(), *b.end(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Banded-integer call-sign pool.
#[derive(Debug)]
pub struct NumericPool {
    queues: PoolQueues,
}

impl NumericPool {
    pub fn new(bands: &NumericBands, rng: &mut SimRng) -> CallSignResult<Self> {
        bands.validate()?;
        let mut queues = PoolQueues::default();
        for (unit_type, band) in &bands.line {
            queues.insert(PoolKey::Line(*unit_type), band.clone().collect(), rng);
        }
        queues.insert(PoolKey::Supervisor, bands.supervisor.clone().collect(), rng);
        Ok(Self { queues })
    }
}

impl CallSignAllocator for NumericPool {
    fn next(&mut self, unit_type: UnitType, supervisor: bool) -> Option<CallSign> {
        let key = PoolKey::new(unit_type, supervisor);
        let Some(number) = self.queues.pop(key) else {
            debug!(?key, "numeric call-sign pool exhausted");
            return None;
        };
        Some(CallSign::Numeric { number, unit_type, supervisor })
    }

    fn available_beats(&self, unit_type: UnitType, supervisor: bool) -> Vec<u16> {
        self.queues.peek_all(PoolKey::new(unit_type, supervisor))
    }
}
