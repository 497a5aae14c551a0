//! Unit tests for dispatch-core primitives.

#[cfg(test)]
mod ids {
    use crate::{CallId, IdSequence, UnitId, ZoneId};

    #[test]
    fn index_roundtrip() {
        let id = UnitId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(UnitId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn narrow_ids_reject_overflow() {
        assert!(ZoneId::try_from(70_000usize).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(CallId(7).to_string(), "CallId(7)");
    }

    #[test]
    fn sequence_is_monotonic() {
        let mut seq: IdSequence<CallId> = IdSequence::new();
        assert_eq!(seq.next_id(), CallId(0));
        assert_eq!(seq.next_id(), CallId(1));
        assert_eq!(seq.issued(), 2);

        let mut offset: IdSequence<CallId> = IdSequence::starting_at(100);
        assert_eq!(offset.next_id(), CallId(100));
    }
}

#[cfg(test)]
mod geo {
    use crate::Position;

    #[test]
    fn distance_ignores_height() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 100.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-5);
        assert!((a.distance_sq(b) - 25.0).abs() < 1e-4);
    }
}

#[cfg(test)]
mod period {
    use crate::{ShiftRotation, TimePeriod};

    #[test]
    fn period_boundaries() {
        assert_eq!(TimePeriod::from_hour(0), TimePeriod::Night);
        assert_eq!(TimePeriod::from_hour(5), TimePeriod::Night);
        assert_eq!(TimePeriod::from_hour(6), TimePeriod::Morning);
        assert_eq!(TimePeriod::from_hour(12), TimePeriod::Day);
        assert_eq!(TimePeriod::from_hour(23), TimePeriod::Evening);
        assert_eq!(TimePeriod::Evening.end_hour(), 24);
    }

    #[test]
    fn shift_boundaries() {
        assert_eq!(ShiftRotation::at_hour(6), ShiftRotation::Day);
        assert_eq!(ShiftRotation::at_hour(13), ShiftRotation::Day);
        assert_eq!(ShiftRotation::at_hour(14), ShiftRotation::Swing);
        assert_eq!(ShiftRotation::at_hour(22), ShiftRotation::Night);
        assert_eq!(ShiftRotation::at_hour(3), ShiftRotation::Night);
        assert_eq!(ShiftRotation::Night.next(), ShiftRotation::Day);
    }
}

#[cfg(test)]
mod kinds {
    use crate::{AgencyKind, Priority, ServiceSector, UnitType};

    #[test]
    fn priority_order() {
        assert!(Priority::Immediate.outranks(Priority::Routine));
        assert!(!Priority::Routine.outranks(Priority::Routine));
        assert_eq!(Priority::from_number(3), Some(Priority::Expedited));
        assert_eq!(Priority::from_number(9), None);
        assert_eq!(Priority::Emergency.to_string(), "P2");
    }

    #[test]
    fn escalation_table() {
        use AgencyKind::*;
        assert_eq!(CityPolice.mutual_aid_target(), Some(CountySheriff));
        assert_eq!(CountySheriff.mutual_aid_target(), Some(StatePatrol));
        assert_eq!(StateParks.mutual_aid_target(), Some(StatePatrol));
        assert_eq!(HighwayPatrol.mutual_aid_target(), Some(CountySheriff));
        assert_eq!(StatePatrol.mutual_aid_target(), Some(CountySheriff));
        assert_eq!(Ems.mutual_aid_target(), None);
    }

    #[test]
    fn unit_sectors() {
        assert_eq!(UnitType::Patrol.sector(), ServiceSector::Police);
        assert_eq!(UnitType::Engine.sector(), ServiceSector::Fire);
        assert_eq!(UnitType::Ambulance.sector(), ServiceSector::Medical);
    }
}

#[cfg(test)]
mod table {
    use crate::{Ordinal, PeriodTable, Priority, PriorityTable, TimePeriod};

    #[test]
    fn index_by_variant() {
        let mut t = PeriodTable([1, 2, 3, 4]);
        assert_eq!(t[TimePeriod::Evening], 3);
        t[TimePeriod::Night] = 40;
        assert_eq!(t.0[3], 40);
    }

    #[test]
    fn priority_ordinal_is_number_minus_one() {
        for p in Priority::ALL {
            assert_eq!(p.ordinal(), p.number() as usize - 1);
        }
        let t = PriorityTable::from_fn(|p| p.number());
        assert_eq!(t.0, [1, 2, 3, 4]);
    }

    #[test]
    fn iter_pairs_variants() {
        let t = PeriodTable::from_fn(|p| p.start_hour());
        let collected: Vec<_> = t.iter().map(|(p, h)| (p, *h)).collect();
        assert_eq!(collected[0], (TimePeriod::Morning, 6));
        assert_eq!(collected[3], (TimePeriod::Night, 0));
    }
}

#[cfg(test)]
mod time {
    use std::time::Duration;

    use crate::{ClockSource, DispatchConfig, ShiftRotation, SimClock, Tick, TimePeriod};

    fn minute_clock(start_hour: i64) -> SimClock {
        SimClock::new(start_hour * 3_600, 60, Duration::from_secs(1))
    }

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(3).since(Tick(10)), 0);
    }

    #[test]
    fn time_of_day() {
        let mut clock = minute_clock(11);
        assert_eq!(clock.time_period(), TimePeriod::Morning);
        assert_eq!(clock.shift(), ShiftRotation::Day);
        for _ in 0..60 {
            clock.advance();
        }
        assert_eq!(clock.hour_of_day(), 12);
        assert_eq!(clock.time_period(), TimePeriod::Day);
    }

    #[test]
    fn period_end() {
        let clock = minute_clock(6);
        // Morning ends at 12:00: six hours of one-minute ticks.
        assert_eq!(clock.period_end_tick(), Tick(360));
    }

    #[test]
    fn real_time_conversion() {
        let clock = SimClock::new(0, 60, Duration::from_millis(500));
        assert_eq!(clock.ticks_for_real(Duration::from_secs(20)), 40);
        assert_eq!(clock.ticks_for_real(Duration::ZERO), 1);
        assert!((clock.time_scale() - 120.0).abs() < 1e-9);
        assert_eq!(clock.now(), Tick::ZERO);
    }

    #[test]
    fn display_shows_time_of_day() {
        let mut clock = minute_clock(23);
        for _ in 0..90 {
            clock.advance();
        }
        assert_eq!(clock.to_string(), "T90 (day 1 00:30)");
    }

    #[test]
    fn config_defaults() {
        let cfg = DispatchConfig::default();
        assert_eq!(cfg.end_tick(), Tick(1_440));
        assert_eq!(cfg.make_clock().tick_duration_secs, 60);
    }
}

#[cfg(test)]
mod rng {
    use crate::{SimRng, UnitId, UnitRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = UnitRng::new(12345, UnitId(0));
        let mut r2 = UnitRng::new(12345, UnitId(0));
        for _ in 0..100 {
            let a: f32 = r1.random();
            let b: f32 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_units_differ() {
        let mut r0 = UnitRng::new(1, UnitId(0));
        let mut r1 = UnitRng::new(1, UnitId(1));
        let a: u64 = r0.random();
        let b: u64 = r1.random();
        assert_ne!(a, b);
    }

    #[test]
    fn zero_weight_never_chosen() {
        let mut rng = SimRng::new(7);
        for _ in 0..500 {
            let i = rng.weighted_index(&[0.0, 3.0, 0.0, 1.0]).unwrap();
            assert!(i == 1 || i == 3);
        }
    }

    #[test]
    fn degenerate_weights_yield_none() {
        let mut rng = SimRng::new(7);
        assert_eq!(rng.weighted_index(&[]), None);
        assert_eq!(rng.weighted_index(&[0.0, 0.0]), None);
        assert_eq!(rng.weighted_index(&[1.0, f64::NAN]), None);
    }

    #[test]
    fn choose_weighted_returns_item() {
        let mut rng = SimRng::new(3);
        let items = [("a", 0.0), ("b", 5.0)];
        let picked = rng.choose_weighted(&items, |(_, w)| *w).unwrap();
        assert_eq!(picked.0, "b");
    }
}
