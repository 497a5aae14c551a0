//! Bay County: a synthetic four-zone region with five agencies.
//!
//! ```text
//!   zone 0  Harbor (downtown)      zone 1  Northside
//!   zone 2  Pine Hollow (rural)    zone 3  Interstate corridor
//! ```
//!
//! Harbor City PD covers zones 0–1, the sheriff covers all four, and the
//! state patrol, fire department and EMS work the whole county.

use std::io::Cursor;
use std::sync::Arc;

use anyhow::Result;

use dispatch_call::{DispatchDirective, Location, LocationKind, ScenarioTemplate};
use dispatch_callsign::{AllocatorSpec, NumericBands, StructuredBeats};
use dispatch_core::{
    AgencyId, AgencyKind, CallCategory, LocationId, PeriodTable, Position, Priority, ResponseCode,
    ScenarioId, ServiceSector, ShiftRotation, UnitType, Weather, ZoneId,
};
use dispatch_gen::{load_zones_reader, ZoneProfile};
use dispatch_sim::{AgencySpec, PlayerSpec, StaticZoneDirectory, UnitSpec};

// Calls per hour by period (morning, day, evening, night), then category weights.
const ZONES_CSV: &str = "\
zone_id,name,morning,day,evening,night,traffic,property,violent,disturbance,assistance,emergency\n\
0,Harbor,1.5,2.5,3.0,2.0,3,4,2,4,2,1\n\
1,Northside,0.8,1.2,1.6,1.2,2,4,1,3,2,1\n\
2,Pine Hollow,0.3,0.4,0.5,0.4,1,2,1,1,3,1\n\
3,Interstate,0.6,0.9,0.8,0.5,6,1,1,1,2,1\n\
";

const ZONE_CENTRES: [(u16, f32, f32); 4] = [
    (0, 0.0, 0.0),
    (1, 0.0, 4_000.0),
    (2, 9_000.0, 6_000.0),
    (3, 6_000.0, -3_000.0),
];

pub fn zones() -> Result<Vec<ZoneProfile>> {
    Ok(load_zones_reader(Cursor::new(ZONES_CSV))?)
}

pub fn directory() -> StaticZoneDirectory {
    let mut dir = StaticZoneDirectory::new();
    dir.add_agency(AgencyId(0), vec![ZoneId(0), ZoneId(1)], false);
    dir.add_agency(AgencyId(1), (0..4).map(ZoneId).collect(), false);
    dir.add_agency(AgencyId(2), Vec::new(), true);
    dir.add_agency(AgencyId(3), (0..4).map(ZoneId).collect(), false);
    dir.add_agency(AgencyId(4), (0..4).map(ZoneId).collect(), false);
    ZONE_CENTRES.iter().fold(dir, |dir, &(zone, x, y)| dir.with_centre(ZoneId(zone), Position::flat(x, y)))
}

/// Six spawn points of each kind per zone, scattered around the zone centre.
pub fn locations() -> Vec<Location> {
    const KINDS: [LocationKind; 5] = [
        LocationKind::Street,
        LocationKind::Residence,
        LocationKind::Commercial,
        LocationKind::Highway,
        LocationKind::Park,
    ];
    let mut out = Vec::new();
    for &(zone, cx, cy) in &ZONE_CENTRES {
        for (k, kind) in KINDS.iter().enumerate() {
            for i in 0..6u32 {
                let id = LocationId(out.len() as u32);
                let angle = (i as f32 + k as f32 * 0.4) * std::f32::consts::TAU / 6.0;
                let radius = 300.0 + 250.0 * k as f32;
                let position = Position::flat(cx + radius * angle.cos(), cy + radius * angle.sin());
                let label = format!("{} {} block", 100 * (i + 1), kind);
                out.push(Location::new(id, ZoneId(zone), position, *kind, label));
            }
        }
    }
    out
}

fn directive(units: usize, priority: Priority, code: ResponseCode) -> DispatchDirective {
    DispatchDirective::new(units, priority, code)
}

pub fn templates() -> Vec<Arc<ScenarioTemplate>> {
    use ResponseCode::{Code2, Code3};
    use ServiceSector::{Fire, Medical, Police};

    let night_heavy = PeriodTable([0.5, 0.8, 1.5, 2.0]);
    vec![
        ScenarioTemplate::new(ScenarioId(1), "Injury collision", CallCategory::Traffic, LocationKind::Highway)
            .with_directive(Police, directive(1, Priority::Emergency, Code3))
            .with_directive(Medical, directive(1, Priority::Emergency, Code3))
            .with_expiry(45),
        ScenarioTemplate::new(ScenarioId(2), "Disabled vehicle", CallCategory::Traffic, LocationKind::Street)
            .with_directive(Police, directive(1, Priority::Routine, Code2))
            .with_on_scene_minutes(5..=15)
            .with_expiry(90),
        ScenarioTemplate::new(ScenarioId(3), "Residential burglary", CallCategory::Property, LocationKind::Residence)
            .with_directive(Police, directive(1, Priority::Expedited, Code2))
            .with_acceptance(true)
            .with_expiry(120),
        ScenarioTemplate::new(ScenarioId(4), "Shoplifter in custody", CallCategory::Property, LocationKind::Commercial)
            .with_directive(Police, directive(1, Priority::Expedited, Code2))
            .with_expiry(60),
        ScenarioTemplate::new(ScenarioId(5), "Assault in progress", CallCategory::Violent, LocationKind::Street)
            .with_directive(Police, directive(2, Priority::Immediate, Code3))
            .with_directive(Medical, directive(1, Priority::Emergency, Code3))
            .with_period_weights(night_heavy)
            .with_acceptance(true)
            .with_emergency(true),
        ScenarioTemplate::new(ScenarioId(6), "Loud party", CallCategory::Disturbance, LocationKind::Residence)
            .with_directive(Police, directive(1, Priority::Routine, Code2))
            .with_period_weights(night_heavy)
            .with_expiry(60),
        ScenarioTemplate::new(ScenarioId(7), "Fight in the park", CallCategory::Disturbance, LocationKind::Park)
            .with_directive(Police, directive(2, Priority::Emergency, Code3))
            .with_weather([Weather::Clear, Weather::Overcast]),
        ScenarioTemplate::new(ScenarioId(8), "Welfare check", CallCategory::Assistance, LocationKind::Residence)
            .with_directive(Police, directive(1, Priority::Routine, Code2))
            .with_expiry(180),
        ScenarioTemplate::new(ScenarioId(9), "Structure fire", CallCategory::Emergency, LocationKind::Commercial)
            .with_directive(Fire, directive(2, Priority::Immediate, Code3))
            .with_directive(Medical, directive(1, Priority::Emergency, Code3))
            .with_directive(Police, directive(1, Priority::Emergency, Code3))
            .with_emergency(true)
            .with_on_scene_minutes(30..=60),
    ]
    .into_iter()
    .map(Arc::new)
    .collect()
}

pub fn agencies() -> Vec<AgencySpec> {
    let home = |zone: usize| Position::flat(ZONE_CENTRES[zone].1, ZONE_CENTRES[zone].2);
    let rotations = [ShiftRotation::Day, ShiftRotation::Swing, ShiftRotation::Night];

    let mut city = AgencySpec::new(
        "Harbor City PD",
        AgencyKind::CityPolice,
        AllocatorSpec::Numeric(NumericBands::police()),
    )
    .zones([ZoneId(0), ZoneId(1)]);
    let mut sheriff = AgencySpec::new(
        "Bay County SO",
        AgencyKind::CountySheriff,
        AllocatorSpec::Structured(StructuredBeats::division(4)),
    )
    .zones((0..4).map(ZoneId));
    let mut state = AgencySpec::new(
        "State Patrol Troop C",
        AgencyKind::StatePatrol,
        AllocatorSpec::Structured(StructuredBeats::division(9)),
    )
    .categories([CallCategory::Traffic, CallCategory::Violent, CallCategory::Emergency]);
    let mut fire = AgencySpec::new(
        "Bay County Fire",
        AgencyKind::FireDepartment,
        AllocatorSpec::Numeric(NumericBands::fire_rescue()),
    )
    .zones((0..4).map(ZoneId))
    .categories([CallCategory::Emergency]);
    let mut ems = AgencySpec::new(
        "Bay County EMS",
        AgencyKind::Ems,
        AllocatorSpec::Numeric(NumericBands::fire_rescue()),
    )
    .zones((0..4).map(ZoneId));

    for shift in rotations {
        city = city
            .units(UnitSpec::new(UnitType::Patrol, shift, 4, home(0)))
            .units(UnitSpec::new(UnitType::Patrol, shift, 1, home(0)).supervisors())
            .units(UnitSpec::new(UnitType::Traffic, shift, 1, home(1)));
        sheriff = sheriff
            .units(UnitSpec::new(UnitType::Patrol, shift, 3, home(2)))
            .units(UnitSpec::new(UnitType::Canine, shift, 1, home(2)));
        state = state.units(UnitSpec::new(UnitType::Traffic, shift, 2, home(3)));
        fire = fire.units(UnitSpec::new(UnitType::Engine, shift, 2, home(0)).with_secondary_role(UnitType::Ambulance));
        ems = ems.units(UnitSpec::new(UnitType::Ambulance, shift, 2, home(1)));
    }
    vec![city, sheriff, state, fire, ems]
}

pub fn player() -> PlayerSpec {
    PlayerSpec {
        agency:    AgencyId(0),
        unit_type: UnitType::Patrol,
        position:  Position::flat(ZONE_CENTRES[0].1, ZONE_CENTRES[0].2),
    }
}
