use dispatch_core::UnitType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CallSignError {
    #[error("call-sign band for {0} is empty")]
    EmptyBand(UnitType),

    #[error("supervisor call-sign band is empty")]
    EmptySupervisorBand,

    #[error("call-sign bands overlap: {0}..={1} intersects {2}..={3}")]
    OverlappingBands(u16, u16, u16, u16),

    #[error("division {0} is outside 1..=10")]
    DivisionOutOfRange(u8),

    #[error("beat range {0}..={1} is empty or outside 1..=99")]
    InvalidBeats(u8, u8),
}

pub type CallSignResult<T> = Result<T, CallSignError>;
