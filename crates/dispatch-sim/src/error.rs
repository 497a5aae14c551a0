use dispatch_callsign::CallSignError;
use dispatch_core::DispatchError;
use dispatch_gen::GenError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("call-sign configuration: {0}")]
    CallSign(#[from] CallSignError),

    #[error("incident generation: {0}")]
    Gen(#[from] GenError),
}

pub type SimResult<T> = Result<T, SimError>;
