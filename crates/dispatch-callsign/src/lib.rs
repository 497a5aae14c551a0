//! `dispatch-callsign` — unit call signs and their allocation pools.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`callsign`]   | `CallSign`, `Rank`                                        |
//! | [`phonetic`]   | radio alphabet and number words                           |
//! | [`allocator`]  | `CallSignAllocator` trait, `PoolKey`, `AllocatorSpec`     |
//! | [`numeric`]    | `NumericPool`: banded integers per unit type              |
//! | [`structured`] | `StructuredPool`: division / letter / beat                |
//! | [`error`]      | `CallSignError`, `CallSignResult<T>`                      |
//!
//! # Pool model
//!
//! Every agency owns one allocator.  Inside it, each [`PoolKey`] (a line unit
//! type, or the shared supervisor rank) has a finite queue of candidate
//! numbers shuffled once at construction.  `next` pops the front.  Numbers are
//! never returned: a sign stays retired for the rest of the run even after its
//! unit leaves the roster, so an exhausted key means no more units of that
//! kind can be created in that agency.

pub mod allocator;
pub mod callsign;
pub mod error;
pub mod numeric;
pub mod phonetic;
pub mod structured;


pub use allocator::{AllocatorSpec, CallSignAllocator, PoolKey};
pub use callsign::{CallSign, Rank};
pub use error::{CallSignError, CallSignResult};
pub use numeric::{NumericBands, NumericPool};
pub use structured::{StructuredBeats, StructuredPool};
