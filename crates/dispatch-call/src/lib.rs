//! `dispatch-call` — incidents and the calls dispatchers work.
//!
//! An [`EventRecord`] is one generated incident.  When it is reported, the
//! coordinator splits it into one [`CallRecord`] per responding service
//! sector, each owned by a single agency.  Both records track their own
//! responders through [`Attachments`]; closing an event cascades to its calls.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`scenario`] | `ScenarioTemplate`, `DispatchDirective`                  |
//! | [`location`] | `Location`, `LocationKind`, `LocationFilter`             |
//! | [`attach`]   | `Attachments` (primary + attached responders)            |
//! | [`event`]    | `EventRecord`, `EventStatus`, `CloseFlag`                |
//! | [`call`]     | `CallRecord`, `CallStatus`                               |
//! | [`order`]    | ranking of competing calls for one responder             |

pub mod attach;
pub mod call;
pub mod event;
pub mod location;
pub mod order;
pub mod scenario;


pub use attach::Attachments;
pub use call::{CallRecord, CallStatus};
pub use event::{CloseFlag, EventRecord, EventStatus};
pub use location::{Location, LocationFilter, LocationKind};
pub use order::{compare_for_unit, rank_for_unit};
pub use scenario::{DispatchDirective, ScenarioTemplate};
