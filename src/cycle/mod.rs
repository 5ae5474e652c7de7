//! The per-frame control loop.
//!
//! [`FrameCycle`] wires the stages together once per camera frame:
//! stop check → acquire → battery poll (throttled) → segment → extract →
//! supervise → control → send → overlay → report.
//!
//! Each stage is synchronous and only frame acquisition may block. Apart from
//! the [`crate::supervisor::FlightSupervisor`], the cycle keeps a little
//! bookkeeping across iterations: the processed-cycle counter that drives the
//! battery throttle, the last detected estimate for extractor tie-breaks, the
//! manual command and [`crate::diagnostics::SessionStats`].

mod frame_cycle;
mod stop;

pub use frame_cycle::{CycleIo, CycleOutcome, FrameCycle};
pub use stop::StopHandle;
