//! Two-level drill-down navigation
//!
//! The controller is a pure state machine: it takes one event, returns the
//! new state and the side effects the host has to carry out. The session
//! is such a host; it runs fetches through the topology cache and forwards
//! everything else to a `MapView`.

pub mod controller;
pub mod interaction;
pub mod session;
pub mod state;

pub use controller::DrilldownController;
pub use interaction::{InteractionMode, PointerCapabilities};
pub use session::DrilldownSession;
pub use state::{DrilldownEvent, DrilldownState, Intent, LevelView, ModalContent, Transition};
