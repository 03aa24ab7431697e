//! Transfer gate
//!
//! A three-state machine (`Normal`, `Restricted`, `Controlled`) consulted on
//! every balance movement, plus the controller address that `Controlled`
//! mode requires as a party and that alone may change the mode.

mod engine;
mod mode;
mod state;

pub use engine::*;
pub use mode::*;
pub use state::*;
