mod controller;
mod signals;

pub use controller::{Controller, RunReport};
pub use signals::{Pause, Sleep, StopMarker, StopSignal};
