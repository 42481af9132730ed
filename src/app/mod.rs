//! Application core: the control loop and its port boundary.
//!
//! The loop drives every scanner once per cycle.  All interaction with
//! clocks, dashboards, and LED hardware happens through **port traits**
//! defined in [`ports`], keeping this layer testable without real devices.

pub mod ports;
pub mod service;
