//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host with a hand-driven
//! clock; no real LEDs or dashboards are required.

mod control_loop_tests;
mod lifecycle_tests;
mod mock_hw;
