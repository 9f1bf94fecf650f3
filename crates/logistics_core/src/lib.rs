pub mod decision;
pub mod distributions;
pub mod entities;
pub mod error;
pub mod event;
pub mod generators;
pub mod matching;
pub mod model;
pub mod routers;
pub mod runner;
pub mod scenario;
pub mod split;
pub mod telemetry;
pub mod transit;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
