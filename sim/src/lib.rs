//! `sim` — Race log producer: tracks, kinematic car, driver policies, export.
//!
//! # Module layout
//! - [`scenarios`] — track centerlines (oval, figure-eight)
//! - [`car`] — kinematic car model
//! - [`driver`] — seeded pursuit drivers for the RL and ES agents
//! - [`replay`] — episode recording and JSON export

pub mod car;
pub mod driver;
pub mod replay;
pub mod scenarios;

pub use car::{Car, CarParams};
pub use driver::{Driver, DriverParams};
pub use replay::{load_race_log, record_pair, record_race, save_race_log, RaceConfig};
pub use scenarios::{Track, TrackKind};
