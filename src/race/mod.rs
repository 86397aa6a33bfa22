//! Race simulation: characters move along a track at fixed speeds until they reach the finish
//! line, and every tick is composed into one video frame.

/// Per-tick state transition and frame composition.
pub mod advance;
/// Race configuration and participant descriptors.
pub mod config;
/// Run orchestration: termination, drain padding and sink finalization.
pub mod driver;
/// Participant state.
pub mod participant;
/// Static track geometry.
pub mod track;
/// Physical-to-pixel unit conversion.
pub mod units;
