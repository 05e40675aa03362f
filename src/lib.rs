//! Teleinfo frame decoding
//!
//! Classifies the label/value groups sent by French electricity meters
//! (historical and standard Teleinfo), decodes the Tempo programme byte and
//! turns every sampling cycle into one metering record.

pub mod config;
pub mod models;
pub mod teleinfo;

// Re-export common types for easier access
pub use config::{ConfigHolder, TeleinfoConfig};
pub use models::{DeviceProtocol, MeteringData, Transmission};
pub use teleinfo::{
    classifier::{Evolution, FrameType, Phase, Pricing, TicMode},
    frame::Frame,
    label::Label,
    programme::{ProgrammeCircuit1, ProgrammeCircuit2},
    InvalidFrameError, TeleinfoInput, TeleinfoManager,
};

pub fn get_unix_ts() -> u64 {
    return std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
}
