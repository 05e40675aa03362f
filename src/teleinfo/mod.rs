use log::{debug, error, info, warn};
use thiserror::Error;
use tokio::sync::mpsc::{Receiver, Sender};

use crate::{config::TeleinfoConfig, models::Transmission};

pub mod label;
pub mod frame;
pub mod classifier;
pub mod programme;
pub mod converters;
pub mod metering;

use frame::Frame;
use label::Label;

/// Any reason a frame can not be used this cycle.
///
/// Callers handle every variant the same way: drop the frame, log and wait
/// for the next cycle.
#[derive(Error, Debug)]
pub enum InvalidFrameError {
    #[error("Neither ADCO nor ADSC found, unable to detect the TIC mode")]
    MissingTicMode,
    #[error("Neither IINST nor IINST1 found, unable to detect the phase")]
    MissingPhase,
    #[error("The required label '{0}' is missing in frame")]
    MissingLabel(Label),
    #[error("The option tarif '{0}' is not supported")]
    UnsupportedOptionTarif(String),
    #[error("Programme circuit 1 '{0:02b}' is unknown")]
    UnknownProgrammeCircuit1(u8),
    #[error("Programme character '{0}' is not an 8 bit value")]
    InvalidProgrammeChar(char),
    #[error("The label '{0}' is unknown")]
    UnknownLabel(String),
    #[error("Invalid value '{value}' for label '{label}'")]
    InvalidValue { label: Label, value: String },
}

/// Already tokenized input coming from the serial reader
#[derive(Debug, Clone, PartialEq)]
pub enum TeleinfoInput {
    Group {
        label: String,
        value: String,
        timestamp: Option<String>,
    },
    EndOfFrame,
}

impl TeleinfoInput {
    /// Reads one replay line: `LABEL VALUE [TIMESTAMP]`, a blank line ends the frame.
    /// A historical checksum in the third position is dropped by the manager.
    /// Tab separated lines keep empty fields, which standard mode needs for DATE.
    pub fn from_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Some(TeleinfoInput::EndOfFrame);
        }

        let tokens: Vec<&str> = if line.contains('\t') {
            line.split('\t').collect()
        } else {
            line.split_whitespace().collect()
        };

        match tokens.as_slice() {
            [label, value] => Some(TeleinfoInput::Group {
                label: label.to_string(),
                value: value.to_string(),
                timestamp: None,
            }),
            [label, value, timestamp] => Some(TeleinfoInput::Group {
                label: label.to_string(),
                value: value.to_string(),
                timestamp: Some(timestamp.to_string()),
            }),
            _ => {
                warn!("Ignoring malformed group line '{line}'");
                None
            }
        }
    }
}

pub struct TeleinfoManager {
    sender: Sender<Transmission>,
    config: TeleinfoConfig,
    frame: Frame,
    discard_reason: Option<InvalidFrameError>,
}

impl TeleinfoManager {
    pub fn new(sender: Sender<Transmission>, config: TeleinfoConfig) -> Self {
        Self {
            sender,
            config,
            frame: Frame::new(),
            discard_reason: None,
        }
    }

    pub async fn start_thread(&mut self, mut receiver: Receiver<TeleinfoInput>) {
        info!("Starting Teleinfo thread for {}", self.config.name);

        while let Some(input) = receiver.recv().await {
            if let Some(transmission) = self.handle_input(input) {
                if let Err(e) = self.sender.send(transmission).await {
                    error!("Failed to send Teleinfo data: {}", e);
                    return;
                }
            }
        }

        info!("Teleinfo input closed, stopping {}", self.config.name);
    }

    /// Feeds one group into the current frame. Returns what has to be sent
    /// downstream once the end of the frame is reached.
    pub fn handle_input(&mut self, input: TeleinfoInput) -> Option<Transmission> {
        match input {
            TeleinfoInput::Group { label, value, timestamp } => {
                match Label::from_str(&label) {
                    Some(l) => {
                        self.frame.put(l, value);
                        /* On historical lines the third token is the checksum */
                        match timestamp {
                            Some(t) if l.has_timestamp() => self.frame.put_timestamp(l, t),
                            Some(t) => debug!("Ignoring '{t}' after {l}, label carries no timestamp"),
                            None => {}
                        }
                    }
                    None => {
                        warn!("Unknown label '{label}', the current frame will be discarded");
                        if self.discard_reason.is_none() {
                            self.discard_reason = Some(InvalidFrameError::UnknownLabel(label));
                        }
                    }
                }
                None
            }
            TeleinfoInput::EndOfFrame => self.finish_frame(),
        }
    }

    fn finish_frame(&mut self) -> Option<Transmission> {
        if self.frame.is_empty() && self.discard_reason.is_none() {
            debug!("Empty frame, nothing to do");
            return None;
        }

        let result = match self.discard_reason.take() {
            Some(e) => Err(e),
            None => metering::build_metering_data(&self.frame, &self.config),
        };

        let transmission = match result {
            Ok(mr) => {
                debug!("Frame of {} decoded", mr.meter_name);
                Transmission::Metering(mr)
            }
            Err(e) => {
                let meter_name = self
                    .frame
                    .get(Label::ADCO)
                    .or(self.frame.get(Label::ADSC))
                    .unwrap_or(self.config.name.as_str())
                    .to_string();
                error!("Discarding Teleinfo frame of {meter_name}: {e}");
                Transmission::Discarded { meter_name, reason: e.to_string() }
            }
        };

        self.frame.clear();
        Some(transmission)
    }
}
