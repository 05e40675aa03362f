use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{label::{Label, ValueType}, InvalidFrameError};

/// Tariff period currently running (PTEC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ptec {
    Th,
    Hc,
    Hp,
    Hn,
    Pm,
    Hcjb,
    Hcjw,
    Hcjr,
    Hpjb,
    Hpjw,
    Hpjr,
}

impl Ptec {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "TH.." => Some(Ptec::Th),
            "HC.." => Some(Ptec::Hc),
            "HP.." => Some(Ptec::Hp),
            "HN.." => Some(Ptec::Hn),
            "PM.." => Some(Ptec::Pm),
            "HCJB" => Some(Ptec::Hcjb),
            "HCJW" => Some(Ptec::Hcjw),
            "HCJR" => Some(Ptec::Hcjr),
            "HPJB" => Some(Ptec::Hpjb),
            "HPJW" => Some(Ptec::Hpjw),
            "HPJR" => Some(Ptec::Hpjr),
            _ => None,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            Ptec::Th => "TH".to_string(),
            Ptec::Hc => "HC".to_string(),
            Ptec::Hp => "HP".to_string(),
            Ptec::Hn => "HN".to_string(),
            Ptec::Pm => "PM".to_string(),
            Ptec::Hcjb => "HCJB".to_string(),
            Ptec::Hcjw => "HCJW".to_string(),
            Ptec::Hcjr => "HCJR".to_string(),
            Ptec::Hpjb => "HPJB".to_string(),
            Ptec::Hpjw => "HPJW".to_string(),
            Ptec::Hpjr => "HPJR".to_string(),
        }
    }
}

/// Schedule group of the peak/off-peak option (HHPHC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hhphc {
    A,
    C,
    D,
    E,
    Y,
}

impl Hhphc {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Hhphc::A),
            "C" => Some(Hhphc::C),
            "D" => Some(Hhphc::D),
            "E" => Some(Hhphc::E),
            "Y" => Some(Hhphc::Y),
            _ => None,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            Hhphc::A => "A".to_string(),
            Hhphc::C => "C".to_string(),
            Hhphc::D => "D".to_string(),
            Hhphc::E => "E".to_string(),
            Hhphc::Y => "Y".to_string(),
        }
    }
}

/// Colour of the next day for the Tempo option (DEMAIN)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CouleurDemain {
    Unknown,
    Bleu,
    Blanc,
    Rouge,
}

impl CouleurDemain {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "----" => Some(CouleurDemain::Unknown),
            "BLEU" => Some(CouleurDemain::Bleu),
            "BLAN" => Some(CouleurDemain::Blanc),
            "ROUG" => Some(CouleurDemain::Rouge),
            _ => None,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            CouleurDemain::Unknown => "UNKNOWN".to_string(),
            CouleurDemain::Bleu => "BLUE".to_string(),
            CouleurDemain::Blanc => "WHITE".to_string(),
            CouleurDemain::Rouge => "RED".to_string(),
        }
    }
}

/// Converts the raw value of a label into its typed JSON representation
pub fn convert_value(label: Label, raw: &str) -> Result<Value, InvalidFrameError> {
    let invalid = || InvalidFrameError::InvalidValue {
        label,
        value: raw.to_string(),
    };

    match label.value_type() {
        ValueType::Integer => raw.parse::<i64>().map(Value::from).map_err(|_| invalid()),
        ValueType::Text => Ok(Value::from(raw)),
        ValueType::Ptec => Ptec::from_str(raw).map(|p| Value::from(p.to_string())).ok_or_else(invalid),
        ValueType::Hhphc => Hhphc::from_str(raw).map(|h| Value::from(h.to_string())).ok_or_else(invalid),
        ValueType::CouleurDemain => CouleurDemain::from_str(raw)
            .map(|c| Value::from(c.to_string()))
            .ok_or_else(invalid),
    }
}
