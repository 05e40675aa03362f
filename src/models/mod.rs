use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeviceProtocol {
    Unknown,
    TeleinfoHistorical,
    TeleinfoStandard,
}

impl DeviceProtocol {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Teleinfo Historical" => Some(DeviceProtocol::TeleinfoHistorical),
            "Teleinfo Standard" => Some(DeviceProtocol::TeleinfoStandard),
            _ => Some(DeviceProtocol::Unknown),
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            DeviceProtocol::Unknown => "Unknown".to_string(),
            DeviceProtocol::TeleinfoHistorical => "Teleinfo Historical".to_string(),
            DeviceProtocol::TeleinfoStandard => "Teleinfo Standard".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransmissionValueType {
    Now,
}

/// One decoded sampling cycle as handed to the consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeteringData {
    pub id: String,
    pub meter_name: String,
    pub tenant: String,
    pub protocol: DeviceProtocol,
    pub transmission_time: u64,
    pub transmission_type: TransmissionValueType,
    pub metered_time: u64,
    pub metered_values: serde_json::Map<String, serde_json::Value>,
}

impl MeteringData {
    pub fn new() -> Self {
        return MeteringData {
            id: "".to_string(),
            tenant: "".to_string(),
            meter_name: "".to_string(),
            protocol: DeviceProtocol::Unknown,
            transmission_time: 0,
            transmission_type: TransmissionValueType::Now,
            metered_time: 0,
            metered_values: serde_json::Map::new(),
        };
    }
}

impl Default for MeteringData {
    fn default() -> Self {
        Self::new()
    }
}

/// What a protocol manager sends downstream
#[derive(Debug)]
pub enum Transmission {
    Metering(MeteringData),
    /* The frame of the last cycle was unusable, the reason is already logged */
    Discarded { meter_name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_strings() {
        for p in [DeviceProtocol::TeleinfoHistorical, DeviceProtocol::TeleinfoStandard] {
            assert_eq!(DeviceProtocol::from_str(&p.to_string()), Some(p));
        }
        assert_eq!(DeviceProtocol::from_str("SML"), Some(DeviceProtocol::Unknown));
    }

    #[test]
    fn test_metering_data_serializes() {
        let mut mr = MeteringData::new();
        mr.meter_name = "031762120162".to_string();
        mr.metered_values.insert("papp".to_string(), 330.into());

        let json = serde_json::to_value(&mr).unwrap();
        assert_eq!(json["meter_name"], "031762120162");
        assert_eq!(json["protocol"], "Unknown");
        assert_eq!(json["metered_values"]["papp"], 330);
    }
}
