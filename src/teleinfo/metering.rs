use log::debug;
use serde_json::Value;
use uuid::Uuid;

use super::{
    classifier::{Pricing, TicMode},
    converters::convert_value,
    frame::Frame,
    label::Label,
    InvalidFrameError,
};
use crate::{config::TeleinfoConfig, get_unix_ts, models::{DeviceProtocol, MeteringData}};

fn field_name(label: Label) -> String {
    return label.as_str().to_lowercase();
}

/// Classifies the frame and converts all of its values into one metering record
pub fn build_metering_data(frame: &Frame, config: &TeleinfoConfig) -> Result<MeteringData, InvalidFrameError> {
    let frame_type = frame.get_type()?;
    if config.check_required_labels {
        frame_type.check_required_labels(frame)?;
    }

    let mut mr = MeteringData::new();
    let address = match frame.get_tic_mode()? {
        TicMode::Historical => {
            mr.protocol = DeviceProtocol::TeleinfoHistorical;
            frame.get(Label::ADCO)
        }
        TicMode::Standard => {
            mr.protocol = DeviceProtocol::TeleinfoStandard;
            frame.get(Label::ADSC)
        }
    };

    let now = get_unix_ts();
    mr.id = Uuid::new_v4().to_string();
    mr.tenant = config.tenant.clone();
    mr.meter_name = address.unwrap_or_default().to_string();
    mr.transmission_time = now;
    /* Standard meters tell us when the frame was sampled, in local time */
    mr.metered_time = frame
        .get_as_local_date_time(Label::DATE)
        .and_then(|dt| u64::try_from(dt.timestamp()).ok())
        .unwrap_or(now);

    for label in frame.labels() {
        let raw = frame.get(label).unwrap_or_default();
        let key = field_name(label);

        if label.has_timestamp() {
            let date_time = frame.get_as_date_time(label);
            if !date_time.is_empty() {
                mr.metered_values.insert(format!("{key}_date_time"), Value::from(date_time));
            }
        }
        mr.metered_values.insert(key, convert_value(label, raw)?);
    }

    mr.metered_values.insert("frame_type".to_string(), Value::from(frame_type.as_str()));
    mr.metered_values.insert(
        "device_type".to_string(),
        frame_type.device_type().map(Value::from).unwrap_or(Value::Null),
    );

    if frame_type.pricing() == Some(Pricing::Tempo) {
        let circuit_1 = frame.get_programme_circuit_1()?;
        let circuit_2 = frame.get_programme_circuit_2()?;
        mr.metered_values.insert("programme_circuit_1".to_string(), Value::from(format!("{circuit_1:?}")));
        mr.metered_values.insert("programme_circuit_2".to_string(), Value::from(format!("{circuit_2:?}")));
    }

    debug!("Built {} values for {} ({})", mr.metered_values.len(), mr.meter_name, frame_type);
    Ok(mr)
}
