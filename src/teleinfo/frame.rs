use chrono::{DateTime, FixedOffset, NaiveDateTime};
use log::{debug, trace};
use std::collections::HashMap;
use std::num::ParseIntError;

use super::label::Label;

/// Values of one Teleinfo sampling cycle.
///
/// A frame is owned by the reader and reused: it is cleared at the start of
/// every cycle and filled again while the groups arrive. All classification
/// methods only borrow it, so nothing derived from the values is ever cached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    values: HashMap<Label, String>,
    timestamps: HashMap<Label, String>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, label: Label, value: String) {
        trace!("put {label} = {value}");
        self.values.insert(label, value);
    }

    pub fn put_timestamp(&mut self, label: Label, timestamp: String) {
        trace!("put timestamp {label} = {timestamp}");
        self.timestamps.insert(label, timestamp);
    }

    pub fn get(&self, label: Label) -> Option<&str> {
        return self.values.get(&label).map(|v| v.as_str());
    }

    pub fn contains(&self, label: Label) -> bool {
        return self.values.contains_key(&label);
    }

    /// Parses the stored value as a base 10 integer.
    ///
    /// A non numeric value for a numeric label is a bug on the caller side,
    /// so the parse error is handed back instead of being mapped to `None`.
    pub fn get_as_int(&self, label: Label) -> Result<Option<i32>, ParseIntError> {
        match self.values.get(&label) {
            Some(v) => Ok(Some(v.parse::<i32>()?)),
            None => Ok(None),
        }
    }

    pub fn get_timestamp(&self, label: Label) -> Option<&str> {
        return self.timestamps.get(&label).map(|v| v.as_str());
    }

    /// Reformats the raw meter timestamp `SYYMMDDhhmmss` into `20YY-MM-DDThh:mm:ss`.
    ///
    /// The first character (season flag) is dropped. Digits are copied by
    /// position only, there is no calendar check. Returns an empty string
    /// when the label has no timestamp or the timestamp is shorter than 13 bytes.
    pub fn get_as_date_time(&self, label: Label) -> String {
        let timestamp = match self.timestamps.get(&label) {
            Some(t) => t,
            None => return "".to_string(),
        };

        let part = |start: usize, end: usize| timestamp.get(start..end);
        match (part(1, 3), part(3, 5), part(5, 7), part(7, 9), part(9, 11), part(11, 13)) {
            (Some(yy), Some(mm), Some(dd), Some(h), Some(m), Some(s)) => {
                format!("20{yy}-{mm}-{dd}T{h}:{m}:{s}")
            }
            _ => {
                debug!("Timestamp '{timestamp}' of {label} is too short");
                "".to_string()
            }
        }
    }

    /// Same as [`Frame::get_as_date_time`] but checked against the calendar
    pub fn get_as_naive_date_time(&self, label: Label) -> Option<NaiveDateTime> {
        let date_time = self.get_as_date_time(label);
        if date_time.is_empty() {
            return None;
        }
        return NaiveDateTime::parse_from_str(&date_time, "%Y-%m-%dT%H:%M:%S").ok();
    }

    /// Meter local time with the offset given by the season flag:
    /// `E`/`e` is summer time (UTC+2), `H`/`h` winter time (UTC+1).
    /// Any other flag gives `None`.
    pub fn get_as_local_date_time(&self, label: Label) -> Option<DateTime<FixedOffset>> {
        let offset = match self.get_timestamp(label)?.chars().next()? {
            'E' | 'e' => FixedOffset::east_opt(7200)?,
            'H' | 'h' => FixedOffset::east_opt(3600)?,
            s => {
                debug!("Unknown season flag '{s}' in timestamp of {label}");
                return None;
            }
        };
        return self.get_as_naive_date_time(label)?.and_local_timezone(offset).single();
    }

    /// Labels present in this cycle, in a stable order
    pub fn labels(&self) -> Vec<Label> {
        let mut labels: Vec<Label> = self.values.keys().copied().collect();
        labels.sort();
        labels
    }

    pub fn is_empty(&self) -> bool {
        return self.values.is_empty() && self.timestamps.is_empty();
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.timestamps.clear();
    }
}
