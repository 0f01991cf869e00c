use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One weekday's opening window, wall-clock local time.
///
/// `close` must be later than `open` within the same day; windows crossing
/// midnight are not supported.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayHours {
    pub is_open: bool,
    #[serde(with = "hhmm")]
    pub open: NaiveTime,
    #[serde(with = "hhmm")]
    pub close: NaiveTime,
}

impl DayHours {
    pub fn closed() -> Self {
        Self {
            is_open: false,
            open: NaiveTime::MIN,
            close: NaiveTime::MIN,
        }
    }
}

/// Seven entries, Monday first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekSchedule(pub [DayHours; 7]);

impl WeekSchedule {
    pub fn for_weekday(&self, weekday: Weekday) -> &DayHours {
        &self.0[weekday.num_days_from_monday() as usize]
    }

    pub fn always_closed() -> Self {
        Self([DayHours::closed(); 7])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    pub hours: WeekSchedule,
}

/// Serde adapter for `HH:MM` wall-clock strings.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
