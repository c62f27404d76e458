use super::{device::TemplateNumber, error::KioskError};
use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike};
use serde::Deserialize;

/// Boarding starts this many minutes before departure.
pub const BOARDING_LEAD_MINUTES: i64 = 30;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

// `datetime-local` inputs send minutes, some browsers also send seconds.
const FORM_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct BoardingPass {
    pub verified_template_number: TemplateNumber,
    pub name: String,
    pub from_long: String,
    pub from_short: String,
    pub to_long: String,
    pub to_short: String,
    pub flight: String,
    pub time: NaiveDateTime,
    pub gate: String,
    pub seat: String,
}

impl BoardingPass {
    #[must_use]
    pub fn boarding_time(&self) -> NaiveDateTime {
        boarding_time(self.time)
    }
}

#[must_use]
pub fn boarding_time(departure: NaiveDateTime) -> NaiveDateTime {
    departure - TimeDelta::minutes(BOARDING_LEAD_MINUTES)
}

/// Date and clock fields shown on the printed pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassTimes {
    pub month: &'static str,
    pub day: String,
    pub year: String,
    pub hour: String,
    pub minute: String,
    pub boarding_hour: String,
    pub boarding_minute: String,
}

impl PassTimes {
    #[must_use]
    pub fn new(departure: NaiveDateTime) -> Self {
        let boarding = boarding_time(departure);
        // month0() is always 0..=11
        let month = MONTHS[departure.month0() as usize];

        Self {
            month,
            day: format!("{:02}", departure.day()),
            year: departure.year().to_string(),
            hour: format!("{:02}", departure.hour()),
            minute: format!("{:02}", departure.minute()),
            boarding_hour: format!("{:02}", boarding.hour()),
            boarding_minute: format!("{:02}", boarding.minute()),
        }
    }
}

/// Registration form posted by staff after enrolling a template.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SubmitForm {
    #[serde(rename = "template-number-input", default)]
    pub template_number: String,
    #[serde(rename = "name-input", default)]
    pub name: String,
    #[serde(rename = "from-long-input", default)]
    pub from_long: String,
    #[serde(rename = "from-short-input", default)]
    pub from_short: String,
    #[serde(rename = "to-long-input", default)]
    pub to_long: String,
    #[serde(rename = "to-short-input", default)]
    pub to_short: String,
    #[serde(rename = "flight-input", default)]
    pub flight: String,
    #[serde(rename = "time-input", default)]
    pub time: String,
    #[serde(rename = "gate-input", default)]
    pub gate: String,
    #[serde(rename = "seat-input", default)]
    pub seat: String,
}

impl TryFrom<SubmitForm> for BoardingPass {
    type Error = KioskError;

    fn try_from(form: SubmitForm) -> Result<Self, Self::Error> {
        let verified_template_number = form
            .template_number
            .trim()
            .parse::<TemplateNumber>()
            .map_err(|_| KioskError::InvalidForm("template-number-input"))?;

        let time = parse_form_time(&form.time)
            .ok_or(KioskError::InvalidForm("time-input"))?;

        Ok(Self {
            verified_template_number,
            name: form.name,
            from_long: form.from_long,
            from_short: form.from_short,
            to_long: form.to_long,
            to_short: form.to_short,
            flight: form.flight,
            time,
            gate: form.gate,
            seat: form.seat,
        })
    }
}

fn parse_form_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    FORM_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}
