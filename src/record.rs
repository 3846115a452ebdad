// Row normalization: raw string cells -> typed respondent records

use crate::data::{RawRow, RawTable};
use log::debug;
use std::fmt;

pub const COL_QUALITY: &str = "Quality of Sleep";
pub const COL_DURATION: &str = "Sleep Duration";
pub const COL_DISORDER: &str = "Sleep Disorder";
pub const COL_STRESS: &str = "Stress Level";
pub const COL_GENDER: &str = "Gender";
pub const COL_OCCUPATION: &str = "Occupation";
pub const COL_PERSON_ID: &str = "Person ID";
pub const COL_PERSON_ID_ALT: &str = "PersonID";
pub const COL_BMI: &str = "BMI Category";

pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SleepDisorder {
    None,
    Insomnia,
    SleepApnea,
    Other(String),
}

impl SleepDisorder {
    /// Stacking order used by the quality chart.
    pub const CHARTED: [SleepDisorder; 3] = [
        SleepDisorder::None,
        SleepDisorder::Insomnia,
        SleepDisorder::SleepApnea,
    ];

    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("None") => SleepDisorder::None,
            Some("Insomnia") => SleepDisorder::Insomnia,
            Some("Sleep Apnea") => SleepDisorder::SleepApnea,
            Some(other) => SleepDisorder::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SleepDisorder::None => "None",
            SleepDisorder::Insomnia => "Insomnia",
            SleepDisorder::SleepApnea => "Sleep Apnea",
            SleepDisorder::Other(s) => s,
        }
    }
}

impl fmt::Display for SleepDisorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BmiCategory {
    Normal,
    Overweight,
    Obese,
    Other(String),
}

impl BmiCategory {
    /// "Normal Weight" and "Normal" are the same category.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("Normal") | Some("Normal Weight") => BmiCategory::Normal,
            Some("Overweight") => BmiCategory::Overweight,
            Some("Obese") => BmiCategory::Obese,
            None | Some("") => BmiCategory::Other(UNKNOWN.to_string()),
            Some(other) => BmiCategory::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
            BmiCategory::Other(s) => s,
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One survey respondent.
#[derive(Debug, Clone, PartialEq)]
pub struct SleepRecord {
    pub person_id: Option<String>,
    pub gender: Option<String>,
    pub occupation: String,
    pub sleep_duration: Option<f64>,
    pub quality: Option<u8>,
    pub stress: Option<u8>,
    pub bmi: BmiCategory,
    pub disorder: SleepDisorder,
}

impl Default for SleepRecord {
    fn default() -> Self {
        Self {
            person_id: None,
            gender: None,
            occupation: UNKNOWN.to_string(),
            sleep_duration: None,
            quality: None,
            stress: None,
            bmi: BmiCategory::Other(UNKNOWN.to_string()),
            disorder: SleepDisorder::None,
        }
    }
}

/// Parse a real number; blanks, garbage and non-finite values are absent.
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an integral score such as "7" or "7.0".
pub fn parse_score(raw: Option<&str>) -> Option<u8> {
    let v = parse_number(raw)?;
    if v.fract() != 0.0 || v < 0.0 || v > u8::MAX as f64 {
        return None;
    }
    Some(v as u8)
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

pub fn normalize(row: &RawRow<'_>) -> SleepRecord {
    let person_id = non_empty(row.get(COL_PERSON_ID)).or_else(|| non_empty(row.get(COL_PERSON_ID_ALT)));

    SleepRecord {
        person_id,
        gender: non_empty(row.get(COL_GENDER)),
        occupation: non_empty(row.get(COL_OCCUPATION)).unwrap_or_else(|| UNKNOWN.to_string()),
        sleep_duration: parse_number(row.get(COL_DURATION)),
        quality: parse_score(row.get(COL_QUALITY)),
        stress: parse_score(row.get(COL_STRESS)),
        bmi: BmiCategory::parse(row.get(COL_BMI)),
        disorder: SleepDisorder::parse(row.get(COL_DISORDER)),
    }
}

pub fn normalize_table(table: &RawTable) -> Vec<SleepRecord> {
    let records: Vec<SleepRecord> = table.rows().map(|row| normalize(&row)).collect();

    let unscored = records.iter().filter(|r| r.quality.is_none()).count();
    if unscored > 0 {
        debug!("{} of {} rows have no usable sleep quality score", unscored, records.len());
    }
    records
}
