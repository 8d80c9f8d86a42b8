use serde::Deserialize;
use tracing::warn;

use crate::error::Result;

use super::record::Record;

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawRecord {
    id: i64,
    #[serde(rename = "Pregnancies")]
    pregnancies: f32,
    #[serde(rename = "Glucose")]
    glucose: f32,
    #[serde(rename = "BloodPressure")]
    blood_pressure: f32,
    #[serde(rename = "SkinThickness")]
    skin_thickness: f32,
    #[serde(rename = "Insulin")]
    insulin: f32,
    #[serde(rename = "BMI")]
    bmi: f32,
    #[serde(rename = "DiabetesPedigreeFunction")]
    diabetes_pedigree: f32,
    #[serde(rename = "Age")]
    age: f32,
    #[serde(rename = "Outcome")]
    outcome: f32,
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        Self {
            id: raw.id,
            pregnancies: raw.pregnancies,
            glucose: raw.glucose,
            blood_pressure: raw.blood_pressure,
            skin_thickness: raw.skin_thickness,
            insulin: raw.insulin,
            bmi: raw.bmi,
            diabetes_pedigree: raw.diabetes_pedigree,
            age: raw.age,
            outcome: raw.outcome,
        }
    }
}

pub(super) fn parse_records(raw: &str) -> Result<Vec<Record>> {
    let parsed: Vec<RawRecord> = serde_json::from_str(raw)?;

    let records = parsed.into_iter().map(Record::from).collect::<Vec<_>>();
    let odd_outcomes = records
        .iter()
        .filter(|record| record.outcome != 0.0 && record.outcome != 1.0)
        .count();
    if odd_outcomes > 0 {
        warn!(odd_outcomes, "records with a non-binary outcome will not count toward either bar");
    }

    Ok(records)
}
