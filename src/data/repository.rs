use std::fs;
use std::path::Path;

use rand::Rng;
use tracing::{debug, error, info};

use crate::error::{ChartError, Result};

use super::parse::parse_records;
use super::record::{Field, Record};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldRange {
    pub min: f32,
    pub max: f32,
}

impl FieldRange {
    pub fn is_degenerate(self) -> bool {
        self.max == self.min
    }

    /// `None` when the range is degenerate.
    pub fn normalize(self, value: f32) -> Option<f32> {
        if self.is_degenerate() {
            return None;
        }
        Some((value - self.min) / (self.max - self.min))
    }
}

/// One record rescaled per field to `[0, 1]` against the dataset-wide ranges.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedSample {
    values: [f32; 10],
    degenerate: [bool; 10],
}

impl NormalizedSample {
    pub fn value(&self, field: Field) -> Result<f32> {
        let index = field.index();
        if self.degenerate[index] {
            Err(ChartError::DegenerateRange(field))
        } else {
            Ok(self.values[index])
        }
    }

    /// Visual scale for a field; degenerate ranges read as zero.
    pub fn scale(&self, field: Field) -> f32 {
        self.value(field).unwrap_or(0.0)
    }

    pub fn is_degenerate(&self, field: Field) -> bool {
        self.degenerate[field.index()]
    }
}

#[derive(Clone, Debug, Default)]
pub struct Dataset {
    records: Vec<Record>,
    ranges: Option<[FieldRange; 10]>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        let ranges = compute_ranges(&records);
        Self { records, ranges }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn range(&self, field: Field) -> Option<FieldRange> {
        self.ranges.map(|ranges| ranges[field.index()])
    }

    pub fn id_range(&self) -> Option<(i64, i64)> {
        let min = self.records.iter().map(|record| record.id).min()?;
        let max = self.records.iter().map(|record| record.id).max()?;
        Some((min, max))
    }

    pub fn normalize(&self, record: &Record) -> NormalizedSample {
        let mut values = [0.0; 10];
        let mut degenerate = [true; 10];

        if let Some(ranges) = &self.ranges {
            for field in Field::ALL {
                let index = field.index();
                if let Some(value) = ranges[index].normalize(record.value(field)) {
                    values[index] = value;
                    degenerate[index] = false;
                }
            }
        }

        NormalizedSample { values, degenerate }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(Record, NormalizedSample)> {
        if self.records.is_empty() {
            return Err(ChartError::EmptyDataset);
        }

        let index = rng.random_range(0..self.records.len());
        let record = self.records[index].clone();
        let normalized = self.normalize(&record);
        debug!(index, id = record.id, "sampled dataset row");
        Ok((record, normalized))
    }

    /// Matching rows in their original order. The subset gets its own ranges.
    pub fn filter<P>(&self, mut predicate: P) -> Dataset
    where
        P: FnMut(&Record) -> bool,
    {
        let records = self
            .records
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect();
        Dataset::new(records)
    }

    pub fn outcome_count(&self, outcome: f32) -> usize {
        self.records
            .iter()
            .filter(|record| record.has_outcome(outcome))
            .count()
    }

    /// Proportion of rows with the given outcome; zero for an empty dataset.
    pub fn outcome_share(&self, outcome: f32) -> f32 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.outcome_count(outcome) as f32 / self.records.len() as f32
    }
}

fn compute_ranges(records: &[Record]) -> Option<[FieldRange; 10]> {
    let first = records.first()?;
    let mut ranges = Field::ALL.map(|field| {
        let value = first.value(field);
        FieldRange {
            min: value,
            max: value,
        }
    });

    for record in &records[1..] {
        for field in Field::ALL {
            let range = &mut ranges[field.index()];
            let value = record.value(field);
            range.min = range.min.min(value);
            range.max = range.max.max(value);
        }
    }

    Some(ranges)
}

/// Holds the loaded dataset. A failed load leaves it empty.
#[derive(Debug, Default)]
pub struct DataRepository {
    dataset: Dataset,
}

impl DataRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_str(&mut self, raw: &str) -> Result<usize> {
        match parse_records(raw) {
            Ok(records) => {
                self.dataset = Dataset::new(records);
                info!(rows = self.dataset.len(), "dataset loaded");
                Ok(self.dataset.len())
            }
            Err(err) => {
                error!(%err, "failed to parse dataset, continuing with no rows");
                self.dataset = Dataset::empty();
                Err(err)
            }
        }
    }

    pub fn load_path(&mut self, path: &Path) -> Result<usize> {
        match fs::read_to_string(path) {
            Ok(raw) => self.load_str(&raw),
            Err(err) => {
                error!(path = %path.display(), %err, "dataset file not found, continuing with no rows");
                self.dataset = Dataset::empty();
                Err(err.into())
            }
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(Record, NormalizedSample)> {
        self.dataset.sample(rng)
    }

    pub fn filter<P>(&self, predicate: P) -> Dataset
    where
        P: FnMut(&Record) -> bool,
    {
        self.dataset.filter(predicate)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    const TWO_ROWS: &str = r#"[
        {"id": 1, "Pregnancies": 6, "Glucose": 148, "BloodPressure": 72, "SkinThickness": 35,
         "Insulin": 0, "BMI": 33.6, "DiabetesPedigreeFunction": 0.627, "Age": 50, "Outcome": 1},
        {"id": 2, "Pregnancies": 1, "Glucose": 85, "BloodPressure": 72, "SkinThickness": 29,
         "Insulin": 0, "BMI": 26.6, "DiabetesPedigreeFunction": 0.351, "Age": 31, "Outcome": 0}
    ]"#;

    fn loaded() -> DataRepository {
        let mut repository = DataRepository::new();
        repository.load_str(TWO_ROWS).expect("fixture parses");
        repository
    }

    #[test]
    fn load_computes_ranges_once() {
        let repository = loaded();
        let dataset = repository.dataset();
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.range(Field::Glucose),
            Some(FieldRange {
                min: 85.0,
                max: 148.0
            })
        );
        assert_eq!(dataset.id_range(), Some((1, 2)));
    }

    #[test]
    fn malformed_payload_leaves_dataset_empty() {
        let mut repository = loaded();
        let result = repository.load_str("{\"not\": \"a list\"}");
        assert!(matches!(result, Err(ChartError::Parse(_))));
        assert!(repository.dataset().is_empty());
    }

    #[test]
    fn missing_file_is_reported_and_tolerated() {
        let mut repository = DataRepository::new();
        let result = repository.load_path(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ChartError::Io(_))));
        assert!(repository.dataset().is_empty());
    }

    #[test]
    fn sampling_an_empty_dataset_fails() {
        let repository = DataRepository::new();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            repository.sample(&mut rng),
            Err(ChartError::EmptyDataset)
        ));
    }

    #[test]
    fn samples_stay_in_unit_range_or_are_flagged() {
        let repository = loaded();
        let mut rng = StdRng::seed_from_u64(42);
        let (min_id, max_id) = repository.dataset().id_range().expect("rows loaded");

        for _ in 0..32 {
            let (record, sample) = repository.sample(&mut rng).expect("rows loaded");
            assert!((min_id..=max_id).contains(&record.id));
            for field in Field::ALL {
                match sample.value(field) {
                    Ok(value) => assert!((0.0..=1.0).contains(&value), "{field} = {value}"),
                    Err(ChartError::DegenerateRange(flagged)) => assert_eq!(flagged, field),
                    Err(other) => panic!("unexpected error {other}"),
                }
            }
        }
    }

    #[test]
    fn degenerate_fields_read_as_zero_scale() {
        let repository = loaded();
        let record = repository.dataset().records()[0].clone();
        let sample = repository.dataset().normalize(&record);

        // Both rows share blood pressure and insulin.
        assert!(sample.is_degenerate(Field::BloodPressure));
        assert!(sample.is_degenerate(Field::Insulin));
        assert_eq!(sample.scale(Field::BloodPressure), 0.0);
        assert_eq!(sample.scale(Field::Glucose), 1.0);
        assert_eq!(sample.scale(Field::Id), 0.0);
        assert!(!sample.is_degenerate(Field::Id));
    }

    #[test]
    fn filter_keeps_insertion_order() {
        let repository = loaded();
        let subset = repository.filter(|record| record.glucose > 50.0);
        let ids = subset.records().iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2]);

        let positives = repository.filter(|record| record.has_outcome(1.0));
        assert_eq!(positives.len(), 1);
        assert!(positives.range(Field::Age).is_some_and(FieldRange::is_degenerate));
    }

    #[test]
    fn outcome_share_splits_rows() {
        let repository = loaded();
        assert_eq!(repository.dataset().outcome_count(1.0), 1);
        assert_eq!(repository.dataset().outcome_share(0.0), 0.5);
        assert_eq!(Dataset::empty().outcome_share(1.0), 0.0);
    }
}
