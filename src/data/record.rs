use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    Bmi,
    DiabetesPedigree,
    Age,
    Outcome,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Id,
        Field::Pregnancies,
        Field::Glucose,
        Field::BloodPressure,
        Field::SkinThickness,
        Field::Insulin,
        Field::Bmi,
        Field::DiabetesPedigree,
        Field::Age,
        Field::Outcome,
    ];

    /// The eight measurements between the id and the outcome, in chain order.
    pub const FEATURES: [Field; 8] = [
        Field::Pregnancies,
        Field::Glucose,
        Field::BloodPressure,
        Field::SkinThickness,
        Field::Insulin,
        Field::Bmi,
        Field::DiabetesPedigree,
        Field::Age,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::Id => 0,
            Self::Pregnancies => 1,
            Self::Glucose => 2,
            Self::BloodPressure => 3,
            Self::SkinThickness => 4,
            Self::Insulin => 5,
            Self::Bmi => 6,
            Self::DiabetesPedigree => 7,
            Self::Age => 8,
            Self::Outcome => 9,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Pregnancies => "Pregnancies",
            Self::Glucose => "Glucose",
            Self::BloodPressure => "BloodPressure",
            Self::SkinThickness => "SkinThickness",
            Self::Insulin => "Insulin",
            Self::Bmi => "BMI",
            Self::DiabetesPedigree => "DiabetesPedigreeFunction",
            Self::Age => "Age",
            Self::Outcome => "Outcome",
        }
    }

    /// Letter drawn for this field in glyph rows. The outcome uses a face instead,
    /// see [`Record::outcome_glyph`].
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Id => "i",
            Self::Pregnancies => "P",
            Self::Glucose => "G",
            Self::BloodPressure => "b",
            Self::SkinThickness => "S",
            Self::Insulin => "I",
            Self::Bmi => "B",
            Self::DiabetesPedigree => "D",
            Self::Age => "A",
            Self::Outcome => "O",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const SAD_FACE: &str = "☹︎";
pub const HAPPY_FACE: &str = "☻";

#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub id: i64,
    pub pregnancies: f32,
    pub glucose: f32,
    pub blood_pressure: f32,
    pub skin_thickness: f32,
    pub insulin: f32,
    pub bmi: f32,
    pub diabetes_pedigree: f32,
    pub age: f32,
    pub outcome: f32,
}

impl Record {
    pub fn value(&self, field: Field) -> f32 {
        match field {
            Field::Id => self.id as f32,
            Field::Pregnancies => self.pregnancies,
            Field::Glucose => self.glucose,
            Field::BloodPressure => self.blood_pressure,
            Field::SkinThickness => self.skin_thickness,
            Field::Insulin => self.insulin,
            Field::Bmi => self.bmi,
            Field::DiabetesPedigree => self.diabetes_pedigree,
            Field::Age => self.age,
            Field::Outcome => self.outcome,
        }
    }

    pub fn has_outcome(&self, outcome: f32) -> bool {
        self.outcome == outcome
    }

    pub fn outcome_glyph(&self) -> &'static str {
        if self.outcome == 1.0 { SAD_FACE } else { HAPPY_FACE }
    }
}

pub fn is_face_glyph(text: &str) -> bool {
    text == SAD_FACE || text == HAPPY_FACE
}
