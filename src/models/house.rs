use std::collections::HashMap;

use crate::errors::FeatureError;

pub const N_FEATURES: usize = 11;

/// Column order the artifacts were fitted with. Inputs must be laid out the same way.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "area",
    "bedrooms",
    "bathrooms",
    "floor",
    "total_floors",
    "furnished",
    "balcony",
    "age_of_house",
    "parking",
    "near_school",
    "near_metro",
];

/// Attributes of a single house, as submitted through the prediction form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseFeatures {
    pub area: f64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub floor: i64,
    pub total_floors: i64,
    /// 0 = unfurnished, 1 = semi, 2 = fully furnished
    pub furnished: i64,
    pub balcony: i64,
    pub age_of_house: i64,
    pub parking: i64,
    pub near_school: i64,
    pub near_metro: i64,
}

impl HouseFeatures {
    /// Coerce raw form fields. Every field is required; surrounding whitespace is ignored.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, FeatureError> {
        Ok(Self {
            area: float_field(form, "area")?,
            bedrooms: int_field(form, "bedrooms")?,
            bathrooms: int_field(form, "bathrooms")?,
            floor: int_field(form, "floor")?,
            total_floors: int_field(form, "total_floors")?,
            furnished: int_field(form, "furnished")?,
            balcony: int_field(form, "balcony")?,
            age_of_house: int_field(form, "age_of_house")?,
            parking: int_field(form, "parking")?,
            near_school: int_field(form, "near_school")?,
            near_metro: int_field(form, "near_metro")?,
        })
    }

    /// Flatten into the order given by [`FEATURE_NAMES`].
    pub fn to_vector(&self) -> [f64; N_FEATURES] {
        [
            self.area,
            self.bedrooms as f64,
            self.bathrooms as f64,
            self.floor as f64,
            self.total_floors as f64,
            self.furnished as f64,
            self.balcony as f64,
            self.age_of_house as f64,
            self.parking as f64,
            self.near_school as f64,
            self.near_metro as f64,
        ]
    }
}

fn raw_field<'a>(
    form: &'a HashMap<String, String>,
    field: &'static str,
) -> Result<&'a str, FeatureError> {
    form.get(field)
        .map(|value| value.trim())
        .ok_or(FeatureError::MissingField(field))
}

fn float_field(form: &HashMap<String, String>, field: &'static str) -> Result<f64, FeatureError> {
    let raw = raw_field(form, field)?;
    let value: f64 = raw.parse().map_err(|_| FeatureError::InvalidNumber {
        field,
        expected: "a number",
        value: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(FeatureError::NonFinite(field));
    }
    Ok(value)
}

fn int_field(form: &HashMap<String, String>, field: &'static str) -> Result<i64, FeatureError> {
    let raw = raw_field(form, field)?;
    raw.parse().map_err(|_| FeatureError::InvalidNumber {
        field,
        expected: "an integer",
        value: raw.to_string(),
    })
}
