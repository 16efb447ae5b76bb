//! Parcel record model.
//!
//! One row of the enhanced parcels CSV (the assessor export merged with
//! the NHDRA building data). Column names follow the CSV headers.

use serde::{Deserialize, Deserializer, Serialize};

/// Oldest year-built value treated as real data.
pub const YEAR_BUILT_MIN: i32 = 1800;

/// Newest year-built value treated as real data.
pub const YEAR_BUILT_MAX: i32 = 2029;

/// One taxable land/building unit.
///
/// Numeric columns are `Option` because the upstream merge leaves blanks
/// and occasional non-numeric junk; a bad cell never rejects the row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParcelRecord {
    pub parcel_id: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub class_code: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lot_size_acres: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub land_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub building_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub year_built: Option<f64>,
    #[serde(default)]
    pub building_style: String,
    #[serde(default)]
    pub building_grade: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub living_area_sqft: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_rooms: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bedrooms: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub full_baths: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub half_baths: Option<f64>,
    #[serde(default)]
    pub heating_type: String,
    #[serde(default)]
    pub heating_fuel: String,
    #[serde(default)]
    pub ac_type: String,
    #[serde(default)]
    pub roof_material: String,
    #[serde(default)]
    pub exterior_walls: String,
    #[serde(default)]
    pub stories: String,
    #[serde(default)]
    pub zoning: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub last_sale_price: Option<f64>,
    #[serde(default)]
    pub last_sale_date: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub condition_percent: Option<f64>,
}

impl ParcelRecord {
    /// Property-class filter value. Blank codes carry no value.
    pub fn class_value(&self) -> Option<String> {
        let trimmed = self.class_code.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Zoning-district filter value. Blank codes carry no value.
    pub fn zone_value(&self) -> Option<String> {
        let trimmed = self.zoning.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Cleaned year-built value: floored to a whole year, zero sentinel
    /// and out-of-range values excluded.
    pub fn year_value(&self) -> Option<i32> {
        let year = self.year_built?;
        if year == 0.0 {
            return None;
        }
        let year = year.floor() as i32;
        if (YEAR_BUILT_MIN..=YEAR_BUILT_MAX).contains(&year) {
            Some(year)
        } else {
            None
        }
    }
}

/// Accept a number, a numeric string, a blank, or junk; only the first
/// two produce a value.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de;

    struct LenientVisitor;

    impl<'de> de::Visitor<'de> for LenientVisitor {
        type Value = Option<f64>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a number, numeric string, or blank")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.trim().parse().ok())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(LenientVisitor)
        }
    }

    deserializer.deserialize_any(LenientVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ParcelRecord {
        ParcelRecord {
            parcel_id: "0012-0003-0000".into(),
            class_code: " 1010 ".into(),
            zoning: "R1".into(),
            year_built: Some(1952.0),
            ..Default::default()
        }
    }

    #[test]
    fn class_value_trims_and_drops_blank() {
        let mut r = record();
        assert_eq!(r.class_value().as_deref(), Some("1010"));
        r.class_code = "   ".into();
        assert_eq!(r.class_value(), None);
    }

    #[test]
    fn year_value_cleaning() {
        let mut r = record();
        assert_eq!(r.year_value(), Some(1952));

        r.year_built = Some(1952.75);
        assert_eq!(r.year_value(), Some(1952));

        r.year_built = Some(0.0);
        assert_eq!(r.year_value(), None);

        r.year_built = Some(1776.0);
        assert_eq!(r.year_value(), None);

        r.year_built = Some(2150.0);
        assert_eq!(r.year_value(), None);

        r.year_built = None;
        assert_eq!(r.year_value(), None);
    }

    #[test]
    fn csv_row_with_blank_and_junk_numerics_loads() {
        let data = "\
parcel_id,owner_name,class_code,total_value,year_built,zoning
0012-0003-0000,SMITH JOHN,1010,245300,1952,R1
0012-0004-0000,DOE JANE,1012,,n/a,
";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<ParcelRecord> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .expect("rows should load");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].total_value, Some(245300.0));
        assert_eq!(rows[0].year_value(), Some(1952));
        assert_eq!(rows[1].total_value, None);
        assert_eq!(rows[1].year_value(), None);
        assert_eq!(rows[1].zone_value(), None);
    }
}
