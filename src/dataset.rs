//! Parcel dataset ingestion.
//!
//! Reads the enhanced parcels CSV into memory. The dataset is loaded
//! once at startup and shared read-only; filtering never mutates it.

use std::path::Path;

use parcel_types::ParcelRecord;
use tracing::{debug, info};

use crate::error::DatasetError;

/// Load every parcel row from `path`.
///
/// Rows that fail to deserialize even under the lenient numeric rules
/// (wrong field count, undecodable bytes) are skipped and counted, not
/// surfaced: a partial dataset beats no browser. A file without the
/// `parcel_id` column is rejected outright.
pub fn load_parcels(path: impl AsRef<Path>) -> Result<Vec<ParcelRecord>, DatasetError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let mut reader = csv::Reader::from_path(path).map_err(|source| DatasetError::Open {
        path: path_str.clone(),
        source,
    })?;

    let headers = reader
        .headers()
        .map_err(|source| DatasetError::Headers {
            path: path_str.clone(),
            source,
        })?
        .clone();
    if !headers.iter().any(|h| h == "parcel_id") {
        return Err(DatasetError::MissingColumn {
            path: path_str,
            column: "parcel_id".to_string(),
        });
    }

    let mut parcels = Vec::new();
    let mut skipped = 0usize;
    for row in reader.deserialize::<ParcelRecord>() {
        match row {
            Ok(record) => parcels.push(record),
            Err(err) => {
                skipped += 1;
                debug!(%err, "skipping undecodable parcel row");
            }
        }
    }

    info!(
        path = %path_str,
        total = parcels.len(),
        skipped,
        "loaded parcel dataset"
    );
    Ok(parcels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    #[test]
    fn loads_rows_with_lenient_numerics() {
        let file = write_csv(
            "\
parcel_id,owner_name,class_code,total_value,year_built,zoning
0012-0003-0000,SMITH JOHN,1010,245300,1952,R1
0012-0004-0000,DOE JANE,1012,,not-a-year,R1
",
        );
        let parcels = load_parcels(file.path()).expect("load");
        assert_eq!(parcels.len(), 2);
        assert_eq!(parcels[0].class_value().as_deref(), Some("1010"));
        assert_eq!(parcels[1].total_value, None);
        assert_eq!(parcels[1].year_value(), None);
    }

    #[test]
    fn missing_parcel_id_column_rejected() {
        let file = write_csv("owner_name,class_code\nSMITH JOHN,1010\n");
        let err = load_parcels(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { column, .. } if column == "parcel_id"));
    }

    #[test]
    fn missing_file_rejected() {
        let err = load_parcels("/no/such/parcels.csv").unwrap_err();
        assert!(matches!(err, DatasetError::Open { .. }));
    }

    #[test]
    fn short_rows_are_skipped_not_fatal() {
        let file = write_csv(
            "\
parcel_id,owner_name,class_code,total_value,year_built,zoning
0012-0003-0000,SMITH JOHN,1010,245300,1952,R1
bad-row
",
        );
        let parcels = load_parcels(file.path()).expect("load");
        assert_eq!(parcels.len(), 1);
    }
}
