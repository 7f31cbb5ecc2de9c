use crate::core::schema::FeatureRecord;
use crate::domain::ports::Storage;
use crate::utils::error::{PredictorError, Result};

pub const DEFAULT_EXPORT_FILENAME: &str = "input_data.csv";

/// Integral values print without a fractional part so counts and flags read
/// as `3` and `1` rather than `3.0` and `1.0`.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Header of field names followed by one data row.
pub fn to_csv_bytes(record: &FeatureRecord) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(record.names())?;
    writer.write_record(record.values().iter().map(|v| format_value(*v)))?;
    writer
        .into_inner()
        .map_err(|e| PredictorError::IoError(e.into_error()))
}

pub fn to_csv(record: &FeatureRecord) -> Result<String> {
    let bytes = to_csv_bytes(record)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes the record through `storage` and returns where it landed.
pub fn export_csv(storage: &dyn Storage, filename: &str, record: &FeatureRecord) -> Result<String> {
    let bytes = to_csv_bytes(record)?;
    let location = storage.write_file(filename, &bytes)?;
    tracing::info!("📎 Exported {} features to {}", record.len(), location);
    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::derive;
    use crate::core::schema::FEATURE_SCHEMA;
    use crate::domain::model::RawInput;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(-10.0), "-10");
        assert_eq!(format_value(27.5), "27.5");
        assert_eq!(format_value(5000.0 / 3.0), "1666.6666666666667");
    }

    #[test]
    fn test_csv_has_header_and_one_row() {
        let record = derive(&RawInput::default()).unwrap();
        let csv_text = to_csv(&record).unwrap();
        let lines: Vec<&str> = csv_text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], FEATURE_SCHEMA.join(","));
        assert!(lines[1].starts_with("3,2000,5000,27,2024,7,10,3,1,0,0,1,0,0,1,0,0,0,"));
        assert_eq!(lines[1].split(',').count(), FEATURE_SCHEMA.len());
    }
}
