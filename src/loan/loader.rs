//! CSV lumpsum plan loader
//!
//! Expected columns: `month,amount,description` (description optional).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{AdvisorError, Result};
use super::data::Lumpsum;

/// Load lumpsum entries from a CSV file, sorted by month
pub fn load_lumpsums(path: &Path) -> Result<Vec<Lumpsum>> {
    let file = File::open(path)?;
    load_lumpsums_from_reader(file)
}

/// Load lumpsum entries from any reader
pub fn load_lumpsums_from_reader<R: Read>(reader: R) -> Result<Vec<Lumpsum>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut lumpsums = Vec::new();
    for result in csv_reader.records() {
        let mut record = result?;
        // Short rows leave trailing optional columns empty
        while record.len() < headers.len() {
            record.push_field("");
        }
        let lumpsum: Lumpsum = record.deserialize(Some(&headers))?;
        if lumpsum.month == 0 {
            return Err(AdvisorError::invalid("lumpsum.month", "months start at 1"));
        }
        if !(lumpsum.amount >= 0.0) {
            return Err(AdvisorError::invalid("lumpsum.amount", "must not be negative"));
        }
        lumpsums.push(lumpsum);
    }

    // Stable: entries sharing a month keep file order
    lumpsums.sort_by_key(|l| l.month);
    log::debug!("loaded {} lumpsum entries", lumpsums.len());
    Ok(lumpsums)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_lumpsums() {
        let data = "month,amount,description\n18,200000,Bonus\n6,50000,Gift\n30,75000\n";
        let lumpsums = load_lumpsums_from_reader(data.as_bytes()).unwrap();

        assert_eq!(lumpsums.len(), 3);
        assert_eq!(lumpsums[0].month, 6);
        assert_eq!(lumpsums[0].description, "Gift");
        assert_eq!(lumpsums[1].amount, 200_000.0);
        assert_eq!(lumpsums[2].description, "");
    }

    #[test]
    fn test_short_row_without_description() {
        let data = "month,amount,description\n30,75000\n";
        let lumpsums = load_lumpsums_from_reader(data.as_bytes()).unwrap();

        assert_eq!(lumpsums.len(), 1);
        assert_eq!(lumpsums[0].month, 30);
        assert_eq!(lumpsums[0].amount, 75_000.0);
        assert!(lumpsums[0].description.is_empty());
    }

    #[test]
    fn test_rejects_month_zero() {
        let data = "month,amount,description\n0,1000,Bad\n";
        assert!(load_lumpsums_from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_rejects_negative_amount() {
        let data = "month,amount,description\n4,-5000,Refund\n";
        assert!(matches!(
            load_lumpsums_from_reader(data.as_bytes()),
            Err(AdvisorError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_rejects_non_numeric_amount() {
        let data = "month,amount,description\n3,lots,Bad\n";
        assert!(matches!(
            load_lumpsums_from_reader(data.as_bytes()),
            Err(AdvisorError::Csv(_))
        ));
    }
}
