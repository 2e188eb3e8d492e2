use crate::error::Result;
use crate::mapping::CsvRow;

/// Read CSV text into header-keyed row maps. Headers and cells are
/// trimmed; short records are tolerated (missing cells read as absent).
pub fn read_rows(text: &str) -> Result<Vec<CsvRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = CsvRow::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(value) = record.get(idx) {
                if !value.is_empty() {
                    row.insert(header.to_string(), value.to_string());
                }
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_keyed_by_header() {
        let rows = read_rows("Name,Zip\nAcme, 90001 \nBolt,10001\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Name").map(String::as_str), Some("Acme"));
        assert_eq!(rows[0].get("Zip").map(String::as_str), Some("90001"));
        assert_eq!(rows[1].get("Zip").map(String::as_str), Some("10001"));
    }

    #[test]
    fn short_and_empty_cells_are_absent() {
        let rows = read_rows("A,B,C\n1,,\n2\n").unwrap();
        assert_eq!(rows[0].get("A").map(String::as_str), Some("1"));
        assert_eq!(rows[0].get("B"), None);
        assert_eq!(rows[1].get("B"), None);
        assert_eq!(rows[1].get("C"), None);
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(read_rows("").unwrap().is_empty());
        assert!(read_rows("OnlyHeader,Row\n").unwrap().is_empty());
    }
}
