//! Monthly observation CSV parsing.
//!
//! The files start with a few quoted preamble lines, then a header row
//! whose first cell is empty and whose second is `Date`, then one row per
//! day, then quoted footnotes. Every physical line is parsed on its own so
//! a malformed line drops only itself.

use chrono::NaiveDate;

use crate::domain::{DATE_FIELD, DailyRecord, MonthKey};

/// Second cell of the header row.
const HEADER_SENTINEL: &str = "Date";

/// Normalize a CSV column title into a lowercase ASCII field name.
///
/// ```
/// use bom_weather::records::normalize_header;
///
/// assert_eq!(normalize_header("Maximum temperature (°C)"), "maximum_temperature_c");
/// assert_eq!(normalize_header("9am relative humidity (%)"), "9am_relative_humidity_percent");
/// assert_eq!(normalize_header("Speed of maximum wind gust (km/h)"), "speed_of_maximum_wind_gust_km_h");
/// ```
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .replace(['(', ')'], "")
        .replace("°C", "c")
        .replace('°', "_degrees")
        .replace([' ', '-', '/'], "_")
        .replace('%', "percent")
        .to_lowercase()
        .chars()
        .filter(char::is_ascii)
        .collect()
}

/// Parse one physical line as a CSV record.
fn split_line(line: &str) -> Option<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let record = reader.records().next()?.ok()?;
    Some(record.iter().map(str::to_string).collect())
}

/// Canonical `YYYY-MM-DD` form of a date cell, padding unpadded month and
/// day numbers. Cells that are not `Y-M-D` are returned trimmed but
/// otherwise unchanged.
fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    let mut parts = raw.split('-').map(|p| p.trim().parse::<u32>().ok());
    let parsed = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(Some(y)), Some(Some(m)), Some(Some(d)), None) => {
            i32::try_from(y).ok().and_then(|y| NaiveDate::from_ymd_opt(y, m, d))
        }
        _ => None,
    };
    match parsed {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => raw.to_string(),
    }
}

fn is_header(cells: &[String]) -> bool {
    cells.len() > 1 && cells[0].trim().is_empty() && cells[1].trim() == HEADER_SENTINEL
}

/// Parse a monthly CSV into daily records tagged with `month`.
///
/// Returns an empty list when no header row is found.
pub fn parse_monthly_csv(text: &str, month: MonthKey) -> Vec<DailyRecord> {
    let mut lines = text.lines().map(str::trim);

    let headers: Vec<String> = loop {
        let Some(line) = lines.next() else {
            return Vec::new();
        };
        if !line.starts_with(',') {
            continue;
        }
        if let Some(cells) = split_line(line)
            && is_header(&cells)
        {
            break cells[1..].iter().map(|h| normalize_header(h)).collect();
        }
    };

    let mut records = Vec::new();
    for line in lines {
        if line.is_empty() || line.starts_with('"') {
            continue;
        }
        let Some(cells) = split_line(line) else {
            continue;
        };
        let Some(row) = cells.get(1..) else {
            continue;
        };
        if row.len() < headers.len() || row[0].trim().is_empty() {
            continue;
        }

        let mut record = DailyRecord::new(normalize_date(&row[0]), month);
        for (column, value) in headers.iter().zip(row).skip(1) {
            if column.is_empty() || column == DATE_FIELD {
                continue;
            }
            record.insert(column.clone(), value.clone());
        }
        records.push(record);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn jan() -> MonthKey {
        MonthKey::of(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    }

    #[test]
    fn header_normalization() {
        assert_eq!(normalize_header("Minimum temperature (°C)"), "minimum_temperature_c");
        assert_eq!(normalize_header("Rainfall (mm)"), "rainfall_mm");
        assert_eq!(normalize_header("9am MSL pressure (hPa)"), "9am_msl_pressure_hpa");
        assert_eq!(
            normalize_header("Direction of maximum wind gust "),
            "direction_of_maximum_wind_gust"
        );
        assert_eq!(normalize_header("Wind dir (°)"), "wind_dir__degrees");
        assert_eq!(normalize_header("Temp (Â°C)"), "temp_c");
    }

    #[test]
    fn parses_fixture_month() {
        let records = parse_monthly_csv(fixtures::CSV_202501, jan());
        assert_eq!(records.len(), 4);

        let first = &records[0];
        assert_eq!(first.date(), "2025-01-01");
        assert_eq!(first.month_key(), "202501");
        assert_eq!(first.get("minimum_temperature_c"), Some("10.2"));
        assert_eq!(first.get("maximum_temperature_c"), Some("24.5"));
        assert_eq!(first.get("9am_relative_humidity_percent"), Some("72"));
        assert_eq!(first.get("speed_of_maximum_wind_gust_km_h"), Some("41"));
        assert_eq!(first.get("3pm_wind_direction"), Some("NNW"));
        assert_eq!(first.get("evaporation_mm"), Some(""));

        assert_eq!(records[3].date(), "2025-01-04");
    }

    #[test]
    fn pads_unpadded_dates() {
        let feb = MonthKey::of(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        let records = parse_monthly_csv(fixtures::CSV_202502, feb);
        let dates: Vec<&str> = records.iter().map(|r| r.date()).collect();
        assert_eq!(dates, vec!["2025-02-01", "2025-02-02"]);
    }

    #[test]
    fn missing_header_yields_nothing() {
        let text = "\"Daily Weather Observations\"\n,2025-01-01,10.2,24.5\n";
        assert!(parse_monthly_csv(text, jan()).is_empty());
        assert!(parse_monthly_csv("", jan()).is_empty());
        assert!(parse_monthly_csv("<html>Not found</html>", jan()).is_empty());
    }

    #[test]
    fn skips_short_and_dateless_rows() {
        let text = concat!(
            ",\"Date\",\"Minimum temperature (°C)\",\"Maximum temperature (°C)\"\r\n",
            ",2025-01-01,10.2,24.5\r\n",
            ",2025-01-02,11.0\r\n",
            ",,9.0,20.0\r\n",
            "\r\n",
            "\"Totals:\",,,\r\n",
            ",2025-01-03,8.1,19.9,extra\r\n",
        );
        let records = parse_monthly_csv(text, jan());
        let dates: Vec<&str> = records.iter().map(|r| r.date()).collect();
        assert_eq!(dates, vec!["2025-01-01", "2025-01-03"]);
        assert_eq!(records[1].get("maximum_temperature_c"), Some("19.9"));
    }

    #[test]
    fn unparseable_date_is_kept_verbatim() {
        assert_eq!(normalize_date("2025-1-3"), "2025-01-03");
        assert_eq!(normalize_date(" 2025-01-03 "), "2025-01-03");
        assert_eq!(normalize_date("2025-02-30"), "2025-02-30");
        assert_eq!(normalize_date("3/1/2025"), "3/1/2025");
    }
}
