use chrono::{DateTime, NaiveDate, Utc};

/// "2025-09-01T07:30:00Z" -> "01-09-2025 07:30"
pub fn tanggal_waktu(ts: &DateTime<Utc>) -> String {
    ts.format("%d-%m-%Y %H:%M").to_string()
}

pub fn tanggal(d: &NaiveDate) -> String {
    d.format("%d-%m-%Y").to_string()
}

/// Display helper for optional component scores.
pub fn skor(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".into())
}

pub fn angka(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_dates_indonesian_order() {
        let ts = Utc.with_ymd_and_hms(2025, 9, 1, 7, 30, 0).unwrap();
        assert_eq!(tanggal_waktu(&ts), "01-09-2025 07:30");
        assert_eq!(tanggal(&NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()), "01-09-2025");
    }

    #[test]
    fn skor_renders_dash_for_missing() {
        assert_eq!(skor(None), "-");
        assert_eq!(skor(Some(81.7)), "81.70");
        assert_eq!(angka(3.42), "3.42");
    }
}
