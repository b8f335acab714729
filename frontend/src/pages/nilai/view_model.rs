use crate::api::types::{Nilai, UpsertNilaiRequest};
use crate::state::list::Searchable;
use crate::utils::grade;

impl Searchable for Nilai {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn haystack(&self) -> String {
        format!("{} {}", self.mahasiswa_nama, self.nim)
    }
}

pub fn parse_komponen(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| "Nilai harus berupa angka".to_string())?;
    if !grade::komponen_valid(value) {
        return Err("Nilai harus berada pada rentang 0-100".to_string());
    }
    Ok(value)
}

/// Live preview while the lecturer types: the same weighting the backend
/// applies, shown before saving. `None` until all three components parse.
pub fn preview(tugas: &str, uts: &str, uas: &str) -> Option<(f64, &'static str)> {
    let tugas = parse_komponen(tugas).ok()?;
    let uts = parse_komponen(uts).ok()?;
    let uas = parse_komponen(uas).ok()?;
    let akhir = grade::nilai_akhir(tugas, uts, uas);
    Some((akhir, grade::huruf_detail(akhir)))
}

pub fn build_upsert(
    row: &Nilai,
    tugas: &str,
    uts: &str,
    uas: &str,
) -> Result<UpsertNilaiRequest, String> {
    if row.is_final {
        return Err("Nilai sudah difinalisasi dan tidak dapat diubah".into());
    }
    Ok(UpsertNilaiRequest {
        mahasiswa_id: row.mahasiswa_id.clone(),
        jadwal_id: row.jadwal_id.clone(),
        tugas: parse_komponen(tugas)?,
        uts: parse_komponen(uts)?,
        uas: parse_komponen(uas)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(is_final: bool) -> Nilai {
        Nilai {
            id: "n-1".into(),
            mahasiswa_id: "u-mhs-1".into(),
            mahasiswa_nama: "Agus Pratama".into(),
            nim: "210001".into(),
            jadwal_id: "j-1".into(),
            nama_matkul: None,
            tugas: None,
            uts: None,
            uas: None,
            nilai_akhir: None,
            nilai_huruf: None,
            is_final,
        }
    }

    #[test]
    fn preview_matches_the_weighting() {
        let (akhir, huruf) = preview("85", "78", "82").unwrap();
        assert_eq!(akhir, 81.7);
        assert_eq!(huruf, "A-");
    }

    #[test]
    fn preview_waits_for_all_components() {
        assert!(preview("85", "", "82").is_none());
        assert!(preview("85", "abc", "82").is_none());
        assert!(preview("85", "101", "82").is_none());
    }

    #[test]
    fn upsert_refuses_finalized_rows() {
        let err = build_upsert(&row(true), "80", "80", "80").unwrap_err();
        assert!(err.contains("difinalisasi"));
    }

    #[test]
    fn upsert_carries_parsed_components() {
        let request = build_upsert(&row(false), "85", "78", "82").unwrap();
        assert_eq!(request.tugas, 85.0);
        assert_eq!(request.uas, 82.0);
        assert_eq!(request.mahasiswa_id, "u-mhs-1");
    }

    #[test]
    fn component_parser_flags_range_and_format() {
        assert!(parse_komponen("100").is_ok());
        assert!(parse_komponen(" 0 ").is_ok());
        assert!(parse_komponen("100.5").is_err());
        assert!(parse_komponen("-1").is_err());
        assert!(parse_komponen("delapan").is_err());
    }
}
