//! Grade arithmetic shared by the lecturer entry page and the KHS page.
//!
//! Two letter tables exist on purpose: the original system used a
//! fine-grained A..E table on the grade-entry page and a coarse table on
//! the KHS page. The grading policy has not been unified upstream, so both
//! tables are kept as-is.

/// Weighted final score: tugas 30%, UTS 30%, UAS 40%, rounded to two
/// decimals.
pub fn nilai_akhir(tugas: f64, uts: f64, uas: f64) -> f64 {
    let raw = tugas * 0.3 + uts * 0.3 + uas * 0.4;
    (raw * 100.0).round() / 100.0
}

/// Fine-grained table used by the grade-entry preview (5-point bands).
pub fn huruf_detail(nilai: f64) -> &'static str {
    if nilai >= 85.0 {
        "A"
    } else if nilai >= 80.0 {
        "A-"
    } else if nilai >= 75.0 {
        "B+"
    } else if nilai >= 70.0 {
        "B"
    } else if nilai >= 65.0 {
        "B-"
    } else if nilai >= 60.0 {
        "C+"
    } else if nilai >= 55.0 {
        "C"
    } else if nilai >= 50.0 {
        "C-"
    } else if nilai >= 45.0 {
        "D"
    } else {
        "E"
    }
}

/// Coarse table used by the KHS transcript page.
pub fn huruf_khs(nilai: f64) -> &'static str {
    if nilai >= 85.0 {
        "A"
    } else if nilai >= 75.0 {
        "B+"
    } else if nilai >= 70.0 {
        "B"
    } else if nilai >= 60.0 {
        "C+"
    } else if nilai >= 50.0 {
        "C"
    } else if nilai >= 45.0 {
        "D"
    } else {
        "E"
    }
}

/// Grade point used for the per-term IP on the KHS page.
pub fn bobot(huruf: &str) -> f64 {
    match huruf {
        "A" => 4.0,
        "A-" => 3.7,
        "B+" => 3.3,
        "B" => 3.0,
        "B-" => 2.7,
        "C+" => 2.3,
        "C" => 2.0,
        "C-" => 1.7,
        "D" => 1.0,
        _ => 0.0,
    }
}

/// Component scores must stay inside 0..=100; checked before any request.
pub fn komponen_valid(nilai: f64) -> bool {
    (0.0..=100.0).contains(&nilai) && nilai.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nilai_akhir_uses_30_30_40_weights() {
        // 85*0.3 + 78*0.3 + 82*0.4 = 81.7
        assert_eq!(nilai_akhir(85.0, 78.0, 82.0), 81.7);
        assert_eq!(nilai_akhir(100.0, 100.0, 100.0), 100.0);
        assert_eq!(nilai_akhir(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn nilai_akhir_rounds_to_two_decimals() {
        // 70.3*0.3 + 80.1*0.3 + 90.07*0.4 = 81.148 -> 81.15
        assert_eq!(nilai_akhir(70.3, 80.1, 90.07), 81.15);
    }

    #[test]
    fn detail_table_band_edges() {
        assert_eq!(huruf_detail(85.0), "A");
        assert_eq!(huruf_detail(84.99), "A-");
        assert_eq!(huruf_detail(80.0), "A-");
        assert_eq!(huruf_detail(75.0), "B+");
        assert_eq!(huruf_detail(70.0), "B");
        assert_eq!(huruf_detail(65.0), "B-");
        assert_eq!(huruf_detail(60.0), "C+");
        assert_eq!(huruf_detail(55.0), "C");
        assert_eq!(huruf_detail(50.0), "C-");
        assert_eq!(huruf_detail(45.0), "D");
        assert_eq!(huruf_detail(44.99), "E");
    }

    #[test]
    fn khs_table_maps_worked_example_to_b_plus() {
        let akhir = nilai_akhir(85.0, 78.0, 82.0);
        assert_eq!(huruf_khs(akhir), "B+");
    }

    #[test]
    fn khs_table_has_no_minus_grades() {
        assert_eq!(huruf_khs(82.0), "B+");
        assert_eq!(huruf_khs(52.0), "C");
        assert_eq!(huruf_khs(47.0), "D");
        assert_eq!(huruf_khs(10.0), "E");
    }

    #[test]
    fn komponen_range_check() {
        assert!(komponen_valid(0.0));
        assert!(komponen_valid(100.0));
        assert!(!komponen_valid(-0.5));
        assert!(!komponen_valid(100.5));
        assert!(!komponen_valid(f64::NAN));
    }
}
