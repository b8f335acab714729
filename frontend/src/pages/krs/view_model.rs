use crate::api::types::{JadwalKuliah, Krs};
use crate::state::list::Searchable;

impl Searchable for Krs {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn haystack(&self) -> String {
        format!("{} {}", self.mahasiswa_nama, self.nim)
    }
}

/// Why a course cannot be added to the current draft, if anything. This is
/// form validation over state the page already holds; credit ceilings and
/// schedule clashes are the backend's rules and its 409/422 responses are
/// surfaced as-is.
pub fn add_blocker(krs: &Krs, course: &JadwalKuliah) -> Option<String> {
    if !krs.status.is_editable() {
        return Some("KRS sudah diajukan dan tidak dapat diubah".into());
    }
    if krs.items.iter().any(|item| item.jadwal_id == course.id) {
        return Some("Mata kuliah sudah ada di KRS".into());
    }
    None
}
