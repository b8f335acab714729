use leptos::*;

use crate::api::types::{DokumenAkademik, DokumenJenis, DokumenStatus, Role, UserProfile};
use crate::state::list::Searchable;

impl Searchable for DokumenAkademik {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn haystack(&self) -> String {
        format!(
            "{} {} {} {}",
            self.judul,
            self.pengunggah_nama,
            self.jenis.label(),
            self.status.label()
        )
    }
}

/// Approve/reject buttons: role must hold approval rights and the row must
/// still be undecided.
pub fn can_decide(role: Option<Role>, dokumen: &DokumenAkademik) -> bool {
    role.map(|role| role.can_approve_dokumen()).unwrap_or(false) && dokumen.status.is_pending()
}

/// Owners may withdraw their own pending uploads; admin can always delete.
pub fn can_delete(user: Option<&UserProfile>, dokumen: &DokumenAkademik) -> bool {
    match user {
        Some(user) if user.role == Role::Admin => true,
        Some(user) => user.id == dokumen.pengunggah_id && dokumen.status.is_pending(),
        None => false,
    }
}

/// Filter select values come straight from the `<select>` element; an empty
/// string means "no filter".
pub fn parse_status_filter(raw: &str) -> Option<DokumenStatus> {
    serde_json::from_value(serde_json::Value::String(raw.to_string())).ok()
}

pub fn parse_jenis_filter(raw: &str) -> Option<DokumenJenis> {
    serde_json::from_value(serde_json::Value::String(raw.to_string())).ok()
}

/// Signals shared between the filter bar, the table and the dialogs.
#[derive(Clone, Copy)]
pub struct DokumenFilters {
    pub status: RwSignal<String>,
    pub jenis: RwSignal<String>,
    /// Bumped after every mutation; the list resource keys on it so a
    /// fresh load supersedes anything still in flight.
    pub generation: RwSignal<u32>,
}

impl DokumenFilters {
    pub fn new() -> Self {
        Self {
            status: create_rw_signal(String::new()),
            jenis: create_rw_signal(String::new()),
            generation: create_rw_signal(0),
        }
    }

    pub fn snapshot(&self) -> (Option<DokumenStatus>, Option<DokumenJenis>, u32) {
        (
            parse_status_filter(&self.status.get()),
            parse_jenis_filter(&self.jenis.get()),
            self.generation.get(),
        )
    }

    pub fn reload(&self) {
        self.generation.update(|n| *n = n.wrapping_add(1));
    }
}

impl Default for DokumenFilters {
    fn default() -> Self {
        Self::new()
    }
}
