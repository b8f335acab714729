use crate::api::types::{CreateUserRequest, Role, UserProfile};
use crate::state::list::Searchable;

impl Searchable for UserProfile {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn haystack(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.nama,
            self.email,
            self.role.label(),
            self.nim.as_deref().unwrap_or(""),
            self.nidn.as_deref().unwrap_or("")
        )
    }
}

pub fn parse_role(raw: &str) -> Option<Role> {
    serde_json::from_value(serde_json::Value::String(raw.to_string())).ok()
}

pub const ROLE_OPTIONS: [Role; 7] = [
    Role::Mahasiswa,
    Role::Dosen,
    Role::Kaprodi,
    Role::Dekan,
    Role::TuFakultas,
    Role::TuProdi,
    Role::Admin,
];

pub fn role_wire(role: Role) -> String {
    serde_json::to_value(role)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Field-level validation for the create-user form. Students need an NIM,
/// lecturers an NIDN.
pub fn build_create_request(
    nama: &str,
    email: &str,
    password: &str,
    role_raw: &str,
    nim: &str,
    nidn: &str,
) -> Result<CreateUserRequest, String> {
    if nama.trim().is_empty() {
        return Err("Nama wajib diisi".into());
    }
    if !email.contains('@') {
        return Err("Email tidak valid".into());
    }
    if password.len() < 8 {
        return Err("Kata sandi minimal 8 karakter".into());
    }
    let role = parse_role(role_raw).ok_or_else(|| "Peran wajib dipilih".to_string())?;
    if role == Role::Mahasiswa && nim.trim().is_empty() {
        return Err("NIM wajib diisi untuk mahasiswa".into());
    }
    if role == Role::Dosen && nidn.trim().is_empty() {
        return Err("NIDN wajib diisi untuk dosen".into());
    }
    Ok(CreateUserRequest {
        nama: nama.trim().to_string(),
        email: email.trim().to_string(),
        password: password.to_string(),
        role,
        nim: (!nim.trim().is_empty()).then(|| nim.trim().to_string()),
        nidn: (!nidn.trim().is_empty()).then(|| nidn.trim().to_string()),
        fakultas_id: None,
        prodi_id: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_requires_nim() {
        let err = build_create_request(
            "Agus",
            "agus@student.univ.ac.id",
            "rahasia-123",
            "mahasiswa",
            "",
            "",
        )
        .unwrap_err();
        assert!(err.contains("NIM"));

        let ok = build_create_request(
            "Agus",
            "agus@student.univ.ac.id",
            "rahasia-123",
            "mahasiswa",
            "210001",
            "",
        )
        .unwrap();
        assert_eq!(ok.nim.as_deref(), Some("210001"));
        assert_eq!(ok.role, Role::Mahasiswa);
    }

    #[test]
    fn lecturer_requires_nidn() {
        let err = build_create_request(
            "Budi",
            "budi@univ.ac.id",
            "rahasia-123",
            "dosen",
            "",
            "",
        )
        .unwrap_err();
        assert!(err.contains("NIDN"));
    }

    #[test]
    fn weak_password_is_rejected() {
        let err = build_create_request(
            "Admin",
            "admin@univ.ac.id",
            "pendek",
            "admin",
            "",
            "",
        )
        .unwrap_err();
        assert!(err.contains("8 karakter"));
    }

    #[test]
    fn role_wire_round_trips() {
        for role in ROLE_OPTIONS {
            assert_eq!(parse_role(&role_wire(role)), Some(role));
        }
        assert_eq!(parse_role(""), None);
    }
}
