use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Error type

/// Normalized API failure: transport errors, non-2xx statuses with the
/// server's `message`, and client-side validation failures all end up here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    /// HTTP status when the server answered; `None` for transport and
    /// client-side validation failures.
    pub status: Option<u16>,
    pub details: Option<Value>,
}

/// Error body contract of the backend: non-2xx responses carry at least
/// `{ "message": "..." }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

impl ApiError {
    pub fn request_failed(message: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Permintaan gagal: {}", message),
            status: None,
            details: None,
        }
    }

    pub fn parse(message: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Gagal membaca respons: {}", message),
            status: None,
            details: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            details: None,
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
            details: None,
        }
    }

    pub fn is_forbidden(&self) -> bool {
        self.status == Some(403)
    }

    pub fn is_conflict(&self) -> bool {
        self.status == Some(409)
    }

    /// Message shown to the user; 403 gets a friendlier wording, anything
    /// else falls through to the server's (or our own) text.
    pub fn user_message(&self) -> String {
        if self.is_forbidden() {
            "Anda tidak memiliki akses untuk aksi ini".to_string()
        } else {
            self.message.clone()
        }
    }
}

impl From<ApiError> for String {
    fn from(error: ApiError) -> Self {
        error.message
    }
}

// ---------------------------------------------------------------------------
// Envelope

/// Some list endpoints wrap their payload in `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

// ---------------------------------------------------------------------------
// Auth / users

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Mahasiswa,
    Dosen,
    Kaprodi,
    Dekan,
    TuFakultas,
    TuProdi,
    Admin,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Mahasiswa => "Mahasiswa",
            Role::Dosen => "Dosen",
            Role::Kaprodi => "Kaprodi",
            Role::Dekan => "Dekan",
            Role::TuFakultas => "TU Fakultas",
            Role::TuProdi => "TU Prodi",
            Role::Admin => "Admin",
        }
    }

    /// Roles allowed to decide on academic documents. Which document kinds
    /// each role decides is the backend's call; this only gates the UI.
    pub fn can_approve_dokumen(&self) -> bool {
        matches!(self, Role::Kaprodi | Role::Dekan | Role::Admin)
    }

    pub fn can_approve_krs(&self) -> bool {
        matches!(self, Role::Kaprodi | Role::Admin)
    }

    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::Admin | Role::TuFakultas | Role::TuProdi)
    }

    pub fn can_manage_master(&self) -> bool {
        matches!(self, Role::Admin | Role::TuFakultas)
    }

    pub fn can_manage_jadwal(&self) -> bool {
        matches!(self, Role::Admin | Role::TuProdi | Role::TuFakultas)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub nama: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub nim: Option<String>,
    #[serde(default)]
    pub nidn: Option<String>,
    #[serde(default)]
    pub fakultas_id: Option<String>,
    #[serde(default)]
    pub prodi_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub nama: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nidn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fakultas_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prodi_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nama: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prodi_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Master data

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fakultas {
    pub id: String,
    pub kode: String,
    pub nama: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prodi {
    pub id: String,
    pub kode: String,
    pub nama: String,
    pub fakultas_id: String,
    #[serde(default)]
    pub jenjang: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TahunAkademik {
    pub id: String,
    /// e.g. "2025/2026 Ganjil"
    pub nama: String,
    pub is_aktif: bool,
    #[serde(default)]
    pub mulai: Option<NaiveDate>,
    #[serde(default)]
    pub selesai: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Dokumen akademik

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DokumenStatus {
    Pending,
    Approved,
    Rejected,
}

impl DokumenStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DokumenStatus::Pending => "Menunggu",
            DokumenStatus::Approved => "Disetujui",
            DokumenStatus::Rejected => "Ditolak",
        }
    }

    /// Transitions are one-way: only Pending documents can be decided, and
    /// the decision itself is made by the backend.
    pub fn is_pending(&self) -> bool {
        matches!(self, DokumenStatus::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DokumenJenis {
    ProposalSkripsi,
    LaporanKp,
    SuratFakultas,
    PengajuanSurat,
}

impl DokumenJenis {
    pub fn label(&self) -> &'static str {
        match self {
            DokumenJenis::ProposalSkripsi => "Proposal Skripsi",
            DokumenJenis::LaporanKp => "Laporan KP",
            DokumenJenis::SuratFakultas => "Surat Fakultas",
            DokumenJenis::PengajuanSurat => "Pengajuan Surat",
        }
    }

    pub const ALL: [DokumenJenis; 4] = [
        DokumenJenis::ProposalSkripsi,
        DokumenJenis::LaporanKp,
        DokumenJenis::SuratFakultas,
        DokumenJenis::PengajuanSurat,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DokumenAkademik {
    pub id: String,
    pub judul: String,
    pub jenis: DokumenJenis,
    pub file_name: String,
    #[serde(default)]
    pub file_url: Option<String>,
    pub pengunggah_id: String,
    pub pengunggah_nama: String,
    pub status: DokumenStatus,
    #[serde(default)]
    pub approver_nama: Option<String>,
    #[serde(default)]
    pub alasan_penolakan: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DokumenUploadMeta {
    pub judul: String,
    pub jenis: DokumenJenis,
}

// ---------------------------------------------------------------------------
// Materi kuliah

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MateriKuliah {
    pub id: String,
    pub judul: String,
    #[serde(default)]
    pub deskripsi: Option<String>,
    pub jadwal_id: String,
    pub nama_matkul: String,
    pub file_name: String,
    #[serde(default)]
    pub file_url: Option<String>,
    pub dosen_nama: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MateriUploadMeta {
    pub judul: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deskripsi: Option<String>,
    pub jadwal_id: String,
}

// ---------------------------------------------------------------------------
// Nilai

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nilai {
    pub id: String,
    pub mahasiswa_id: String,
    pub mahasiswa_nama: String,
    pub nim: String,
    pub jadwal_id: String,
    #[serde(default)]
    pub nama_matkul: Option<String>,
    #[serde(default)]
    pub tugas: Option<f64>,
    #[serde(default)]
    pub uts: Option<f64>,
    #[serde(default)]
    pub uas: Option<f64>,
    #[serde(default)]
    pub nilai_akhir: Option<f64>,
    #[serde(default)]
    pub nilai_huruf: Option<String>,
    #[serde(default)]
    pub is_final: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertNilaiRequest {
    pub mahasiswa_id: String,
    pub jadwal_id: String,
    pub tugas: f64,
    pub uts: f64,
    pub uas: f64,
}

// ---------------------------------------------------------------------------
// KRS / KHS

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KrsStatus {
    Draft,
    Submitted,
    Approved,
}

impl KrsStatus {
    pub fn label(&self) -> &'static str {
        match self {
            KrsStatus::Draft => "Draf",
            KrsStatus::Submitted => "Diajukan",
            KrsStatus::Approved => "Disetujui",
        }
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, KrsStatus::Draft)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KrsItem {
    pub id: String,
    pub jadwal_id: String,
    pub kode_matkul: String,
    pub nama_matkul: String,
    pub sks: i32,
    pub dosen_nama: String,
    pub hari: String,
    pub jam_mulai: String,
    pub jam_selesai: String,
    pub ruangan: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Krs {
    pub id: String,
    pub mahasiswa_id: String,
    pub mahasiswa_nama: String,
    pub nim: String,
    pub tahun_akademik_id: String,
    #[serde(default)]
    pub tahun_akademik_nama: Option<String>,
    pub status: KrsStatus,
    pub items: Vec<KrsItem>,
    pub created_at: DateTime<Utc>,
}

impl Krs {
    pub fn total_sks(&self) -> i32 {
        self.items.iter().map(|item| item.sks).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KhsEntry {
    pub kode_matkul: String,
    pub nama_matkul: String,
    pub sks: i32,
    pub nilai_akhir: f64,
    pub nilai_huruf: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Khs {
    pub id: String,
    pub mahasiswa_id: String,
    pub tahun_akademik_id: String,
    pub tahun_akademik_nama: String,
    pub ip_semester: f64,
    pub entries: Vec<KhsEntry>,
}

// ---------------------------------------------------------------------------
// Jadwal

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JadwalKuliah {
    pub id: String,
    pub kode_matkul: String,
    pub nama_matkul: String,
    pub sks: i32,
    pub dosen_id: String,
    pub dosen_nama: String,
    pub ruangan: String,
    pub hari: String,
    pub jam_mulai: String,
    pub jam_selesai: String,
    pub tahun_akademik_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JadwalUjian {
    pub id: String,
    pub jadwal_id: String,
    pub nama_matkul: String,
    /// "UTS" or "UAS"
    pub jenis: String,
    pub tanggal: NaiveDate,
    pub jam_mulai: String,
    pub jam_selesai: String,
    pub ruangan: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJadwalRequest {
    pub kode_matkul: String,
    pub nama_matkul: String,
    pub sks: i32,
    pub dosen_id: String,
    pub ruangan: String,
    pub hari: String,
    pub jam_mulai: String,
    pub jam_selesai: String,
    pub tahun_akademik_id: String,
}

// ---------------------------------------------------------------------------
// Dashboard

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_mahasiswa: i64,
    #[serde(default)]
    pub total_dosen: i64,
    #[serde(default)]
    pub dokumen_pending: i64,
    #[serde(default)]
    pub krs_submitted: i64,
}
