//! Seeded in-memory data source. This is the explicit alternative to the
//! REST backend: selected once at startup when no `api_base_url` is
//! configured, or injected directly in tests. It implements enough of the
//! API surface (including the approval workflows and the grading-period
//! rule) for the app to be fully demonstrable offline.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{NaiveDate, TimeZone, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::client::Payload;
use crate::api::types::*;
use crate::utils::grade;

pub struct FixtureStore {
    users: RefCell<Vec<UserProfile>>,
    current_user: RefCell<Option<UserProfile>>,
    fakultas: RefCell<Vec<Fakultas>>,
    prodi: RefCell<Vec<Prodi>>,
    tahun: RefCell<Vec<TahunAkademik>>,
    dokumen: RefCell<Vec<DokumenAkademik>>,
    materi: RefCell<Vec<MateriKuliah>>,
    nilai: RefCell<Vec<Nilai>>,
    krs: RefCell<Vec<Krs>>,
    khs: RefCell<Vec<Khs>>,
    jadwal: RefCell<Vec<JadwalKuliah>>,
    ujian: RefCell<Vec<JadwalUjian>>,
    /// Finalizing grades outside the grading period answers 409.
    periode_nilai_terbuka: Cell<bool>,
}

/// One store per thread so demo-mode mutations survive across `ApiClient`
/// instances; pages construct clients independently.
pub fn shared() -> Rc<FixtureStore> {
    thread_local! {
        static SHARED: Rc<FixtureStore> = Rc::new(FixtureStore::seeded());
    }
    SHARED.with(|store| store.clone())
}

fn user(id: &str, nama: &str, email: &str, role: Role) -> UserProfile {
    UserProfile {
        id: id.into(),
        nama: nama.into(),
        email: email.into(),
        role,
        nim: None,
        nidn: None,
        fakultas_id: Some("f-ft".into()),
        prodi_id: Some("p-if".into()),
    }
}

fn mahasiswa(id: &str, nama: &str, email: &str, nim: &str) -> UserProfile {
    UserProfile {
        nim: Some(nim.into()),
        ..user(id, nama, email, Role::Mahasiswa)
    }
}

impl FixtureStore {
    pub fn seeded() -> Self {
        let created = Utc.with_ymd_and_hms(2025, 8, 1, 8, 0, 0).unwrap();

        let users = vec![
            user("u-admin", "Administrator", "admin@univ.ac.id", Role::Admin),
            user("u-dekan", "Prof. Rahmat Hidayat", "dekan@univ.ac.id", Role::Dekan),
            user("u-kaprodi", "Dr. Sri Wahyuni", "kaprodi@univ.ac.id", Role::Kaprodi),
            user("u-tu-fak", "Andi Saputra", "tu.fakultas@univ.ac.id", Role::TuFakultas),
            user("u-tu-prodi", "Dewi Lestari", "tu.prodi@univ.ac.id", Role::TuProdi),
            UserProfile {
                nidn: Some("0011028501".into()),
                ..user("u-dosen-1", "Budi Santoso, M.Kom", "budi.santoso@univ.ac.id", Role::Dosen)
            },
            UserProfile {
                nidn: Some("0023057902".into()),
                ..user("u-dosen-2", "Rina Marlina, M.T", "rina.marlina@univ.ac.id", Role::Dosen)
            },
            mahasiswa("u-mhs-1", "Agus Pratama", "agus@student.univ.ac.id", "210001"),
            mahasiswa("u-mhs-2", "Siti Nurhaliza", "siti@student.univ.ac.id", "210002"),
            mahasiswa("u-mhs-3", "Joko Susilo", "joko@student.univ.ac.id", "210003"),
        ];

        let jadwal = vec![
            JadwalKuliah {
                id: "j-1".into(),
                kode_matkul: "IF101".into(),
                nama_matkul: "Algoritma dan Pemrograman".into(),
                sks: 3,
                dosen_id: "u-dosen-1".into(),
                dosen_nama: "Budi Santoso, M.Kom".into(),
                ruangan: "R-201".into(),
                hari: "Senin".into(),
                jam_mulai: "08:00".into(),
                jam_selesai: "10:30".into(),
                tahun_akademik_id: "ta-2".into(),
            },
            JadwalKuliah {
                id: "j-2".into(),
                kode_matkul: "IF203".into(),
                nama_matkul: "Basis Data".into(),
                sks: 3,
                dosen_id: "u-dosen-1".into(),
                dosen_nama: "Budi Santoso, M.Kom".into(),
                ruangan: "R-202".into(),
                hari: "Selasa".into(),
                jam_mulai: "10:30".into(),
                jam_selesai: "13:00".into(),
                tahun_akademik_id: "ta-2".into(),
            },
            JadwalKuliah {
                id: "j-3".into(),
                kode_matkul: "IF305".into(),
                nama_matkul: "Jaringan Komputer".into(),
                sks: 2,
                dosen_id: "u-dosen-2".into(),
                dosen_nama: "Rina Marlina, M.T".into(),
                ruangan: "Lab-1".into(),
                hari: "Rabu".into(),
                jam_mulai: "08:00".into(),
                jam_selesai: "09:40".into(),
                tahun_akademik_id: "ta-2".into(),
            },
            JadwalKuliah {
                id: "j-4".into(),
                kode_matkul: "IF307".into(),
                nama_matkul: "Kecerdasan Buatan".into(),
                sks: 3,
                dosen_id: "u-dosen-2".into(),
                dosen_nama: "Rina Marlina, M.T".into(),
                ruangan: "R-203".into(),
                hari: "Kamis".into(),
                jam_mulai: "13:00".into(),
                jam_selesai: "15:30".into(),
                tahun_akademik_id: "ta-2".into(),
            },
        ];

        let dokumen = vec![
            DokumenAkademik {
                id: "d-1".into(),
                judul: "Proposal Skripsi: Sistem Rekomendasi".into(),
                jenis: DokumenJenis::ProposalSkripsi,
                file_name: "proposal-agus.pdf".into(),
                file_url: Some("/files/proposal-agus.pdf".into()),
                pengunggah_id: "u-mhs-1".into(),
                pengunggah_nama: "Agus Pratama".into(),
                status: DokumenStatus::Pending,
                approver_nama: None,
                alasan_penolakan: None,
                created_at: created,
                updated_at: None,
            },
            DokumenAkademik {
                id: "d-2".into(),
                judul: "Laporan KP PT Maju Jaya".into(),
                jenis: DokumenJenis::LaporanKp,
                file_name: "laporan-kp-siti.pdf".into(),
                file_url: Some("/files/laporan-kp-siti.pdf".into()),
                pengunggah_id: "u-mhs-2".into(),
                pengunggah_nama: "Siti Nurhaliza".into(),
                status: DokumenStatus::Approved,
                approver_nama: Some("Dr. Sri Wahyuni".into()),
                alasan_penolakan: None,
                created_at: created,
                updated_at: Some(created),
            },
            DokumenAkademik {
                id: "d-3".into(),
                judul: "Pengajuan Surat Aktif Kuliah".into(),
                jenis: DokumenJenis::PengajuanSurat,
                file_name: "surat-joko.pdf".into(),
                file_url: Some("/files/surat-joko.pdf".into()),
                pengunggah_id: "u-mhs-3".into(),
                pengunggah_nama: "Joko Susilo".into(),
                status: DokumenStatus::Rejected,
                approver_nama: Some("Andi Saputra".into()),
                alasan_penolakan: Some("Lampiran tidak lengkap".into()),
                created_at: created,
                updated_at: Some(created),
            },
        ];

        let nilai = vec![
            Nilai {
                id: "n-1".into(),
                mahasiswa_id: "u-mhs-1".into(),
                mahasiswa_nama: "Agus Pratama".into(),
                nim: "210001".into(),
                jadwal_id: "j-1".into(),
                nama_matkul: Some("Algoritma dan Pemrograman".into()),
                tugas: Some(85.0),
                uts: Some(78.0),
                uas: Some(82.0),
                nilai_akhir: Some(grade::nilai_akhir(85.0, 78.0, 82.0)),
                nilai_huruf: Some(grade::huruf_detail(grade::nilai_akhir(85.0, 78.0, 82.0)).into()),
                is_final: false,
            },
            Nilai {
                id: "n-2".into(),
                mahasiswa_id: "u-mhs-2".into(),
                mahasiswa_nama: "Siti Nurhaliza".into(),
                nim: "210002".into(),
                jadwal_id: "j-1".into(),
                nama_matkul: Some("Algoritma dan Pemrograman".into()),
                tugas: Some(90.0),
                uts: Some(88.0),
                uas: Some(91.0),
                nilai_akhir: Some(grade::nilai_akhir(90.0, 88.0, 91.0)),
                nilai_huruf: Some(grade::huruf_detail(grade::nilai_akhir(90.0, 88.0, 91.0)).into()),
                is_final: true,
            },
            Nilai {
                id: "n-3".into(),
                mahasiswa_id: "u-mhs-3".into(),
                mahasiswa_nama: "Joko Susilo".into(),
                nim: "210003".into(),
                jadwal_id: "j-1".into(),
                nama_matkul: Some("Algoritma dan Pemrograman".into()),
                tugas: None,
                uts: None,
                uas: None,
                nilai_akhir: None,
                nilai_huruf: None,
                is_final: false,
            },
        ];

        let krs = vec![
            Krs {
                id: "k-1".into(),
                mahasiswa_id: "u-mhs-1".into(),
                mahasiswa_nama: "Agus Pratama".into(),
                nim: "210001".into(),
                tahun_akademik_id: "ta-2".into(),
                tahun_akademik_nama: Some("2025/2026 Ganjil".into()),
                status: KrsStatus::Draft,
                items: vec![KrsItem {
                    id: "ki-1".into(),
                    jadwal_id: "j-1".into(),
                    kode_matkul: "IF101".into(),
                    nama_matkul: "Algoritma dan Pemrograman".into(),
                    sks: 3,
                    dosen_nama: "Budi Santoso, M.Kom".into(),
                    hari: "Senin".into(),
                    jam_mulai: "08:00".into(),
                    jam_selesai: "10:30".into(),
                    ruangan: "R-201".into(),
                }],
                created_at: created,
            },
            Krs {
                id: "k-2".into(),
                mahasiswa_id: "u-mhs-2".into(),
                mahasiswa_nama: "Siti Nurhaliza".into(),
                nim: "210002".into(),
                tahun_akademik_id: "ta-2".into(),
                tahun_akademik_nama: Some("2025/2026 Ganjil".into()),
                status: KrsStatus::Submitted,
                items: vec![
                    KrsItem {
                        id: "ki-2".into(),
                        jadwal_id: "j-1".into(),
                        kode_matkul: "IF101".into(),
                        nama_matkul: "Algoritma dan Pemrograman".into(),
                        sks: 3,
                        dosen_nama: "Budi Santoso, M.Kom".into(),
                        hari: "Senin".into(),
                        jam_mulai: "08:00".into(),
                        jam_selesai: "10:30".into(),
                        ruangan: "R-201".into(),
                    },
                    KrsItem {
                        id: "ki-3".into(),
                        jadwal_id: "j-3".into(),
                        kode_matkul: "IF305".into(),
                        nama_matkul: "Jaringan Komputer".into(),
                        sks: 2,
                        dosen_nama: "Rina Marlina, M.T".into(),
                        hari: "Rabu".into(),
                        jam_mulai: "08:00".into(),
                        jam_selesai: "09:40".into(),
                        ruangan: "Lab-1".into(),
                    },
                ],
                created_at: created,
            },
        ];

        let khs = vec![Khs {
            id: "kh-1".into(),
            mahasiswa_id: "u-mhs-1".into(),
            tahun_akademik_id: "ta-1".into(),
            tahun_akademik_nama: "2024/2025 Genap".into(),
            ip_semester: 3.43,
            entries: vec![
                KhsEntry {
                    kode_matkul: "IF001".into(),
                    nama_matkul: "Matematika Diskrit".into(),
                    sks: 3,
                    nilai_akhir: 81.7,
                    nilai_huruf: grade::huruf_khs(81.7).into(),
                },
                KhsEntry {
                    kode_matkul: "IF002".into(),
                    nama_matkul: "Pengantar Teknologi Informasi".into(),
                    sks: 2,
                    nilai_akhir: 88.0,
                    nilai_huruf: grade::huruf_khs(88.0).into(),
                },
            ],
        }];

        Self {
            users: RefCell::new(users),
            current_user: RefCell::new(None),
            fakultas: RefCell::new(vec![
                Fakultas { id: "f-ft".into(), kode: "FT".into(), nama: "Fakultas Teknik".into() },
                Fakultas { id: "f-fe".into(), kode: "FE".into(), nama: "Fakultas Ekonomi".into() },
            ]),
            prodi: RefCell::new(vec![
                Prodi {
                    id: "p-if".into(),
                    kode: "IF".into(),
                    nama: "Informatika".into(),
                    fakultas_id: "f-ft".into(),
                    jenjang: Some("S1".into()),
                },
                Prodi {
                    id: "p-si".into(),
                    kode: "SI".into(),
                    nama: "Sistem Informasi".into(),
                    fakultas_id: "f-ft".into(),
                    jenjang: Some("S1".into()),
                },
                Prodi {
                    id: "p-mj".into(),
                    kode: "MJ".into(),
                    nama: "Manajemen".into(),
                    fakultas_id: "f-fe".into(),
                    jenjang: Some("S1".into()),
                },
            ]),
            tahun: RefCell::new(vec![
                TahunAkademik {
                    id: "ta-1".into(),
                    nama: "2024/2025 Genap".into(),
                    is_aktif: false,
                    mulai: NaiveDate::from_ymd_opt(2025, 2, 1),
                    selesai: NaiveDate::from_ymd_opt(2025, 7, 31),
                },
                TahunAkademik {
                    id: "ta-2".into(),
                    nama: "2025/2026 Ganjil".into(),
                    is_aktif: true,
                    mulai: NaiveDate::from_ymd_opt(2025, 9, 1),
                    selesai: NaiveDate::from_ymd_opt(2026, 1, 31),
                },
            ]),
            dokumen: RefCell::new(dokumen),
            materi: RefCell::new(vec![MateriKuliah {
                id: "m-1".into(),
                judul: "Pengenalan Algoritma".into(),
                deskripsi: Some("Slide pertemuan 1".into()),
                jadwal_id: "j-1".into(),
                nama_matkul: "Algoritma dan Pemrograman".into(),
                file_name: "pertemuan-1.pdf".into(),
                file_url: Some("/files/pertemuan-1.pdf".into()),
                dosen_nama: "Budi Santoso, M.Kom".into(),
                created_at: created,
            }]),
            nilai: RefCell::new(nilai),
            krs: RefCell::new(krs),
            khs: RefCell::new(khs),
            jadwal: RefCell::new(jadwal),
            ujian: RefCell::new(vec![JadwalUjian {
                id: "uj-1".into(),
                jadwal_id: "j-1".into(),
                nama_matkul: "Algoritma dan Pemrograman".into(),
                jenis: "UTS".into(),
                tanggal: NaiveDate::from_ymd_opt(2025, 10, 20).unwrap(),
                jam_mulai: "08:00".into(),
                jam_selesai: "10:00".into(),
                ruangan: "R-201".into(),
            }]),
            periode_nilai_terbuka: Cell::new(true),
        }
    }

    /// Test hook for the grading-period rule.
    pub fn set_periode_nilai(&self, terbuka: bool) {
        self.periode_nilai_terbuka.set(terbuka);
    }

    pub fn respond(
        &self,
        method: &Method,
        path: &str,
        query: &[(&'static str, String)],
        payload: &Payload,
    ) -> Result<Value, ApiError> {
        let trimmed = path.trim_matches('/').to_string();
        let segments: Vec<&str> = trimmed.split('/').collect();
        let body = match payload {
            Payload::Json(value) => Some(value),
            _ => None,
        };

        match (method.as_str(), segments.as_slice()) {
            ("POST", ["auth", "login"]) => self.login(body),
            ("POST", ["auth", "logout"]) => {
                *self.current_user.borrow_mut() = None;
                Ok(Value::Null)
            }
            ("GET", ["auth", "me"]) => self
                .current_user
                .borrow()
                .as_ref()
                .map(to_value)
                .unwrap_or(Err(ApiError::http(401, "Belum masuk"))),

            ("GET", ["users"]) => {
                let role = query_get(query, "role");
                let users = self.users.borrow();
                let filtered: Vec<_> = users
                    .iter()
                    .filter(|u| {
                        role.map(|r| serde_json::to_value(u.role).unwrap() == json!(r))
                            .unwrap_or(true)
                    })
                    .collect();
                Ok(envelope(&filtered))
            }
            ("POST", ["users"]) => self.create_user(body),
            ("PUT", ["users", id]) => self.update_user(id, body),
            ("DELETE", ["users", id]) => {
                self.users.borrow_mut().retain(|u| u.id != *id);
                Ok(Value::Null)
            }
            ("GET", ["roles"]) => Ok(envelope(&[
                "mahasiswa", "dosen", "kaprodi", "dekan", "tu_fakultas", "tu_prodi", "admin",
            ])),

            ("GET", ["fakultas"]) => Ok(envelope(&*self.fakultas.borrow())),
            ("GET", ["prodi"]) | ("GET", ["jurusan"]) => {
                let fakultas_id = query_get(query, "fakultas_id");
                let prodi = self.prodi.borrow();
                let filtered: Vec<_> = prodi
                    .iter()
                    .filter(|p| fakultas_id.map(|f| p.fakultas_id == f).unwrap_or(true))
                    .collect();
                Ok(envelope(&filtered))
            }
            ("GET", ["tahun-akademik"]) => Ok(envelope(&*self.tahun.borrow())),
            ("POST", ["tahun-akademik"]) => self.create_tahun(body),
            ("PUT", ["tahun-akademik", id, "aktifkan"]) => self.aktifkan_tahun(id),

            ("GET", ["dokumen-akademik"]) => {
                let status = query_get(query, "status");
                let jenis = query_get(query, "jenis");
                let dokumen = self.dokumen.borrow();
                let filtered: Vec<_> = dokumen
                    .iter()
                    .filter(|d| {
                        status
                            .map(|s| serde_json::to_value(d.status).unwrap() == json!(s))
                            .unwrap_or(true)
                            && jenis
                                .map(|j| serde_json::to_value(d.jenis).unwrap() == json!(j))
                                .unwrap_or(true)
                    })
                    .collect();
                Ok(envelope(&filtered))
            }
            ("POST", ["dokumen-akademik"]) => self.upload_dokumen(payload),
            ("PUT", ["dokumen-akademik", id, "approve"]) => {
                self.decide_dokumen(id, DokumenStatus::Approved, None)
            }
            ("PUT", ["dokumen-akademik", id, "reject"]) => {
                let alasan = body
                    .and_then(|b| b.get("alasan"))
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string());
                self.decide_dokumen(id, DokumenStatus::Rejected, alasan)
            }
            ("DELETE", ["dokumen-akademik", id]) => {
                self.dokumen.borrow_mut().retain(|d| d.id != *id);
                Ok(Value::Null)
            }

            ("GET", ["materi-kuliah"]) => {
                let jadwal_id = query_get(query, "jadwal_id");
                let materi = self.materi.borrow();
                let filtered: Vec<_> = materi
                    .iter()
                    .filter(|m| jadwal_id.map(|j| m.jadwal_id == j).unwrap_or(true))
                    .collect();
                Ok(envelope(&filtered))
            }
            ("POST", ["materi-kuliah"]) => self.upload_materi(payload),
            ("DELETE", ["materi-kuliah", id]) => {
                self.materi.borrow_mut().retain(|m| m.id != *id);
                Ok(Value::Null)
            }

            ("GET", ["nilai"]) => {
                let jadwal_id = query_get(query, "jadwal_id");
                let mahasiswa_id = query_get(query, "mahasiswa_id");
                let nilai = self.nilai.borrow();
                let filtered: Vec<_> = nilai
                    .iter()
                    .filter(|n| {
                        jadwal_id.map(|j| n.jadwal_id == j).unwrap_or(true)
                            && mahasiswa_id.map(|m| n.mahasiswa_id == m).unwrap_or(true)
                    })
                    .collect();
                Ok(envelope(&filtered))
            }
            ("PUT", ["nilai"]) => self.upsert_nilai(body),
            ("PUT", ["nilai", id, "finalisasi"]) => self.finalisasi_nilai(id),

            ("GET", ["krs", "me"]) => {
                let current = self.current_user.borrow();
                let mahasiswa_id = current
                    .as_ref()
                    .map(|u| u.id.clone())
                    .unwrap_or_else(|| "u-mhs-1".into());
                let krs = self.krs.borrow();
                krs.iter()
                    .find(|k| k.mahasiswa_id == mahasiswa_id)
                    .map(to_value)
                    .unwrap_or(Err(ApiError::http(404, "KRS belum dibuat")))
            }
            ("GET", ["krs"]) => {
                let status = query_get(query, "status");
                let krs = self.krs.borrow();
                let filtered: Vec<_> = krs
                    .iter()
                    .filter(|k| {
                        status
                            .map(|s| serde_json::to_value(k.status).unwrap() == json!(s))
                            .unwrap_or(true)
                    })
                    .collect();
                Ok(envelope(&filtered))
            }
            ("POST", ["krs"]) => self.create_krs(body),
            ("POST", ["krs", id, "items"]) => self.add_krs_item(id, body),
            ("DELETE", ["krs", id, "items", item_id]) => self.remove_krs_item(id, item_id),
            ("PUT", ["krs", id, "submit"]) => self.move_krs(id, KrsStatus::Draft, KrsStatus::Submitted),
            ("PUT", ["krs", id, "approve"]) => {
                self.move_krs(id, KrsStatus::Submitted, KrsStatus::Approved)
            }
            ("PUT", ["krs", id, "reject"]) => {
                self.move_krs(id, KrsStatus::Submitted, KrsStatus::Draft)
            }

            ("GET", ["khs"]) => {
                let mahasiswa_id = query_get(query, "mahasiswa_id");
                let khs = self.khs.borrow();
                let filtered: Vec<_> = khs
                    .iter()
                    .filter(|k| mahasiswa_id.map(|m| k.mahasiswa_id == m).unwrap_or(true))
                    .collect();
                Ok(envelope(&filtered))
            }

            ("GET", ["jadwal-kuliah"]) => {
                let dosen_id = query_get(query, "dosen_id");
                let jadwal = self.jadwal.borrow();
                let filtered: Vec<_> = jadwal
                    .iter()
                    .filter(|j| dosen_id.map(|d| j.dosen_id == d).unwrap_or(true))
                    .collect();
                Ok(envelope(&filtered))
            }
            ("POST", ["jadwal-kuliah"]) => self.create_jadwal(body),
            ("DELETE", ["jadwal-kuliah", id]) => {
                self.jadwal.borrow_mut().retain(|j| j.id != *id);
                Ok(Value::Null)
            }
            ("GET", ["jadwal-ujian"]) => Ok(envelope(&*self.ujian.borrow())),

            ("GET", ["dashboard", _]) => {
                let users = self.users.borrow();
                Ok(serde_json::to_value(DashboardSummary {
                    total_mahasiswa: users.iter().filter(|u| u.role == Role::Mahasiswa).count()
                        as i64,
                    total_dosen: users.iter().filter(|u| u.role == Role::Dosen).count() as i64,
                    dokumen_pending: self
                        .dokumen
                        .borrow()
                        .iter()
                        .filter(|d| d.status.is_pending())
                        .count() as i64,
                    krs_submitted: self
                        .krs
                        .borrow()
                        .iter()
                        .filter(|k| k.status == KrsStatus::Submitted)
                        .count() as i64,
                })
                .expect("summary serializes"))
            }

            _ => Err(ApiError::http(404, format!("Endpoint tidak ditemukan: {}", path))),
        }
    }

    fn login(&self, body: Option<&Value>) -> Result<Value, ApiError> {
        let email = body
            .and_then(|b| b.get("email"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| ApiError::http(400, "Email wajib diisi"))?;
        let users = self.users.borrow();
        let found = users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or_else(|| ApiError::http(401, "Email atau kata sandi salah"))?;
        drop(users);
        *self.current_user.borrow_mut() = Some(found.clone());
        serde_json::to_value(LoginResponse {
            access_token: format!("demo-token-{}", found.id),
            token_type: "Bearer".into(),
            user: found,
        })
        .map_err(ApiError::parse)
    }

    fn create_user(&self, body: Option<&Value>) -> Result<Value, ApiError> {
        let request: CreateUserRequest = from_body(body)?;
        let created = UserProfile {
            id: format!("u-{}", Uuid::new_v4()),
            nama: request.nama,
            email: request.email,
            role: request.role,
            nim: request.nim,
            nidn: request.nidn,
            fakultas_id: request.fakultas_id,
            prodi_id: request.prodi_id,
        };
        self.users.borrow_mut().push(created.clone());
        to_value(&created)
    }

    fn update_user(&self, id: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let request: UpdateUserRequest = from_body(body)?;
        let mut users = self.users.borrow_mut();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| ApiError::http(404, "Pengguna tidak ditemukan"))?;
        if let Some(nama) = request.nama {
            user.nama = nama;
        }
        if let Some(email) = request.email {
            user.email = email;
        }
        if let Some(role) = request.role {
            user.role = role;
        }
        if let Some(prodi_id) = request.prodi_id {
            user.prodi_id = Some(prodi_id);
        }
        to_value(user)
    }

    fn create_tahun(&self, body: Option<&Value>) -> Result<Value, ApiError> {
        let nama = body
            .and_then(|b| b.get("nama"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| ApiError::http(400, "Nama tahun akademik wajib diisi"))?;
        let created = TahunAkademik {
            id: format!("ta-{}", Uuid::new_v4()),
            nama: nama.to_string(),
            is_aktif: false,
            mulai: None,
            selesai: None,
        };
        self.tahun.borrow_mut().push(created.clone());
        to_value(&created)
    }

    fn aktifkan_tahun(&self, id: &str) -> Result<Value, ApiError> {
        let mut tahun = self.tahun.borrow_mut();
        if !tahun.iter().any(|t| t.id == id) {
            return Err(ApiError::http(404, "Tahun akademik tidak ditemukan"));
        }
        for entry in tahun.iter_mut() {
            entry.is_aktif = entry.id == id;
        }
        to_value(tahun.iter().find(|t| t.id == id).unwrap())
    }

    fn upload_dokumen(&self, payload: &Payload) -> Result<Value, ApiError> {
        let (meta, file) = match payload {
            Payload::Multipart { meta, file } => (meta, file),
            _ => return Err(ApiError::http(400, "Unggahan berkas diperlukan")),
        };
        let meta: DokumenUploadMeta =
            serde_json::from_value(meta.clone()).map_err(|_| {
                ApiError::http(400, "Judul dan jenis dokumen wajib diisi")
            })?;
        let current = self.current_user.borrow();
        let (pengunggah_id, pengunggah_nama) = current
            .as_ref()
            .map(|u| (u.id.clone(), u.nama.clone()))
            .unwrap_or_else(|| ("u-mhs-1".into(), "Agus Pratama".into()));
        let created = DokumenAkademik {
            id: format!("d-{}", Uuid::new_v4()),
            judul: meta.judul,
            jenis: meta.jenis,
            file_name: file.file_name.clone(),
            file_url: Some(format!("/files/{}", file.file_name)),
            pengunggah_id,
            pengunggah_nama,
            status: DokumenStatus::Pending,
            approver_nama: None,
            alasan_penolakan: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.dokumen.borrow_mut().push(created.clone());
        to_value(&created)
    }

    fn decide_dokumen(
        &self,
        id: &str,
        status: DokumenStatus,
        alasan: Option<String>,
    ) -> Result<Value, ApiError> {
        let approver = self
            .current_user
            .borrow()
            .as_ref()
            .map(|u| u.nama.clone())
            .unwrap_or_else(|| "Dr. Sri Wahyuni".into());
        let mut dokumen = self.dokumen.borrow_mut();
        let entry = dokumen
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| ApiError::http(404, "Dokumen tidak ditemukan"))?;
        if !entry.status.is_pending() {
            return Err(ApiError::http(409, "Dokumen sudah diputuskan"));
        }
        entry.status = status;
        entry.approver_nama = Some(approver);
        entry.alasan_penolakan = alasan;
        entry.updated_at = Some(Utc::now());
        to_value(entry)
    }

    fn upload_materi(&self, payload: &Payload) -> Result<Value, ApiError> {
        let (meta, file) = match payload {
            Payload::Multipart { meta, file } => (meta, file),
            _ => return Err(ApiError::http(400, "Unggahan berkas diperlukan")),
        };
        let meta: MateriUploadMeta = serde_json::from_value(meta.clone())
            .map_err(|_| ApiError::http(400, "Judul dan jadwal wajib diisi"))?;
        let jadwal = self.jadwal.borrow();
        let matkul = jadwal
            .iter()
            .find(|j| j.id == meta.jadwal_id)
            .ok_or_else(|| ApiError::http(404, "Jadwal tidak ditemukan"))?;
        let created = MateriKuliah {
            id: format!("m-{}", Uuid::new_v4()),
            judul: meta.judul,
            deskripsi: meta.deskripsi,
            jadwal_id: matkul.id.clone(),
            nama_matkul: matkul.nama_matkul.clone(),
            file_name: file.file_name.clone(),
            file_url: Some(format!("/files/{}", file.file_name)),
            dosen_nama: matkul.dosen_nama.clone(),
            created_at: Utc::now(),
        };
        drop(jadwal);
        self.materi.borrow_mut().push(created.clone());
        to_value(&created)
    }

    fn upsert_nilai(&self, body: Option<&Value>) -> Result<Value, ApiError> {
        let request: UpsertNilaiRequest = from_body(body)?;
        for komponen in [request.tugas, request.uts, request.uas] {
            if !grade::komponen_valid(komponen) {
                return Err(ApiError::http(400, "Nilai komponen harus 0-100"));
            }
        }
        let mut nilai = self.nilai.borrow_mut();
        let entry = nilai
            .iter_mut()
            .find(|n| n.mahasiswa_id == request.mahasiswa_id && n.jadwal_id == request.jadwal_id)
            .ok_or_else(|| ApiError::http(404, "Baris nilai tidak ditemukan"))?;
        if entry.is_final {
            return Err(ApiError::http(409, "Nilai sudah difinalisasi"));
        }
        let akhir = grade::nilai_akhir(request.tugas, request.uts, request.uas);
        entry.tugas = Some(request.tugas);
        entry.uts = Some(request.uts);
        entry.uas = Some(request.uas);
        entry.nilai_akhir = Some(akhir);
        entry.nilai_huruf = Some(grade::huruf_detail(akhir).into());
        to_value(entry)
    }

    fn finalisasi_nilai(&self, id: &str) -> Result<Value, ApiError> {
        if !self.periode_nilai_terbuka.get() {
            return Err(ApiError::http(
                409,
                "Finalisasi nilai di luar periode penilaian",
            ));
        }
        let mut nilai = self.nilai.borrow_mut();
        let entry = nilai
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| ApiError::http(404, "Baris nilai tidak ditemukan"))?;
        if entry.nilai_akhir.is_none() {
            return Err(ApiError::http(400, "Nilai belum lengkap"));
        }
        entry.is_final = true;
        to_value(entry)
    }

    fn create_krs(&self, body: Option<&Value>) -> Result<Value, ApiError> {
        let tahun_akademik_id = body
            .and_then(|b| b.get("tahun_akademik_id"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| ApiError::http(400, "Tahun akademik wajib diisi"))?;
        let current = self.current_user.borrow();
        let mahasiswa = current
            .as_ref()
            .ok_or_else(|| ApiError::http(401, "Belum masuk"))?;
        let tahun_nama = self
            .tahun
            .borrow()
            .iter()
            .find(|t| t.id == tahun_akademik_id)
            .map(|t| t.nama.clone());
        let created = Krs {
            id: format!("k-{}", Uuid::new_v4()),
            mahasiswa_id: mahasiswa.id.clone(),
            mahasiswa_nama: mahasiswa.nama.clone(),
            nim: mahasiswa.nim.clone().unwrap_or_default(),
            tahun_akademik_id: tahun_akademik_id.to_string(),
            tahun_akademik_nama: tahun_nama,
            status: KrsStatus::Draft,
            items: Vec::new(),
            created_at: Utc::now(),
        };
        drop(current);
        self.krs.borrow_mut().push(created.clone());
        to_value(&created)
    }

    fn add_krs_item(&self, krs_id: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let jadwal_id = body
            .and_then(|b| b.get("jadwal_id"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| ApiError::http(400, "Jadwal wajib dipilih"))?;
        let jadwal = self.jadwal.borrow();
        let course = jadwal
            .iter()
            .find(|j| j.id == jadwal_id)
            .ok_or_else(|| ApiError::http(404, "Jadwal tidak ditemukan"))?
            .clone();
        drop(jadwal);
        let mut krs = self.krs.borrow_mut();
        let entry = krs
            .iter_mut()
            .find(|k| k.id == krs_id)
            .ok_or_else(|| ApiError::http(404, "KRS tidak ditemukan"))?;
        if !entry.status.is_editable() {
            return Err(ApiError::http(409, "KRS sudah diajukan"));
        }
        if entry.items.iter().any(|item| item.jadwal_id == course.id) {
            return Err(ApiError::http(409, "Mata kuliah sudah ada di KRS"));
        }
        entry.items.push(KrsItem {
            id: format!("ki-{}", Uuid::new_v4()),
            jadwal_id: course.id,
            kode_matkul: course.kode_matkul,
            nama_matkul: course.nama_matkul,
            sks: course.sks,
            dosen_nama: course.dosen_nama,
            hari: course.hari,
            jam_mulai: course.jam_mulai,
            jam_selesai: course.jam_selesai,
            ruangan: course.ruangan,
        });
        to_value(entry)
    }

    fn remove_krs_item(&self, krs_id: &str, item_id: &str) -> Result<Value, ApiError> {
        let mut krs = self.krs.borrow_mut();
        let entry = krs
            .iter_mut()
            .find(|k| k.id == krs_id)
            .ok_or_else(|| ApiError::http(404, "KRS tidak ditemukan"))?;
        if !entry.status.is_editable() {
            return Err(ApiError::http(409, "KRS sudah diajukan"));
        }
        entry.items.retain(|item| item.id != item_id);
        to_value(entry)
    }

    fn move_krs(&self, id: &str, from: KrsStatus, to: KrsStatus) -> Result<Value, ApiError> {
        let mut krs = self.krs.borrow_mut();
        let entry = krs
            .iter_mut()
            .find(|k| k.id == id)
            .ok_or_else(|| ApiError::http(404, "KRS tidak ditemukan"))?;
        if entry.status != from {
            return Err(ApiError::http(
                409,
                format!("KRS berstatus {}, bukan {}", entry.status.label(), from.label()),
            ));
        }
        entry.status = to;
        to_value(entry)
    }

    fn create_jadwal(&self, body: Option<&Value>) -> Result<Value, ApiError> {
        let request: CreateJadwalRequest = from_body(body)?;
        let dosen_nama = self
            .users
            .borrow()
            .iter()
            .find(|u| u.id == request.dosen_id)
            .map(|u| u.nama.clone())
            .ok_or_else(|| ApiError::http(404, "Dosen tidak ditemukan"))?;
        let created = JadwalKuliah {
            id: format!("j-{}", Uuid::new_v4()),
            kode_matkul: request.kode_matkul,
            nama_matkul: request.nama_matkul,
            sks: request.sks,
            dosen_id: request.dosen_id,
            dosen_nama,
            ruangan: request.ruangan,
            hari: request.hari,
            jam_mulai: request.jam_mulai,
            jam_selesai: request.jam_selesai,
            tahun_akademik_id: request.tahun_akademik_id,
        };
        self.jadwal.borrow_mut().push(created.clone());
        to_value(&created)
    }
}

fn query_get<'a>(query: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value.as_str())
}

fn envelope<T: serde::Serialize>(items: &T) -> Value {
    json!({ "data": serde_json::to_value(items).expect("fixture data serializes") })
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(ApiError::parse)
}

fn from_body<T: serde::de::DeserializeOwned>(body: Option<&Value>) -> Result<T, ApiError> {
    let body = body.ok_or_else(|| ApiError::http(400, "Body permintaan kosong"))?;
    serde_json::from_value(body.clone())
        .map_err(|err| ApiError::http(400, format!("Body permintaan tidak valid: {}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(store: &FixtureStore, path: &str) -> Value {
        store
            .respond(&Method::GET, path, &[], &Payload::None)
            .unwrap()
    }

    #[test]
    fn login_then_me_round_trip() {
        let store = FixtureStore::seeded();
        let response = store
            .respond(
                &Method::POST,
                "/auth/login",
                &[],
                &Payload::Json(json!({ "email": "kaprodi@univ.ac.id", "password": "x" })),
            )
            .unwrap();
        assert_eq!(response["token_type"], "Bearer");
        assert_eq!(response["user"]["role"], "kaprodi");
        let me = get(&store, "/auth/me");
        assert_eq!(me["id"], "u-kaprodi");
    }

    #[test]
    fn unknown_email_is_rejected() {
        let store = FixtureStore::seeded();
        let err = store
            .respond(
                &Method::POST,
                "/auth/login",
                &[],
                &Payload::Json(json!({ "email": "nobody@univ.ac.id", "password": "x" })),
            )
            .unwrap_err();
        assert_eq!(err.status, Some(401));
    }

    #[test]
    fn approve_is_one_way_from_pending() {
        let store = FixtureStore::seeded();
        let approved = store
            .respond(&Method::PUT, "/dokumen-akademik/d-1/approve", &[], &Payload::None)
            .unwrap();
        assert_eq!(approved["status"], "Approved");

        // Already decided documents cannot be decided again.
        let err = store
            .respond(&Method::PUT, "/dokumen-akademik/d-1/reject", &[], &Payload::None)
            .unwrap_err();
        assert_eq!(err.status, Some(409));
    }

    #[test]
    fn finalize_outside_period_answers_409() {
        let store = FixtureStore::seeded();
        store.set_periode_nilai(false);
        let err = store
            .respond(&Method::PUT, "/nilai/n-1/finalisasi", &[], &Payload::None)
            .unwrap_err();
        assert_eq!(err.status, Some(409));
        assert!(err.message.contains("periode"));

        // The row stays unfinalized.
        let rows = get(&store, "/nilai");
        let row = rows["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|n| n["id"] == "n-1")
            .unwrap()
            .clone();
        assert_eq!(row["is_final"], false);

        store.set_periode_nilai(true);
        let finalized = store
            .respond(&Method::PUT, "/nilai/n-1/finalisasi", &[], &Payload::None)
            .unwrap();
        assert_eq!(finalized["is_final"], true);
    }

    #[test]
    fn finalized_rows_refuse_score_updates() {
        let store = FixtureStore::seeded();
        let err = store
            .respond(
                &Method::PUT,
                "/nilai",
                &[],
                &Payload::Json(json!({
                    "mahasiswa_id": "u-mhs-2",
                    "jadwal_id": "j-1",
                    "tugas": 10.0, "uts": 10.0, "uas": 10.0
                })),
            )
            .unwrap_err();
        assert_eq!(err.status, Some(409));
    }

    #[test]
    fn score_components_outside_range_are_rejected() {
        let store = FixtureStore::seeded();
        let err = store
            .respond(
                &Method::PUT,
                "/nilai",
                &[],
                &Payload::Json(json!({
                    "mahasiswa_id": "u-mhs-1",
                    "jadwal_id": "j-1",
                    "tugas": 120.0, "uts": 80.0, "uas": 80.0
                })),
            )
            .unwrap_err();
        assert_eq!(err.status, Some(400));
    }

    #[test]
    fn krs_lifecycle_draft_submit_approve() {
        let store = FixtureStore::seeded();
        store
            .respond(
                &Method::POST,
                "/krs/k-1/items",
                &[],
                &Payload::Json(json!({ "jadwal_id": "j-2" })),
            )
            .unwrap();
        let submitted = store
            .respond(&Method::PUT, "/krs/k-1/submit", &[], &Payload::None)
            .unwrap();
        assert_eq!(submitted["status"], "Submitted");

        // Submitted KRS is no longer editable.
        let err = store
            .respond(
                &Method::POST,
                "/krs/k-1/items",
                &[],
                &Payload::Json(json!({ "jadwal_id": "j-3" })),
            )
            .unwrap_err();
        assert_eq!(err.status, Some(409));

        let approved = store
            .respond(&Method::PUT, "/krs/k-1/approve", &[], &Payload::None)
            .unwrap();
        assert_eq!(approved["status"], "Approved");
    }

    #[test]
    fn krs_reject_returns_to_draft() {
        let store = FixtureStore::seeded();
        let rejected = store
            .respond(&Method::PUT, "/krs/k-2/reject", &[], &Payload::None)
            .unwrap();
        assert_eq!(rejected["status"], "Draft");
    }

    #[test]
    fn duplicate_course_in_krs_is_a_conflict() {
        let store = FixtureStore::seeded();
        let err = store
            .respond(
                &Method::POST,
                "/krs/k-1/items",
                &[],
                &Payload::Json(json!({ "jadwal_id": "j-1" })),
            )
            .unwrap_err();
        assert_eq!(err.status, Some(409));
    }

    #[test]
    fn activating_a_term_deactivates_the_rest() {
        let store = FixtureStore::seeded();
        store
            .respond(&Method::PUT, "/tahun-akademik/ta-1/aktifkan", &[], &Payload::None)
            .unwrap();
        let tahun = get(&store, "/tahun-akademik");
        let rows = tahun["data"].as_array().unwrap();
        let aktif: Vec<_> = rows.iter().filter(|t| t["is_aktif"] == true).collect();
        assert_eq!(aktif.len(), 1);
        assert_eq!(aktif[0]["id"], "ta-1");
    }

    #[test]
    fn lists_are_enveloped() {
        let store = FixtureStore::seeded();
        assert!(get(&store, "/users")["data"].is_array());
        assert!(get(&store, "/fakultas")["data"].is_array());
        assert!(get(&store, "/jadwal-kuliah")["data"].is_array());
    }

    #[test]
    fn prodi_filter_by_fakultas() {
        let store = FixtureStore::seeded();
        let rows = store
            .respond(
                &Method::GET,
                "/prodi",
                &[("fakultas_id", "f-fe".to_string())],
                &Payload::None,
            )
            .unwrap();
        let rows = rows["data"].as_array().unwrap().clone();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["kode"], "MJ");
    }

    #[test]
    fn unknown_endpoint_is_404() {
        let store = FixtureStore::seeded();
        let err = store
            .respond(&Method::GET, "/unknown", &[], &Payload::None)
            .unwrap_err();
        assert_eq!(err.status, Some(404));
    }
}
