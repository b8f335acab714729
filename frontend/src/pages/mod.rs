pub mod dashboard;
pub mod dokumen;
pub mod jadwal;
pub mod khs;
pub mod krs;
pub mod login;
pub mod master;
pub mod materi;
pub mod nilai;
pub mod users;
