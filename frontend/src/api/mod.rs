pub mod auth;
pub mod client;
pub mod dashboard;
pub mod dokumen;
pub mod fixture;
pub mod jadwal;
pub mod krs;
pub mod master;
pub mod materi;
pub mod nilai;
pub mod types;
pub mod users;

pub use client::ApiClient;
pub use types::ApiError;
