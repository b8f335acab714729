pub mod approval;
pub mod panel;
pub mod repository;
pub mod view_model;

pub use approval::KrsApprovalPage;
pub use panel::KrsPage;
