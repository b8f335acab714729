pub mod format;
pub mod grade;
pub mod storage;
pub mod upload;
