pub mod editor;
pub mod endpoints;
pub mod storage;
