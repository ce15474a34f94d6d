pub mod endpoint;
pub mod remote;
pub mod render;
pub mod session;
pub mod storage;
