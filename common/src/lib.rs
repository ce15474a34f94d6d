//! Models shared by the mailforge server and its browser client.
//!
//! Everything here is plain data plus the validation rules both sides apply,
//! so the client can reject a bad endpoint before sending it and the server
//! enforces the same rules before persisting it.

pub mod model;
pub mod requests;
