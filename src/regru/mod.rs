//! Client for the reg.ru regru2 zone API.

pub mod client;
pub mod form;
pub mod types;

/// Path fragments of the zone calls, relative to the configured endpoint.
pub mod paths {
    pub const ADD_ALIAS: &[&str] = &["zone", "add_alias"];
    pub const ADD_AAAA: &[&str] = &["zone", "add_aaaa"];
    pub const ADD_CNAME: &[&str] = &["zone", "add_cname"];
    pub const ADD_MX: &[&str] = &["zone", "add_mx"];
    pub const ADD_TXT: &[&str] = &["zone", "add_txt"];
    pub const REMOVE_RECORD: &[&str] = &["zone", "remove_record"];
}
