//! Adapters that feed data into or expose the service: CSV seed files and HTTP.

pub mod csv;
pub mod http;
