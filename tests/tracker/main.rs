//! Integration tests for the tracker: durable scan, remote sync, session cache.

mod support;
mod init;
mod scan;
mod sessions;
mod sync;

#[cfg(feature = "http")]
mod http;
