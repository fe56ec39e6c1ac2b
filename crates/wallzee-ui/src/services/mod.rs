//! Browser services: REST client and file download trigger.

pub(crate) mod api;
pub(crate) mod download;
