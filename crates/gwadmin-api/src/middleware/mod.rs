//! Tower layers applied around the router.

pub mod cors;
