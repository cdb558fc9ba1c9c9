//! Portfolio backend: the public portfolio content API and the rate-limited
//! admin login guard.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
mod test_support;
