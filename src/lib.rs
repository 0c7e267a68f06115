pub mod analysis;
pub mod config;
pub mod correlation;
pub mod error;
pub mod ids;
pub mod model;

#[cfg(test)]
pub mod test_support;
