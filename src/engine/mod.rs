pub mod api_client;
pub mod config;
pub mod engine;
pub mod protocol;
pub mod resolver;

#[cfg(test)]
pub mod test_support;
