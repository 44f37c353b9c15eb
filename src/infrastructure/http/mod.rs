//! Shared HTTP transport for providers and the vector store

mod client;

pub use client::{HttpClient, HttpClientTrait, HttpMethod, HttpResponse};

#[cfg(test)]
pub use client::mock::MockHttpClient;
