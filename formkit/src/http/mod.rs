mod client;
pub use client::{
    HttpClient, HttpClientError, HttpClientResponse, HttpClientResult,
};
