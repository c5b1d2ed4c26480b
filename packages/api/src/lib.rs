pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod generation;
pub mod session;
pub mod transport;

#[cfg(test)]
mod mock;

pub use client::{
    ApiClient, DateRange, Listing, LoginCredentials, ProfileUpdate, ProjectDetail, RegisterData,
};
pub use config::ApiConfig;
pub use dashboard::Dashboard;
pub use error::ApiError;
pub use generation::{Generation, Ticket};
pub use session::{MemoryTokenStore, Session, TokenStore, Tokens};
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, Transport};

/// The client as the application uses it.
pub type HttpClient = ApiClient<HttpTransport>;

/// Build an [`HttpClient`] for `config`, sharing `session`.
pub fn connect(config: &ApiConfig, session: Session) -> Result<HttpClient, ApiError> {
    Ok(ApiClient::new(HttpTransport::new(config)?, session))
}
