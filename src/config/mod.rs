pub mod credentials;
pub mod schema;

pub use credentials::Credentials;
pub use schema::{BrowserSettings, Selectors, Settings};
