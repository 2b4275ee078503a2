pub mod url_validation;

pub use url_validation::{BlockedHost, ensure_public_url, is_private_ip, is_private_url};
