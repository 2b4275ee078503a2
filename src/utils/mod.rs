pub mod text;

pub use text::{log_preview, truncate_with_ellipsis};
