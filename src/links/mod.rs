pub mod detector;
pub mod probe;
pub mod types;

pub use detector::detect_urls;
pub use probe::{HttpProbe, LinkProbe};
pub use types::{LinkCandidate, LinkCheck, LinkConfig, Reachability, UnreachableReason};
