/// Bot commands recognized in direct messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Stop,
    /// Any other `/word`, lowercased, without the leading slash.
    Unknown(String),
}
