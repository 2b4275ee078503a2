use super::types::Command;

/// Parse `input` as a command. Returns `None` for ordinary text.
///
/// The first whitespace-separated token is the command; an `@botname`
/// suffix is dropped and matching is case-insensitive. Arguments are ignored.
pub fn parse_command(input: &str) -> Option<Command> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let token = trimmed.split(char::is_whitespace).next()?;
    let name = token.split('@').next().unwrap_or(token).to_lowercase();

    match name.as_str() {
        "/start" => Some(Command::Start),
        "/help" | "/?" => Some(Command::Help),
        "/stop" => Some(Command::Stop),
        _ => Some(Command::Unknown(name.trim_start_matches('/').to_string())),
    }
}
