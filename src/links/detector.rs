use super::types::LinkCandidate;
use std::collections::HashSet;
use url::Url;

/// Detect HTTP/HTTPS URLs in text. Returns deduplicated candidates in order of appearance.
///
/// Only strings that parse as absolute URLs with a host count; bare domains
/// (`example.com`) and other schemes are ignored.
pub fn detect_urls(text: &str) -> Vec<LinkCandidate> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for token in text.split_whitespace() {
        let raw = extract_candidate(token);
        if let Some(url) = try_parse_url(raw)
            && seen.insert(url.to_string())
        {
            candidates.push(LinkCandidate {
                raw: raw.to_string(),
                url,
            });
        }
    }

    candidates
}

fn extract_candidate(token: &str) -> &str {
    // Sentence punctuation can follow a closing bracket: `(url).`, `<url>,`
    let token = token.trim_end_matches(['.', ',', ';', '!', '?']);

    if let Some(start) = token.find("](")
        && let Some(end) = token[start..].find(')')
    {
        return strip_trailing_punctuation(&token[start + 2..start + end]);
    }

    let unwrapped = if let Some(inner) = token.strip_prefix('<') {
        inner.strip_suffix('>').unwrap_or(inner)
    } else if let Some(inner) = token.strip_prefix('(') {
        inner.strip_suffix(')').unwrap_or(inner)
    } else {
        token
    };

    strip_trailing_punctuation(unwrapped)
}

fn strip_trailing_punctuation(s: &str) -> &str {
    s.trim_end_matches(['.', ',', ';', '!', '?', ')'])
}

fn try_parse_url(candidate: &str) -> Option<Url> {
    let url = Url::parse(candidate).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Some(url),
        _ => None,
    }
}
