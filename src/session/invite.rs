//! Invite Links
//!
//! A session id rides a shareable URL as a single query parameter. On
//! load the parameter is consumed and stripped from the visible address
//! before the id is used to join as a client.

use uuid::Uuid;

/// Query parameter carrying the session id.
pub const SESSION_PARAM: &str = "session";

/// Build a shareable invite link for a session.
pub fn invite_link(base_url: &str, session_id: Uuid) -> String {
    let (without_fragment, fragment) = split_fragment(base_url);
    let separator = if without_fragment.contains('?') { '&' } else { '?' };
    format!("{without_fragment}{separator}{SESSION_PARAM}={session_id}{fragment}")
}

/// Extract the session id from a URL, returning it together with the
/// URL stripped of the parameter (for cleaning the address bar).
/// Returns `None` when no parseable session parameter is present.
pub fn extract_session_id(url: &str) -> Option<(Uuid, String)> {
    let (without_fragment, fragment) = split_fragment(url);
    let (base, query) = match without_fragment.split_once('?') {
        Some((base, query)) => (base, query),
        None => return None,
    };

    let mut session_id = None;
    let mut kept = Vec::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key == SESSION_PARAM && session_id.is_none() {
            if let Ok(id) = Uuid::parse_str(value) {
                session_id = Some(id);
                continue;
            }
        }
        kept.push(pair);
    }

    let session_id = session_id?;
    let stripped = if kept.is_empty() {
        format!("{base}{fragment}")
    } else {
        format!("{base}?{}{fragment}", kept.join("&"))
    };
    Some((session_id, stripped))
}

fn split_fragment(url: &str) -> (&str, &str) {
    match url.find('#') {
        Some(pos) => (&url[..pos], &url[pos..]),
        None => (url, ""),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_roundtrip() {
        let id = Uuid::new_v4();
        let link = invite_link("https://example.com/run", id);
        let (extracted, stripped) = extract_session_id(&link).unwrap();
        assert_eq!(extracted, id);
        assert_eq!(stripped, "https://example.com/run");
    }

    #[test]
    fn test_invite_appends_to_existing_query() {
        let id = Uuid::new_v4();
        let link = invite_link("https://example.com/run?mode=normal", id);
        assert!(link.starts_with("https://example.com/run?mode=normal&session="));

        let (extracted, stripped) = extract_session_id(&link).unwrap();
        assert_eq!(extracted, id);
        assert_eq!(stripped, "https://example.com/run?mode=normal");
    }

    #[test]
    fn test_fragment_preserved() {
        let id = Uuid::new_v4();
        let link = invite_link("https://example.com/run#lobby", id);
        assert!(link.ends_with("#lobby"));

        let (extracted, stripped) = extract_session_id(&link).unwrap();
        assert_eq!(extracted, id);
        assert_eq!(stripped, "https://example.com/run#lobby");
    }

    #[test]
    fn test_missing_or_garbled_session_is_none() {
        assert!(extract_session_id("https://example.com/run").is_none());
        assert!(extract_session_id("https://example.com/run?mode=normal").is_none());
        assert!(extract_session_id("https://example.com/run?session=not-a-uuid").is_none());
    }
}
