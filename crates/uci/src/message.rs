//! Predicates and extractors for lines sent from engine to GUI.

/// `true` for the line that ends the `uci` handshake step.
pub fn is_uciok(line: &str) -> bool {
    line == "uciok"
}

/// `true` for the reply to `isready`.
pub fn is_readyok(line: &str) -> bool {
    line == "readyok"
}

/// `true` for the line that ends a search.
pub fn is_bestmove(line: &str) -> bool {
    line == "bestmove" || line.starts_with("bestmove ")
}

/// Parse `bestmove <mv> [ponder <mv>]`.
pub fn parse_bestmove(line: &str) -> Option<(String, Option<String>)> {
    let mut parts = line.split_whitespace();
    if parts.next()? != "bestmove" {
        return None;
    }
    let mv = parts.next()?.to_string();
    let ponder = match (parts.next(), parts.next()) {
        (Some("ponder"), Some(p)) => Some(p.to_string()),
        _ => None,
    };
    Some((mv, ponder))
}

/// Engine name from an `id name <name>` line.
pub fn parse_id_name(line: &str) -> Option<&str> {
    line.strip_prefix("id name ").map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handshake_predicates_are_exact() {
        assert!(is_uciok("uciok"));
        assert!(!is_uciok("uciok "));
        assert!(!is_uciok("info string uciok"));
        assert!(is_readyok("readyok"));
        assert!(!is_readyok("ready"));
    }

    #[test]
    fn bestmove_with_ponder() {
        assert_eq!(
            parse_bestmove("bestmove e2e4 ponder e7e5"),
            Some(("e2e4".to_string(), Some("e7e5".to_string())))
        );
        assert_eq!(parse_bestmove("bestmove g1f3"), Some(("g1f3".to_string(), None)));
        assert_eq!(parse_bestmove("bestmove"), None);
        assert_eq!(parse_bestmove("info depth 1"), None);
        assert!(is_bestmove("bestmove (none)"));
        assert!(!is_bestmove("bestmoves"));
    }
}
