pub(crate) mod snippet_repository;
pub(crate) mod tag_repository;

/// Escapes `LIKE` wildcards so user input only matches literally; pair with
/// `LikeExpr::escape('\\')`.
pub(super) fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("plain-tag"), "plain-tag");
    }
}
