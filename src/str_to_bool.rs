/// Parse one of the accepted boolean spellings.
///
/// Matching is case-sensitive: `true t yes y 1` are true, `false f no n 0` are
/// false, anything else is rejected.
pub fn str_to_bool(src: &str) -> Option<bool> {
    match src {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
