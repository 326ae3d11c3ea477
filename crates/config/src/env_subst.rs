/// Replace `${ENV_VAR}` placeholders in raw config text.
///
/// Unset variables and unterminated placeholders are left as written, so a
/// missing `DISCORD_TOKEN` shows up as a literal `${DISCORD_TOKEN}` instead of
/// an empty string.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Same as [`substitute_env`] with an injectable lookup, for tests.
fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find('}') {
            Some(end) if end > 0 => {
                let name = &after_open[..end];
                match lookup(name) {
                    Some(value) => result.push_str(&value),
                    None => result.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after_open[end + 1..];
            },
            _ => {
                // `${}` or no closing brace: keep the opener literally.
                result.push_str("${");
                rest = after_open;
            },
        }
    }
    result.push_str(rest);

    result
}
