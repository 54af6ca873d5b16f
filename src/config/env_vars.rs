/// Expand `$VAR` and `${VAR}` references in a configuration value.
///
/// Unset variables expand to an empty string, so an unset credential shows
/// up as a missing option during validation. Expanded values are not
/// scanned again. A lone `$` or an unterminated `${` is kept literally.
pub fn expand_env_vars(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(pos) = rest.find('$') {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => {
                    result.push_str(&lookup(&braced[..end]));
                    rest = &braced[end + 1..];
                }
                None => {
                    result.push_str(&rest[pos..]);
                    rest = "";
                }
            }
            continue;
        }

        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if name_len == 0 {
            result.push('$');
        } else {
            result.push_str(&lookup(&after[..name_len]));
        }
        rest = &after[name_len..];
    }

    result.push_str(rest);
    result
}

fn lookup(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}
