use std::sync::OnceLock;

use regex::Regex;

/// Placeholder pattern: `{{ env.VAR }}` or `{{ env.VAR | default("fallback") }}`
fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// Runs over the config text before deserialization so config structs use
/// plain `String`/`SecretString`. A missing variable is an error unless the
/// placeholder carries a `default("…")`. TOML comment lines pass through
/// unchanged.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut cursor = 0;
        for captures in placeholder().captures_iter(line) {
            let whole = captures.get(0).expect("capture group 0 always present");
            output.push_str(&line[cursor..whole.start()]);
            cursor = whole.end();

            let key = &captures[1];
            let Some(var_name) = key.strip_prefix("env.") else {
                return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
            };
            if var_name.contains('.') {
                return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
            }

            match std::env::var(var_name) {
                Ok(value) => output.push_str(&value),
                Err(_) => match captures.get(2) {
                    Some(default) => output.push_str(default.as_str()),
                    None => return Err(format!("environment variable not found: `{var_name}`")),
                },
            }
        }
        output.push_str(&line[cursor..]);
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}
