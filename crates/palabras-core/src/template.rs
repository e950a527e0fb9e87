//! `{name}` placeholder substitution for prompt templates.
//!
//! `{{` and `}}` produce literal braces. Any other brace usage, or a
//! placeholder with no value supplied, is an error.

/// Substitute `{name}` placeholders in `template` from `vars`.
pub fn format_template(template: &str, vars: &[(&str, &str)]) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                let mut closed = false;
                for (_, n) in chars.by_ref() {
                    if n == '}' {
                        closed = true;
                        break;
                    }
                    if n == '{' {
                        return Err(format!("nested '{{' at byte {pos}"));
                    }
                    name.push(n);
                }
                if !closed {
                    return Err(format!("unclosed '{{' at byte {pos}"));
                }
                let value = vars
                    .iter()
                    .find(|(k, _)| *k == name.trim())
                    .map(|(_, v)| *v)
                    .ok_or_else(|| format!("unknown placeholder '{{{name}}}'"))?;
                out.push_str(value);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(format!("single '}}' at byte {pos}"));
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Names of all placeholders in `template`, in order of appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        if let Some(stripped) = after.strip_prefix('{') {
            rest = stripped;
            continue;
        }
        match after.find('}') {
            Some(end) => {
                names.push(after[..end].trim().to_string());
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_word() {
        let out = format_template("Define {word}", &[("word", "casa")]).unwrap();
        assert_eq!(out, "Define casa");
    }

    #[test]
    fn repeated_and_multiple_placeholders() {
        let out = format_template(
            "{word} / {word} ({lang})",
            &[("word", "libro"), ("lang", "es")],
        )
        .unwrap();
        assert_eq!(out, "libro / libro (es)");
    }

    #[test]
    fn escaped_braces() {
        let out = format_template("Reply as {{\"word\": \"{word}\"}}", &[("word", "perro")]).unwrap();
        assert_eq!(out, "Reply as {\"word\": \"perro\"}");
    }

    #[test]
    fn unknown_placeholder_fails() {
        let err = format_template("Define {palabra}", &[("word", "casa")]).unwrap_err();
        assert!(err.contains("palabra"), "got: {err}");
    }

    #[test]
    fn unbalanced_braces_fail() {
        assert!(format_template("Define {word", &[("word", "x")]).is_err());
        assert!(format_template("Define word}", &[("word", "x")]).is_err());
    }

    #[test]
    fn lists_placeholders() {
        assert_eq!(
            placeholders("Use {word} in {{two}} sentences, {style}"),
            vec!["word".to_string(), "style".to_string()]
        );
        assert!(placeholders("no placeholders").is_empty());
    }
}
