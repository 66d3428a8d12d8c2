/// Split response-file contents into tokens.
///
/// Whitespace separates tokens. Single quotes are literal, double quotes
/// group and honor backslash escapes, and a bare backslash escapes the next
/// character. A quoted empty string produces an empty token.
pub fn split_response_file(contents: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // Set once a quote opens so that `''` still yields a token.
    let mut in_token = false;
    let mut escaping = false;
    let mut single = false;
    let mut double = false;

    for c in contents.chars() {
        if escaping {
            current.push(c);
            escaping = false;
            continue;
        }

        if single {
            if c == '\'' {
                single = false;
            } else {
                current.push(c);
            }
            continue;
        }

        if double {
            match c {
                '"' => double = false,
                '\\' => escaping = true,
                _ => current.push(c),
            }
            continue;
        }

        match c {
            '\\' => {
                escaping = true;
                in_token = true;
            }
            '\'' => {
                single = true;
                in_token = true;
            }
            '"' => {
                double = true;
                in_token = true;
            }
            ' ' | '\t' | '\r' | '\n' => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            _ => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    tokens
}
