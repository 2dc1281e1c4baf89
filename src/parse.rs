//! Purpose: Tokenize the `WRITE` variable into `[path](token)` instructions.
//! Exports: `WRITE_VAR`, `RawInstruction`, `WriteInstruction`, `read_write_var`, `tokenize_write`, `parse_write_env`.
//! Role: Grammar front-end; `parse_write_env` fuses tokenizing with token resolution.
//! Invariants: Fragments are split on `;`, trimmed, and empty fragments dropped.
//! Invariants: One malformed fragment fails the whole call; no partial results.
//! Invariants: Output order matches fragment order.
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::decode::decode_content;
use crate::env::GetEnv;
use crate::error::{ErrorKind, Result};

pub const WRITE_VAR: &str = "WRITE";

// Unanchored, lazy: path runs to the first `](`, token to the first `)` after it.
static FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(.+?)\]\((.+?)\)").expect("valid fragment pattern")
});

/// A fragment split into its path and its still-encoded token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawInstruction {
    pub path: String,
    pub token: String,
}

/// A path paired with fully resolved content.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WriteInstruction {
    pub file_path: String,
    pub content: Vec<u8>,
}

/// Reads `WRITE`; absent and empty are both "not set".
pub fn read_write_var(env: &impl GetEnv) -> Result<String> {
    match env.get_lossy(WRITE_VAR) {
        Some(raw) if !raw.is_empty() => Ok(raw),
        _ => Err(ErrorKind::NotSet.into()),
    }
}

pub fn tokenize_write(raw: &str) -> Result<Vec<RawInstruction>> {
    let fragments: Vec<&str> = raw
        .split(';')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect();

    if fragments.is_empty() {
        return Err(ErrorKind::NotSet.into());
    }

    fragments
        .into_iter()
        .map(|fragment| -> Result<RawInstruction> {
            let captures = FRAGMENT
                .captures(fragment)
                .ok_or(ErrorKind::InvalidFormat)?;
            Ok(RawInstruction {
                path: captures[1].to_string(),
                token: captures[2].to_string(),
            })
        })
        .collect()
}

/// Reads, tokenizes and resolves every instruction in `WRITE`.
pub fn parse_write_env(env: &impl GetEnv) -> Result<Vec<WriteInstruction>> {
    let raw = read_write_var(env)?;
    let instructions = tokenize_write(&raw)?;
    debug!(count = instructions.len(), "parsed WRITE");

    instructions
        .into_iter()
        .map(|RawInstruction { path, token }| -> Result<WriteInstruction> {
            Ok(WriteInstruction {
                content: decode_content(&token, env)?,
                file_path: path,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{RawInstruction, WriteInstruction, parse_write_env, tokenize_write};
    use crate::error::ErrorKind;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn raw(path: &str, token: &str) -> RawInstruction {
        RawInstruction {
            path: path.to_string(),
            token: token.to_string(),
        }
    }

    #[test]
    fn unset_write_is_not_set() {
        let err = parse_write_env(&env(&[])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSet);
        assert_eq!(err.to_string(), "Error: WRITE environment variable is not set");
    }

    #[test]
    fn empty_write_is_not_set() {
        let err = parse_write_env(&env(&[("WRITE", "")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSet);
    }

    #[test]
    fn only_separators_is_not_set() {
        let err = tokenize_write(" ; ;;  ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSet);
        assert_eq!(err.to_string(), "Error: WRITE environment variable is not set");
    }

    #[test]
    fn invalid_fragment_fails_whole_call() {
        let err = parse_write_env(&env(&[("WRITE", "invalid-format")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert_eq!(
            err.to_string(),
            "Error: Invalid WRITE environment variable format"
        );

        let err = tokenize_write("[./a.txt](SGk=);[./b.txt]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn empty_path_or_token_is_invalid() {
        assert_eq!(
            tokenize_write("[](SGk=)").unwrap_err().kind(),
            ErrorKind::InvalidFormat
        );
        assert_eq!(
            tokenize_write("[./a.txt]()").unwrap_err().kind(),
            ErrorKind::InvalidFormat
        );
    }

    #[test]
    fn fragments_are_trimmed_and_ordered() {
        let parsed = tokenize_write("  [./a.txt](SGk=) ;\n[b/c.txt]($FOO);; [/abs/d](base64:$X)  ")
            .unwrap();
        assert_eq!(
            parsed,
            vec![
                raw("./a.txt", "SGk="),
                raw("b/c.txt", "$FOO"),
                raw("/abs/d", "base64:$X"),
            ]
        );
    }

    #[test]
    fn path_extends_to_first_bracket_paren_pair() {
        assert_eq!(tokenize_write("[a]b](tok)").unwrap(), vec![raw("a]b", "tok")]);
        assert_eq!(tokenize_write("[a](tok)extra)").unwrap(), vec![raw("a", "tok")]);
    }

    #[test]
    fn match_may_be_surrounded_by_text() {
        assert_eq!(
            tokenize_write("prefix [a.txt](SGk=) suffix").unwrap(),
            vec![raw("a.txt", "SGk=")]
        );
    }

    #[test]
    fn parses_single_base64_instruction() {
        let token = STANDARD.encode("Hello World");
        let write = format!("[./test.txt]({token})");
        let parsed = parse_write_env(&env(&[("WRITE", write.as_str())])).unwrap();
        assert_eq!(
            parsed,
            vec![WriteInstruction {
                file_path: "./test.txt".to_string(),
                content: b"Hello World".to_vec(),
            }]
        );
    }

    #[test]
    fn parses_mixed_instructions_with_resolved_content() {
        let enc = STANDARD.encode("secret");
        let vars = env(&[
            ("WRITE", "[./a.txt]($FOO);[./b.txt](base64:$ENC);[./c.txt](SGVsbG8=)"),
            ("FOO", "hi"),
            ("ENC", enc.as_str()),
        ]);
        let parsed = parse_write_env(&vars).unwrap();
        let flat: Vec<(&str, &[u8])> = parsed
            .iter()
            .map(|i| (i.file_path.as_str(), i.content.as_slice()))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("./a.txt", &b"hi"[..]),
                ("./b.txt", &b"secret"[..]),
                ("./c.txt", &b"Hello"[..]),
            ]
        );
    }

    #[test]
    fn undefined_reference_fails_parse() {
        let vars = env(&[("WRITE", "[./a.txt](SGk=);[./b.txt]($MISSING)")]);
        let err = parse_write_env(&vars).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingEnvRef);
    }
}
