//! Purpose: Resolve an instruction token into the bytes that get written.
//! Exports: `Token`, `decode_content`, `decode_base64`.
//! Role: Pure resolver between the tokenizer and the writer.
//! Invariants: Rules are tried in order `base64:$name`, `$name`, raw base64.
//! Invariants: Base64 decoding is lenient and never fails; undefined variables always do.
//! Invariants: Resolved content is never logged.
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use tracing::debug;

use crate::env::GetEnv;
use crate::error::{Error, Result};

const BASE64_ENV_PREFIX: &str = "base64:$";
const ENV_PREFIX: &str = "$";

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// A classified token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Token<'a> {
    /// `base64:$NAME`: the variable holds base64 text.
    Base64EnvRef(&'a str),
    /// `$NAME`: the variable holds the content verbatim.
    EnvRef(&'a str),
    /// Anything else: the token itself is base64 text.
    Base64(&'a str),
}

impl<'a> Token<'a> {
    pub fn classify(raw: &'a str) -> Self {
        // `base64:$` has to win over `$`.
        if let Some(name) = raw.strip_prefix(BASE64_ENV_PREFIX) {
            Token::Base64EnvRef(name)
        } else if let Some(name) = raw.strip_prefix(ENV_PREFIX) {
            Token::EnvRef(name)
        } else {
            Token::Base64(raw)
        }
    }

    fn rule(&self) -> &'static str {
        match self {
            Token::Base64EnvRef(_) => "base64-env",
            Token::EnvRef(_) => "env",
            Token::Base64(_) => "base64",
        }
    }
}

pub fn decode_content(token: &str, env: &impl GetEnv) -> Result<Vec<u8>> {
    let token = Token::classify(token);
    let content = match token {
        Token::Base64EnvRef(name) => {
            let value = env.get_lossy(name).ok_or_else(|| Error::missing_env_ref(name))?;
            decode_base64(&value)
        }
        Token::EnvRef(name) => env.get_bytes(name).ok_or_else(|| Error::missing_env_ref(name))?,
        Token::Base64(data) => decode_base64(data),
    };
    debug!(rule = token.rule(), bytes = content.len(), "resolved token");
    Ok(content)
}

/// Best-effort base64 decode.
///
/// Accepts the standard and URL-safe alphabets, optional padding and stray
/// characters (whitespace, line breaks). Input stops at the first `=`; a
/// dangling sextet that cannot form a byte is dropped.
pub fn decode_base64(input: &str) -> Vec<u8> {
    let mut cleaned = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '+' | '/' => cleaned.push(ch),
            '-' => cleaned.push('+'),
            '_' => cleaned.push('/'),
            '=' => break,
            _ => {}
        }
    }
    if cleaned.len() % 4 == 1 {
        cleaned.pop();
    }

    match LENIENT.decode(&cleaned) {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(error = %err, "base64 input dropped");
            Vec::new()
        }
    }
}
