use std::fmt;

use rand::Rng;

const TOKEN_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const TOKEN_LEN: usize = 6;

/// Six symbols from `[0-9A-Z]`, used to mint a fresh screen name.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RenameToken(String);

impl RenameToken {
    /// Accepts only well-formed tokens.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = raw.len() == TOKEN_LEN && raw.bytes().all(|b| TOKEN_CHARSET.contains(&b));
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Screen` followed by the token.
    pub fn screen_name(&self) -> String {
        format!("Screen{}", self.0)
    }
}

impl fmt::Display for RenameToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything that can hand out rename tokens.
///
/// No uniqueness guarantee is implied: callers that need one must combine the
/// token with other context or retry.
pub trait NameTokenSource: Send + Sync {
    fn next_token(&self) -> RenameToken;
}

/// Uniform draw over the 36-symbol alphabet, one symbol at a time.
#[derive(Clone, Copy, Debug, Default)]
pub struct NameTokenGenerator;

impl NameTokenGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn next_with<R: Rng>(rng: &mut R) -> RenameToken {
        let token = (0..TOKEN_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..TOKEN_CHARSET.len());
                TOKEN_CHARSET[idx] as char
            })
            .collect();
        RenameToken(token)
    }
}

impl NameTokenSource for NameTokenGenerator {
    fn next_token(&self) -> RenameToken {
        Self::next_with(&mut rand::thread_rng())
    }
}

/// Always returns the same token. Handy for replaying an import deterministically.
#[derive(Clone, Debug)]
pub struct FixedToken(RenameToken);

impl FixedToken {
    pub fn new(token: RenameToken) -> Self {
        Self(token)
    }
}

impl NameTokenSource for FixedToken {
    fn next_token(&self) -> RenameToken {
        self.0.clone()
    }
}
