// SPDX-License-Identifier: Apache-2.0

//! Token provider abstraction for credential resolution.
//!
//! Front ends implement [`TokenProvider`] to hand a GitHub token to the
//! facade without the library knowing where it came from.

use secrecy::SecretString;

/// Provides GitHub credentials for API calls.
///
/// Implementations should return `None` if no token is available.
pub trait TokenProvider: Send + Sync {
    /// Retrieves the GitHub API token.
    fn github_token(&self) -> Option<SecretString>;
}

/// A provider holding a token that is already known, e.g. passed in by a caller.
pub struct StaticTokenProvider {
    token: Option<SecretString>,
}

impl StaticTokenProvider {
    /// Wraps an optional token.
    #[must_use]
    pub fn new(token: Option<SecretString>) -> Self {
        Self { token }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn github_token(&self) -> Option<SecretString> {
        self.token.clone()
    }
}
