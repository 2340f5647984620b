//! Token Lifetime Config

use clap::Args;
use jiff::SignedDuration;

use dialed_in_app::domain::tokens::records::TokenLifetimes;

/// Time to live of each token scope.
#[derive(Debug, Args)]
pub struct TokensConfig {
    /// Session token lifetime in hours
    #[arg(long, env = "AUTHENTICATION_TOKEN_TTL_HOURS", default_value_t = 350_i64)]
    pub authentication_token_ttl_hours: i64,

    /// Activation token lifetime in hours
    #[arg(long, env = "ACTIVATION_TOKEN_TTL_HOURS", default_value_t = 72_i64)]
    pub activation_token_ttl_hours: i64,

    /// Password reset code lifetime in minutes
    #[arg(long, env = "PASSWORD_RESET_TOKEN_TTL_MINUTES", default_value_t = 45_i64)]
    pub password_reset_token_ttl_minutes: i64,
}

impl TokensConfig {
    #[must_use]
    pub fn lifetimes(&self) -> TokenLifetimes {
        TokenLifetimes {
            authentication: SignedDuration::from_hours(self.authentication_token_ttl_hours),
            activation: SignedDuration::from_hours(self.activation_token_ttl_hours),
            password_reset: SignedDuration::from_mins(self.password_reset_token_ttl_minutes),
        }
    }
}
