use clap::Args;
use dialed_in_app::domain::tokens::{
    PgTokensService, TokensService,
    records::{TokenLifetimes, TokenScope},
};
use jiff::SignedDuration;

use super::{connect, find_user, parse_scope};

#[derive(Debug, Args)]
pub(crate) struct IssueTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Email address of the user the token is issued for
    #[arg(long)]
    email: String,

    /// Token scope: authentication, activation or password-reset
    #[arg(long, value_parser = parse_scope, default_value = "authentication")]
    scope: TokenScope,

    /// Lifetime in minutes; defaults to the scope's standard lifetime
    #[arg(long)]
    ttl_minutes: Option<i64>,
}

pub(crate) async fn run(args: IssueTokenArgs) -> Result<(), String> {
    let ttl = match args.ttl_minutes {
        Some(minutes) if minutes <= 0 => {
            return Err("ttl-minutes must be positive".to_string());
        }
        Some(minutes) => minutes
            .checked_mul(60)
            .map(SignedDuration::from_secs)
            .ok_or_else(|| "ttl-minutes is out of range".to_string())?,
        None => TokenLifetimes::default().for_scope(args.scope),
    };

    let db = connect(&args.database_url).await?;
    let user = find_user(&db, &args.email).await?;

    let token = PgTokensService::new(db)
        .issue_token(user.uuid, ttl, args.scope)
        .await
        .map_err(|error| format!("failed to issue token: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("token_scope: {}", token.scope);
    println!("token_expiry: {}", token.expiry);
    println!("token: {}", token.plaintext.as_str());
    println!("store this token now; it is only shown once");

    Ok(())
}
