use clap::Args;
use dialed_in_app::domain::tokens::{PgTokensService, TokensService, records::TokenScope};

use super::{connect, find_user, parse_scope};

#[derive(Debug, Args)]
pub(crate) struct RevokeTokensArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Email address of the user whose tokens are revoked
    #[arg(long)]
    email: String,

    /// Token scope: authentication, activation or password-reset
    #[arg(long, value_parser = parse_scope)]
    scope: TokenScope,
}

pub(crate) async fn run(args: RevokeTokensArgs) -> Result<(), String> {
    let db = connect(&args.database_url).await?;
    let user = find_user(&db, &args.email).await?;

    let revoked = PgTokensService::new(db)
        .revoke_tokens(args.scope, user.uuid)
        .await
        .map_err(|error| format!("failed to revoke tokens: {error}"))?;

    println!("revoked {revoked} {} token(s) for {}", args.scope, args.email);

    Ok(())
}
