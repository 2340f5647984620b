use std::str::FromStr;

use clap::{Args, Subcommand};
use dialed_in_app::{
    database::{self, Db, PoolSettings},
    domain::{
        tokens::records::TokenScope,
        users::{PgUsersService, UsersService, records::User},
    },
};

mod issue;
mod revoke;

#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Debug, Subcommand)]
enum TokenSubcommand {
    Issue(issue::IssueTokenArgs),
    Revoke(revoke::RevokeTokensArgs),
}

pub(crate) async fn run(command: TokenCommand) -> Result<(), String> {
    match command.command {
        TokenSubcommand::Issue(args) => issue::run(args).await,
        TokenSubcommand::Revoke(args) => revoke::run(args).await,
    }
}

pub(crate) fn parse_scope(value: &str) -> Result<TokenScope, String> {
    TokenScope::from_str(value).map_err(|error| error.to_string())
}

pub(crate) async fn connect(database_url: &str) -> Result<Db, String> {
    let pool = database::connect(database_url, PoolSettings::default())
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    Ok(Db::new(pool))
}

pub(crate) async fn find_user(db: &Db, email: &str) -> Result<User, String> {
    PgUsersService::new(db.clone())
        .get_user_by_email(email)
        .await
        .map_err(|error| format!("failed to find user {email}: {error}"))
}
