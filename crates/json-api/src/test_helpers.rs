//! Test helpers.

use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use salvo::{affix_state::inject, prelude::*};
use serde_json::json;
use uuid::Uuid;

use dialed_in_app::{
    auth::{AuthenticatedUser, MockAuthService, Principal},
    context::AppContext,
    domain::{
        coffees::{MockCoffeesService, records::Coffee},
        recipes::{MockRecipesService, records::Recipe},
        tokens::{
            MockTokensService,
            records::{Token, TokenScope},
        },
        users::{MockUsersService, records::{User, UserUuid}},
    },
    mailer::MockMailer,
    rate_limit::{LimiterSettings, RateLimitConfigError, RateLimiterService},
    versioning::Version,
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

/// Services that panic on any call, for tests that replace only one of them.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) auth: Option<MockAuthService>,
    pub(crate) tokens: Option<MockTokensService>,
    pub(crate) users: Option<MockUsersService>,
    pub(crate) coffees: Option<MockCoffeesService>,
    pub(crate) recipes: Option<MockRecipesService>,
    pub(crate) mailer: Option<MockMailer>,
}

impl Mocks {
    pub(crate) fn into_app_context(self) -> AppContext {
        AppContext {
            auth: Arc::new(self.auth.unwrap_or_else(MockAuthService::new)),
            tokens: Arc::new(self.tokens.unwrap_or_else(MockTokensService::new)),
            users: Arc::new(self.users.unwrap_or_else(MockUsersService::new)),
            coffees: Arc::new(self.coffees.unwrap_or_else(MockCoffeesService::new)),
            recipes: Arc::new(self.recipes.unwrap_or_else(MockRecipesService::new)),
            mailer: Arc::new(self.mailer.unwrap_or_else(MockMailer::new)),
        }
    }
}

pub(crate) fn disabled_limiter() -> Result<RateLimiterService, RateLimitConfigError> {
    RateLimiterService::new(LimiterSettings {
        enabled: false,
        ..LimiterSettings::default()
    })
}

pub(crate) fn state_with(mocks: Mocks) -> Result<Arc<State>, RateLimitConfigError> {
    Ok(State::new(mocks.into_app_context(), disabled_limiter()?).into_shared())
}

/// Attaches an activated [`TEST_USER_UUID`] principal, standing in for the
/// authenticator.
#[salvo::handler]
pub(crate) async fn inject_activated_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal::Authenticated(AuthenticatedUser {
        uuid: TEST_USER_UUID,
        activated: true,
    }));

    ctrl.call_next(req, depot, res).await;
}

/// Service exposing `route` to an activated test user.
pub(crate) fn user_service(mocks: Mocks, route: Router) -> Result<Service, RateLimitConfigError> {
    Ok(Service::new(
        Router::new()
            .hoop(inject(state_with(mocks)?))
            .hoop(inject_activated_user)
            .push(route),
    ))
}

/// Service exposing `route` to an anonymous caller.
pub(crate) fn anonymous_service(
    mocks: Mocks,
    route: Router,
) -> Result<Service, RateLimitConfigError> {
    Ok(Service::new(
        Router::new().hoop(inject(state_with(mocks)?)).push(route),
    ))
}

pub(crate) fn make_user(activated: bool) -> User {
    User {
        uuid: TEST_USER_UUID,
        name: "Ada".to_owned(),
        email: "ada@example.com".to_owned(),
        activated,
        created_at: Timestamp::UNIX_EPOCH,
        version: Version::INITIAL,
    }
}

pub(crate) fn make_coffee(uuid: Uuid) -> Coffee {
    Coffee {
        uuid: uuid.into(),
        user_uuid: TEST_USER_UUID,
        info: json!({ "roaster": "Square Mile", "name": "Red Brick" }),
        created_at: Timestamp::UNIX_EPOCH,
        version: Version::INITIAL,
    }
}

pub(crate) fn make_recipe(uuid: Uuid) -> Recipe {
    Recipe {
        uuid: uuid.into(),
        user_uuid: TEST_USER_UUID,
        method_id: 1,
        coffee_uuid: None,
        info: json!({ "dose": 15, "water": 250 }),
        created_at: Timestamp::UNIX_EPOCH,
        version: Version::INITIAL,
    }
}

pub(crate) fn make_token(scope: TokenScope) -> Result<Token, Box<dyn std::error::Error>> {
    Ok(Token::generate(
        TEST_USER_UUID,
        SignedDuration::from_hours(1),
        scope,
        Timestamp::now(),
    )?)
}
