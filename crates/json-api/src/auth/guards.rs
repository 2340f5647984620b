//! Route gates evaluated against the request principal.
//!
//! Both run after the authenticator. `require_activated` checks
//! authentication first, so anonymous callers get a 401 rather than a 403.

use salvo::prelude::*;

use crate::extensions::*;

#[salvo::handler]
pub(crate) async fn require_authenticated(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if let Err(error) = depot.authenticated_user_or_401() {
        res.render(error);
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn require_activated(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if let Err(error) = depot.activated_user_or_403() {
        res.render(error);
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}
