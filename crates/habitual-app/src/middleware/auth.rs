use salvo::{Depot, http::StatusCode, writing::Json};
use tracing::error;

use crate::{config::get_config_from_depot, db_handler::get_db_from_depot, error::ErrorResponse};
use habitual_db::depot_types::DepotUser;
use habitual_service::auth::{authenticate::authenticate, depot::depot_keys};
use habitual_service::error::ServiceError;

fn abort(res: &mut salvo::Response, ctrl: &mut salvo::FlowCtrl, status: StatusCode, message: &str) {
    res.status_code(status);
    res.render(Json(ErrorResponse {
        error: message.to_string(),
    }));
    ctrl.skip_rest();
}

/// ## Summary
/// Authenticates the request with the configured method and stores the result in the depot.
///
/// Requests without usable credentials continue as [`DepotUser::Public`]; handlers that
/// need a user reject them.
///
/// ## Side Effects
/// Inserts a [`DepotUser`] under `depot_keys::AUTHENTICATED_USER`.
///
/// ## Errors
/// Responds 503 when no database connection is available and 500 for lookup failures.
#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Authenticating request");

        if req.method() == salvo::http::Method::OPTIONS {
            depot.insert(depot_keys::AUTHENTICATED_USER, DepotUser::Public);
            return;
        }

        let config = match get_config_from_depot(depot) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(error = ?e, "Failed to get config from depot");
                abort(res, ctrl, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
                return;
            }
        };

        let provider = match get_db_from_depot(depot) {
            Ok(p) => p,
            Err(e) => {
                error!(error = ?e, "Failed to get database provider from depot");
                abort(res, ctrl, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
                return;
            }
        };

        let mut conn = match provider.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!(error = ?e, "Failed to get database connection");
                abort(res, ctrl, StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
                return;
            }
        };

        match authenticate(req, &mut conn, &config).await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "User authenticated successfully");
                depot.insert(depot_keys::AUTHENTICATED_USER, DepotUser::User(user));
            }
            Err(ServiceError::NotAuthenticated | ServiceError::InvalidCredentials) => {
                tracing::debug!("Request not authenticated, treating as public");
                depot.insert(depot_keys::AUTHENTICATED_USER, DepotUser::Public);
            }
            Err(ServiceError::InvalidConfiguration(reason)) => {
                tracing::warn!(%reason, "Authentication misconfigured, treating as public");
                depot.insert(depot_keys::AUTHENTICATED_USER, DepotUser::Public);
            }
            Err(service_err) => {
                error!(error = ?service_err, "Authentication failed with error");
                abort(res, ctrl, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            }
        }
    }
}

/// ## Summary
/// Middleware handler for authentication.
/// Hoop this onto routers whose handlers call `require_user`.
pub struct AuthMiddleware;
