// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Handles user Authentication in API requests
use crate::api::v1::response::error::AuthenticationError;
use crate::api::v1::response::ApiError;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::Error;
use actix_web::http::header::Header;
use actix_web::web::Data;
use actix_web::{HttpMessage, ResponseError};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use core::future::ready;
use database::{DatabaseError, Db};
use db_storage::users::User;
use std::future::{Future, Ready};
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

/// Middleware factory
///
/// Transforms into [`TokenAuthMiddleware`]
pub struct TokenAuth {
    pub db: Data<Db>,
}

impl<S> Transform<S, ServiceRequest> for TokenAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type Transform = TokenAuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenAuthMiddleware {
            service: Rc::new(service),
            db: self.db.clone(),
        }))
    }
}

/// Authentication middleware
///
/// Whenever an API request is received, the TokenAuthMiddleware looks up the bearer token
/// and provides the associated user as [`ReqData`](actix_web::web::ReqData) for the subsequent services.
pub struct TokenAuthMiddleware<S> {
    service: Rc<S>,
    db: Data<Db>,
}

type ResultFuture<O, E> = Pin<Box<dyn Future<Output = Result<O, E>>>>;

impl<S> Service<ServiceRequest> for TokenAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type Future = ResultFuture<Self::Response, Self::Error>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let db = self.db.clone();

        let auth = match Authorization::<Bearer>::parse(&req) {
            Ok(a) => a,
            Err(e) => {
                log::debug!("Unable to parse bearer token, {}", e);
                let error = ApiError::unauthorized(AuthenticationError::MissingToken);
                let response = req.into_response(error.error_response());
                return Box::pin(ready(Ok(response)));
            }
        };

        let token = auth.into_scheme().token().to_string();

        Box::pin(async move {
            let current_user = match check_token(db, token).await {
                Ok(user) => user,
                Err(error) => return Ok(req.into_response(error.error_response())),
            };

            req.extensions_mut().insert(current_user);
            service.call(req).await
        })
    }
}

/// Resolves the user owning the given token
pub async fn check_token(db: Data<Db>, token: String) -> Result<User, ApiError> {
    let result = crate::block(move || {
        let mut conn = db.get_conn()?;

        User::get_by_token(&mut conn, &token)
    })
    .await?;

    match result {
        Ok(user) => Ok(user),
        Err(DatabaseError::NotFound) => {
            log::debug!("Request with unknown token");
            Err(ApiError::unauthorized(AuthenticationError::InvalidToken))
        }
        Err(e) => Err(e.into()),
    }
}
