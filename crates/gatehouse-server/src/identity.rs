//! Caller identity request guard

use gatehouse_domain::value_objects::ClientIdentity;
use rocket::request::{FromRequest, Outcome, Request};
use std::convert::Infallible;

/// Identity of the caller, from the peer address with a loopback fallback
#[derive(Debug, Clone)]
pub struct Caller(pub ClientIdentity);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Caller {
    type Error = Infallible;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        Outcome::Success(Caller(ClientIdentity::from_peer(request.client_ip())))
    }
}
