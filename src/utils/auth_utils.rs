use actix_web::{web::ReqData, HttpResponse};

use crate::models::token_models::Claims;

/// Require a verified bearer token on the request.
/// Returns the claims attached by the JWT middleware, otherwise a 401.
pub fn require_claims(claims: Option<ReqData<Claims>>) -> Result<Claims, HttpResponse> {
    match claims {
        Some(c) => Ok(c.into_inner()),
        None => Err(HttpResponse::Unauthorized().body("Token ausente ou inválido.")),
    }
}

/// Check that the requested resource belongs to the logged-in user.
pub fn check_ownership<'a>(
    owner_id: &str,
    claims: &'a Claims,
) -> Result<&'a str, HttpResponse> {
    if claims.sub != owner_id {
        Err(HttpResponse::Forbidden().body("Unauthorized"))
    } else {
        Ok(&claims.sub)
    }
}
