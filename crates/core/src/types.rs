/// Backend account identifiers are BIGSERIAL on the server side.
///
/// Carried for logging and labeling only -- the backend resolves identity
/// from the bearer credential, not from this value.
pub type UserId = i64;
