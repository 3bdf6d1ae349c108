//! JSON data guard that logs every parsed request body.
//!
//! Bodies longer than [`MAX_LOGGED_BODY`] characters are cut short in the
//! log line. Profile photo and document references are logged like any
//! other field since they are plain references, never file contents.

use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::{
    Data, Request,
    data::{self, FromData},
};

pub const MAX_LOGGED_BODY: usize = 512;

/// Drop-in replacement for `Json<T>` on request bodies.
pub struct LoggedJson<T>(pub T);

impl<T> LoggedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for LoggedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn truncate_for_log(body: &str) -> String {
    match body.char_indices().nth(MAX_LOGGED_BODY) {
        Some((cut, _)) => format!("{}... ({} bytes)", &body[..cut], body.len()),
        None => body.to_string(),
    }
}

#[rocket::async_trait]
impl<'r, T: Deserialize<'r> + Serialize> FromData<'r> for LoggedJson<T> {
    type Error = rocket::serde::json::Error<'r>;

    async fn from_data(req: &'r Request<'_>, data: Data<'r>) -> data::Outcome<'r, Self> {
        match Json::<T>::from_data(req, data).await {
            data::Outcome::Success(json) => {
                let body = serde_json::to_string(&json.0)
                    .map(|s| truncate_for_log(&s))
                    .unwrap_or_else(|_| "<unserializable>".to_string());
                info!("{} {} body: {}", req.method().as_str(), req.uri().path(), body);
                data::Outcome::Success(LoggedJson(json.into_inner()))
            }
            data::Outcome::Error((status, e)) => {
                warn!("{} {} rejected body: {:?}", req.method().as_str(), req.uri().path(), e);
                data::Outcome::Error((status, e))
            }
            data::Outcome::Forward(f) => data::Outcome::Forward(f),
        }
    }
}
