//! Greeting provider.

use chrono::{DateTime, Utc};

use crate::http::response::{GreetingResponse, ResponseStatus};

pub const GREETING: &str = "Hello, World!";

/// The greeting, stamped with the current UTC time.
pub fn get_greeting() -> GreetingResponse {
    greeting_at(Utc::now())
}

/// The greeting, stamped with `now`.
pub fn greeting_at(now: DateTime<Utc>) -> GreetingResponse {
    GreetingResponse {
        message: GREETING.to_string(),
        status: ResponseStatus::Success,
        timestamp: now,
    }
}
