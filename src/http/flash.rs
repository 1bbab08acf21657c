//! One-shot flash messages
//!
//! A flash rides a cookie from the redirect that set it to the next page
//! render, which displays it once and clears the cookie. Only a machine code
//! travels on the wire; severity and banner text are resolved at render time.

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

const COOKIE_NAME: &str = "flash";

/// Flash severity, mapped to the banner style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Info,
    Danger,
}

impl FlashLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Danger => "danger",
        }
    }
}

/// The flash messages the workflows can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    UrlAdded,
    UrlExists,
    InvalidUrl,
    CheckDone,
    CheckFailed,
    EntryNotFound,
    StorageFailed,
}

impl Flash {
    pub fn level(self) -> FlashLevel {
        match self {
            Self::UrlAdded | Self::CheckDone => FlashLevel::Success,
            Self::UrlExists => FlashLevel::Info,
            Self::InvalidUrl | Self::CheckFailed | Self::EntryNotFound | Self::StorageFailed => {
                FlashLevel::Danger
            }
        }
    }

    /// Banner text. Wording is presentation-only; callers branch on the
    /// variant, never on this string.
    pub fn text(self) -> &'static str {
        match self {
            Self::UrlAdded => "Page added successfully",
            Self::UrlExists => "Page already exists",
            Self::InvalidUrl => "Invalid URL",
            Self::CheckDone => "Page checked successfully",
            Self::CheckFailed => "Could not check the page",
            Self::EntryNotFound => "Page not found",
            Self::StorageFailed => "Something went wrong, please try again",
        }
    }

    fn code(self) -> &'static str {
        match self {
            Self::UrlAdded => "url-added",
            Self::UrlExists => "url-exists",
            Self::InvalidUrl => "invalid-url",
            Self::CheckDone => "check-done",
            Self::CheckFailed => "check-failed",
            Self::EntryNotFound => "not-found",
            Self::StorageFailed => "storage-failed",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "url-added" => Some(Self::UrlAdded),
            "url-exists" => Some(Self::UrlExists),
            "invalid-url" => Some(Self::InvalidUrl),
            "check-done" => Some(Self::CheckDone),
            "check-failed" => Some(Self::CheckFailed),
            "not-found" => Some(Self::EntryNotFound),
            "storage-failed" => Some(Self::StorageFailed),
            _ => None,
        }
    }
}

/// A 303 redirect carrying a flash for the next page render
pub fn redirect_with_flash(location: &str, flash: Flash) -> Response {
    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, location.to_string()),
            (
                header::SET_COOKIE,
                format!("{}={}; Path=/; HttpOnly", COOKIE_NAME, flash.code()),
            ),
        ],
    )
        .into_response()
}

/// Read the pending flash from the request cookies, if any
pub fn take_flash(headers: &HeaderMap) -> Option<Flash> {
    Flash::from_code(cookie_value(headers)?)
}

/// Whether a flash cookie is present at all, decodable or not.
///
/// A stale or garbled value must still be expired on the next render, or it
/// would ride along on every request.
pub fn has_flash_cookie(headers: &HeaderMap) -> bool {
    cookie_value(headers).is_some()
}

fn cookie_value(headers: &HeaderMap) -> Option<&str> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        (name == COOKIE_NAME).then_some(value)
    })
}

/// Wrap a rendered page, clearing the flash cookie when one was present
pub fn page_response(html: String, clear_flash: bool) -> Response {
    let mut response = axum::response::Html(html).into_response();
    if clear_flash {
        response.headers_mut().insert(
            header::SET_COOKIE,
            HeaderValue::from_static("flash=; Path=/; Max-Age=0"),
        );
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_codes_round_trip() {
        for flash in [
            Flash::UrlAdded,
            Flash::UrlExists,
            Flash::InvalidUrl,
            Flash::CheckDone,
            Flash::CheckFailed,
            Flash::EntryNotFound,
            Flash::StorageFailed,
        ] {
            assert_eq!(Flash::from_code(flash.code()), Some(flash));
        }
    }

    #[test]
    fn test_flash_severities() {
        assert_eq!(Flash::UrlAdded.level(), FlashLevel::Success);
        assert_eq!(Flash::UrlExists.level(), FlashLevel::Info);
        assert_eq!(Flash::InvalidUrl.level(), FlashLevel::Danger);
        assert_eq!(Flash::CheckFailed.level(), FlashLevel::Danger);
    }

    #[test]
    fn test_take_flash_parses_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; flash=url-added"),
        );
        assert_eq!(take_flash(&headers), Some(Flash::UrlAdded));
    }

    #[test]
    fn test_take_flash_absent() {
        let headers = HeaderMap::new();
        assert_eq!(take_flash(&headers), None);
        assert!(!has_flash_cookie(&headers));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("flash=garbage"));
        assert_eq!(take_flash(&headers), None);
    }

    #[test]
    fn test_unknown_flash_code_still_gets_cleared() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("flash=garbage"));
        assert!(has_flash_cookie(&headers));

        let response = page_response(String::new(), has_flash_cookie(&headers));
        let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cleared.contains("Max-Age=0"));
    }

    #[test]
    fn test_redirect_sets_location_and_cookie() {
        let response = redirect_with_flash("/urls/7", Flash::UrlAdded);
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/urls/7");
        assert!(response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .contains("flash=url-added"));
    }
}
