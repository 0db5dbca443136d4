/// Where to send the browser after sign-in when no usable target was given.
pub const HOME: &str = "/";

/// True for same-site paths such as `/users?page_number=2`.
///
/// Rejects absolute URLs, protocol-relative `//host` and the `/\host` form
/// browsers treat the same way, plus anything that is not a plain
/// printable-ASCII path.
pub fn is_local_url(url: &str) -> bool {
    url.starts_with('/')
        && !url.starts_with("//")
        && !url.starts_with("/\\")
        && url.bytes().all(|b| b.is_ascii_graphic())
}

/// `return_url` if it is local, otherwise [`HOME`].
pub fn local_or_home(return_url: Option<&str>) -> &str {
    match return_url {
        Some(url) if is_local_url(url) => url,
        _ => HOME,
    }
}

/// Login page URL that brings the browser back to `original` afterwards.
pub fn login_url(original: &str) -> String {
    format!("/account/login?return_url={}", urlencoding::encode(original))
}
