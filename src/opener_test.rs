use super::*;

fn base() -> Url {
    Url::parse("http://127.0.0.1:8000/").unwrap()
}

// =============================================================
// resolve_link
// =============================================================

#[test]
fn absolute_link_is_kept() {
    let url = resolve_link(&base(), "https://checkout.stripe.test/c/pay/cs_1").unwrap();
    assert_eq!(url.as_str(), "https://checkout.stripe.test/c/pay/cs_1");
}

#[test]
fn relative_link_resolves_against_base() {
    let url = resolve_link(&base(), "/static/mock-payment.html?sid=s1").unwrap();
    assert_eq!(url.as_str(), "http://127.0.0.1:8000/static/mock-payment.html?sid=s1");
}

#[test]
fn javascript_link_is_refused() {
    let err = resolve_link(&base(), "javascript:alert(1)").unwrap_err();
    assert!(matches!(err, OpenError::UnsupportedScheme(ref s) if s == "javascript"));
}

#[test]
fn file_link_is_refused() {
    assert!(matches!(resolve_link(&base(), "file:///etc/passwd"), Err(OpenError::UnsupportedScheme(_))));
}

// =============================================================
// SystemOpener
// =============================================================

#[test]
fn disabled_launch_still_validates() {
    let opener = SystemOpener::new(base()).with_launch(false);
    assert!(opener.open("/static/mock-payment.html").is_ok());
    assert!(matches!(opener.open("mailto:x@example.test"), Err(OpenError::UnsupportedScheme(_))));
}
