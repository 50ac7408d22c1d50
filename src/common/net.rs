use url::Url;

/// Builds the status page URL (`http://{target}/`) for a `host[:port]` target.
pub fn status_page_url(target: &str) -> Option<Url> {
    let trimmed = target.trim();
    if trimmed.is_empty() || trimmed.contains("://") {
        return None;
    }
    let url = Url::parse(&format!("http://{trimmed}/")).ok()?;
    url.host_str()?;
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::status_page_url;

    #[test]
    fn status_page_url_accepts_host_and_port() {
        let url = status_page_url("192.168.1.20:8080").expect("url");
        assert_eq!(url.as_str(), "http://192.168.1.20:8080/");
    }

    #[test]
    fn status_page_url_accepts_bare_host() {
        let url = status_page_url(" sensors.lan ").expect("url");
        assert_eq!(url.as_str(), "http://sensors.lan/");
    }

    #[test]
    fn status_page_url_rejects_empty_and_schemes() {
        assert!(status_page_url("").is_none());
        assert!(status_page_url("   ").is_none());
        assert!(status_page_url("http://sensors.lan").is_none());
    }

    #[test]
    fn status_page_url_rejects_bad_port() {
        assert!(status_page_url("sensors.lan:notaport").is_none());
    }
}
