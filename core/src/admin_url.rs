//! Admin portal URL derivation

use crate::errors::{CoreError, CoreResult};
use url::Url;

const DEFAULT_SCHEME: &str = "https";

/// Turn a bare admin domain into a fully-qualified URL.
///
/// `example-admin.3scale.net` becomes `https://example-admin.3scale.net`;
/// a domain that already carries an `http` or `https` scheme is kept as is.
pub fn url_from_domain(domain: &str) -> CoreResult<Url> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(invalid(domain, "domain is empty"));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("{}://{}", DEFAULT_SCHEME, trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| invalid(domain, &e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(domain, &format!("unsupported scheme '{}'", url.scheme())));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(invalid(domain, "missing host")),
    }
}

/// String form of [`url_from_domain`] without the trailing root slash
pub fn admin_url_string(domain: &str) -> CoreResult<String> {
    let url = url_from_domain(domain)?;
    let mut rendered = url.to_string();
    if url.path() == "/" && url.query().is_none() && url.fragment().is_none() {
        rendered.pop();
    }
    Ok(rendered)
}

fn invalid(domain: &str, reason: &str) -> CoreError {
    CoreError::InvalidAdminDomain {
        domain: domain.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_domain_gets_https() {
        assert_eq!(
            admin_url_string("example-admin.3scale.net").unwrap(),
            "https://example-admin.3scale.net"
        );
    }

    #[test]
    fn test_explicit_scheme_is_kept() {
        assert_eq!(
            admin_url_string("http://example-admin.local:3000").unwrap(),
            "http://example-admin.local:3000"
        );
        assert_eq!(
            admin_url_string("  https://example-admin.3scale.net/  ").unwrap(),
            "https://example-admin.3scale.net"
        );
    }

    #[test]
    fn test_malformed_domains_are_rejected() {
        for domain in ["", "   ", "exa mple.com", "ftp://example.com", "https://"] {
            let err = url_from_domain(domain).unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidAdminDomain { .. }),
                "expected InvalidAdminDomain for {:?}, got {:?}",
                domain,
                err
            );
        }
    }
}
