use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// Every ACE label starts with `xn--`; matching on the bare `--` is a cheap
/// pre-filter that also lets through hosts like `my--site.test`.
const IDN_MARKER: &str = "--";

const DEFAULT_PORTS: [&str; 2] = ["80", "443"];

/// Converts an ASCII (possibly punycode) host, with an optional `:port`
/// suffix, to its Unicode display form.
///
/// - Hosts without `--` are returned untouched.
/// - Default HTTP/HTTPS ports are dropped from converted hosts.
/// - Conversion failures are reported to `sink` and the input is returned as is.
pub fn normalize_host(host: &str, sink: &dyn DiagnosticSink) -> String {
    if !host.contains(IDN_MARKER) {
        return host.to_string();
    }

    let (name, port) = split_port(host);

    let (converted, result) = idna::domain_to_unicode(name);
    let reason = match result {
        Ok(()) if !converted.is_empty() => {
            return match port {
                Some(port) if !DEFAULT_PORTS.contains(&port) => format!("{converted}:{port}"),
                _ => converted,
            };
        }
        Ok(()) => "conversion produced an empty host".to_string(),
        Err(err) => format!("{err:?}"),
    };

    sink.warn(Diagnostic::IdnaUnavailable {
        host: host.to_string(),
        reason,
    });

    host.to_string()
}

/// Splits `host[:port]`. Bracketed IPv6 literals keep their inner colons.
pub fn split_port(host: &str) -> (&str, Option<&str>) {
    if host.starts_with('[') {
        return match host.rfind("]:") {
            Some(idx) if is_port(&host[idx + 2..]) => (&host[..=idx], Some(&host[idx + 2..])),
            _ => (host, None),
        };
    }

    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && is_port(port) => (name, Some(port)),
        _ => (host, None),
    }
}

fn is_port(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.bytes().all(|b| b.is_ascii_digit())
}
