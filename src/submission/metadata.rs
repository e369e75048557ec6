use std::net::IpAddr;

use axum::http::HeaderMap;
use ipnet::IpNet;

/// Determine the requesting client's IP address.
///
/// X-Forwarded-For is only honored when the direct peer is inside one of
/// the configured trusted proxy networks; otherwise spoofed headers would
/// let a client pick its own rate-limit bucket.
pub fn client_ip(headers: &HeaderMap, peer_addr: IpAddr, trusted_proxies: &[IpNet]) -> String {
    if !trusted_proxies.is_empty() && trusted_proxies.iter().any(|net| net.contains(&peer_addr)) {
        if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
            // Take the first (leftmost) IP that isn't a trusted proxy
            for ip_str in xff.split(',').map(|s| s.trim()) {
                if let Ok(ip) = ip_str.parse::<IpAddr>() {
                    if !trusted_proxies.iter().any(|net| net.contains(&ip)) {
                        return ip.to_string();
                    }
                }
            }
        }
    }

    peer_addr.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_xff(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", value.parse().unwrap());
        headers
    }

    #[test]
    fn ignores_forwarded_header_from_untrusted_peer() {
        let headers = headers_with_xff("203.0.113.9");
        let ip = client_ip(&headers, IpAddr::from([198, 51, 100, 7]), &[]);
        assert_eq!(ip, "198.51.100.7");
    }

    #[test]
    fn honors_forwarded_header_from_trusted_proxy() {
        let proxies: Vec<IpNet> = vec!["10.0.0.0/8".parse().unwrap()];
        let headers = headers_with_xff("203.0.113.9, 10.0.0.2");
        let ip = client_ip(&headers, IpAddr::from([10, 0, 0, 1]), &proxies);
        assert_eq!(ip, "203.0.113.9");
    }

    #[test]
    fn falls_back_to_peer_when_header_only_lists_proxies() {
        let proxies: Vec<IpNet> = vec!["10.0.0.0/8".parse().unwrap()];
        let headers = headers_with_xff("10.0.0.3");
        let ip = client_ip(&headers, IpAddr::from([10, 0, 0, 1]), &proxies);
        assert_eq!(ip, "10.0.0.1");
    }
}
