//! Dev-server URLs
//!
//! Resolves the local URL and, when the server listens on every interface,
//! a private LAN URL for other devices on the same network.

use console::style;
use lazy_static::lazy_static;
use regex::Regex;
use std::net::{Ipv4Addr, UdpSocket};

use crate::config::DevServerOptions;

lazy_static! {
    static ref PRIVATE_IPV4_RE: Regex =
        Regex::new(r"^10[.]|^172[.](1[6-9]|2[0-9]|3[0-1])[.]|^192[.]168[.]").unwrap();
}

/// Source of this machine's LAN address.
pub trait AddressResolver {
    fn lan_ipv4(&self) -> Option<Ipv4Addr>;
}

/// Asks the OS which local address it would route outbound traffic from.
/// Connecting a UDP socket sends nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteProbe;

impl AddressResolver for RouteProbe {
    fn lan_ipv4(&self) -> Option<Ipv4Addr> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
        socket.connect((Ipv4Addr::new(10, 255, 255, 255), 1)).ok()?;
        match socket.local_addr().ok()?.ip() {
            std::net::IpAddr::V4(ip) if !ip.is_unspecified() => Some(ip),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Urls {
    pub local_url: String,
    pub lan_url: Option<String>,
}

pub fn is_private_ipv4(ip: &Ipv4Addr) -> bool {
    PRIVATE_IPV4_RE.is_match(&ip.to_string())
}

pub fn prepare_urls(options: &DevServerOptions, resolver: &dyn AddressResolver) -> Urls {
    let protocol = if options.https { "https" } else { "http" };
    let format_url = |host: &str| format!("{}://{}:{}/", protocol, host, options.port);

    let is_unspecified_host = options.host == "0.0.0.0" || options.host == "::";

    if is_unspecified_host {
        // Public addresses are not useful to share on a LAN
        let lan_url = resolver
            .lan_ipv4()
            .filter(is_private_ipv4)
            .map(|ip| format_url(&ip.to_string()));

        Urls {
            local_url: format_url("localhost"),
            lan_url,
        }
    } else {
        Urls {
            local_url: format_url(&options.host),
            lan_url: None,
        }
    }
}

pub fn render_urls(app_name: &str, urls: &Urls) -> Vec<String> {
    let mut lines = vec![
        format!("You can view {} in the browser:", style(app_name).cyan()),
        String::new(),
    ];

    match &urls.lan_url {
        Some(lan_url) => {
            lines.push(format!("  {}            {}", style("Local:").cyan(), urls.local_url));
            lines.push(format!("  {}  {}", style("On Your Network:").cyan(), lan_url));
        }
        None => lines.push(format!("  {}", urls.local_url)),
    }

    lines.push(String::new());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedAddress(Option<Ipv4Addr>);

    impl AddressResolver for FixedAddress {
        fn lan_ipv4(&self) -> Option<Ipv4Addr> {
            self.0
        }
    }

    fn options(host: &str) -> DevServerOptions {
        DevServerOptions {
            https: false,
            host: host.to_string(),
            port: 3000,
        }
    }

    #[test]
    fn test_private_ranges() {
        assert!(is_private_ipv4(&Ipv4Addr::new(10, 0, 0, 4)));
        assert!(is_private_ipv4(&Ipv4Addr::new(172, 20, 1, 1)));
        assert!(is_private_ipv4(&Ipv4Addr::new(192, 168, 1, 20)));
        assert!(!is_private_ipv4(&Ipv4Addr::new(172, 32, 1, 1)));
        assert!(!is_private_ipv4(&Ipv4Addr::new(8, 8, 8, 8)));
    }

    #[test]
    fn test_unspecified_host_uses_lan_address() {
        let urls = prepare_urls(
            &options("0.0.0.0"),
            &FixedAddress(Some(Ipv4Addr::new(192, 168, 1, 20))),
        );
        assert_eq!(urls.local_url, "http://localhost:3000/");
        assert_eq!(urls.lan_url.as_deref(), Some("http://192.168.1.20:3000/"));
    }

    #[test]
    fn test_public_lan_address_discarded() {
        let urls = prepare_urls(&options("::"), &FixedAddress(Some(Ipv4Addr::new(8, 8, 8, 8))));
        assert_eq!(urls.lan_url, None);
    }

    #[test]
    fn test_explicit_host() {
        let mut opts = options("dev.local");
        opts.https = true;
        let urls = prepare_urls(&opts, &FixedAddress(Some(Ipv4Addr::new(10, 0, 0, 1))));
        assert_eq!(urls.local_url, "https://dev.local:3000/");
        assert_eq!(urls.lan_url, None);
    }

    #[test]
    fn test_render_single_url() {
        let urls = Urls {
            local_url: "http://localhost:3000/".to_string(),
            lan_url: None,
        };
        let text = console::strip_ansi_codes(&render_urls("demo", &urls).join("\n")).to_string();
        assert!(text.starts_with("You can view demo in the browser:"));
        assert!(text.contains("  http://localhost:3000/"));
        assert!(!text.contains("On Your Network"));
    }
}
