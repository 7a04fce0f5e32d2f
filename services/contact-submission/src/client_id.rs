// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Client identifier derivation for rate limiting.
//!
//! The service runs behind a reverse proxy, so the socket peer is the proxy.
//! The identifier is taken from forwarding headers instead.

use axum::http::HeaderMap;

/// Bucket shared by every client whose origin cannot be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

pub const FORWARDED_FOR: &str = "x-forwarded-for";
pub const REAL_IP: &str = "x-real-ip";

/// Best-effort network origin of a request.
///
/// Prefers the first hop of `X-Forwarded-For`, then `X-Real-IP`, then the
/// shared [`UNKNOWN_CLIENT`] bucket. Unidentifiable clients throttle each
/// other, which only ever makes limiting stricter.
pub fn client_identifier(headers: &HeaderMap) -> String {
    if let Some(forwarded) = header_str(headers, FORWARDED_FOR) {
        let first = forwarded.split(',').next().unwrap_or_default().trim();
        return if first.is_empty() {
            UNKNOWN_CLIENT.to_string()
        } else {
            first.to_string()
        };
    }

    header_str(headers, REAL_IP)
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
