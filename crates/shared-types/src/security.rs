//! # Message Sanitization
//!
//! Every message that leaves the node passes through [`sanitize_message`]:
//!
//! - absolute file paths are replaced by `[path]`
//! - loopback and private IPv4 addresses and `localhost` are replaced by
//!   `[ledger-host]`
//! - a message naming a certificate (`cert`, `certificate`, `x509` as whole
//!   words) collapses to a generic text

use std::net::Ipv4Addr;

/// Placeholder for scrubbed file paths.
pub const PATH_PLACEHOLDER: &str = "[path]";

/// Placeholder for scrubbed internal hosts.
pub const HOST_PLACEHOLDER: &str = "[ledger-host]";

/// Replacement for certificate-related messages.
pub const CERTIFICATE_MESSAGE: &str = "Certificate error occurred";

const PATH_PREFIXES: [&str; 8] = [
    "/home/", "/var/", "/usr/", "/opt/", "/tmp/", "C:\\", "D:\\", "/Users/",
];

/// Words marking a certificate failure. Matched as whole words only, so
/// identifiers such as `concert-1` pass through.
const CERTIFICATE_WORDS: [&str; 5] = ["cert", "certs", "certificate", "certificates", "x509"];

/// Scrub internal details from a message.
pub fn sanitize_message(msg: &str) -> String {
    let scrubbed = scrub_internal_hosts(&scrub_file_paths(msg));
    if mentions_certificate(&scrubbed) {
        return CERTIFICATE_MESSAGE.to_string();
    }
    scrubbed
}

fn mentions_certificate(msg: &str) -> bool {
    msg.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| CERTIFICATE_WORDS.contains(&word))
}

fn scrub_file_paths(msg: &str) -> String {
    let mut out = msg.to_string();
    for prefix in PATH_PREFIXES {
        let mut from = 0;
        while let Some(pos) = out[from..].find(prefix) {
            let start = from + pos;
            let body = start + prefix.len();
            let end = out[body..]
                .find([' ', ':', '\n'])
                .map(|off| body + off)
                .unwrap_or(out.len());
            out.replace_range(start..end, PATH_PLACEHOLDER);
            from = start + PATH_PLACEHOLDER.len();
        }
    }
    out
}

fn scrub_internal_hosts(msg: &str) -> String {
    let msg = msg.replace("localhost", HOST_PLACEHOLDER);
    let bytes = msg.as_bytes();
    let mut out = String::with_capacity(msg.len());
    let mut i = 0;

    while i < bytes.len() {
        let at_token_start = i == 0 || !(bytes[i - 1].is_ascii_digit() || bytes[i - 1] == b'.');
        if bytes[i].is_ascii_digit() && at_token_start {
            let mut end = i;
            while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
                end += 1;
            }
            let mut candidate = &msg[i..end];
            while candidate.ends_with('.') {
                candidate = &candidate[..candidate.len() - 1];
            }
            if let Ok(addr) = candidate.parse::<Ipv4Addr>() {
                if addr.is_loopback() || addr.is_private() {
                    out.push_str(HOST_PLACEHOLDER);
                    i += candidate.len();
                    continue;
                }
            }
            out.push_str(&msg[i..end]);
            i = end;
            continue;
        }
        // Copy one full UTF-8 character.
        let ch_len = msg[i..].chars().next().map(char::len_utf8).unwrap_or(1);
        out.push_str(&msg[i..i + ch_len]);
        i += ch_len;
    }
    out
}
