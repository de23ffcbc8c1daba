// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `data:<mime>;base64,<payload>` strings, as embedded in template variables
// and mail bodies.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Inline `bytes` as a base64 data URL of type `mime`.
pub fn encode(mime: &str, data: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_mime_and_payload() {
        assert_eq!(encode("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn payload_is_padded_standard_base64() {
        assert_eq!(
            encode("image/jpeg", &[0xff, 0xd8, 0xff, 0x00]),
            "data:image/jpeg;base64,/9j/AA=="
        );
        assert_eq!(encode("image/png", &[]), "data:image/png;base64,");
    }
}
