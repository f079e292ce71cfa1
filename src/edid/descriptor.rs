//! Display descriptor blocks
//!
//! The EDID base block carries four 18-byte descriptor slots starting at
//! offset 0x36. A slot whose first two bytes are zero is a display
//! descriptor; its tag byte selects the payload. Slots with a nonzero
//! leading word are detailed timing descriptors, which we do not decode.

use super::MonitorInfo;

const DESCRIPTOR_BASE: usize = 0x36;
const DESCRIPTOR_SIZE: usize = 18;
const DESCRIPTOR_COUNT: usize = 4;

/// Text payload width inside a display descriptor
const TEXT_LEN: usize = 13;

// Display descriptor tags
const TAG_PRODUCT_NAME: u8 = 0xFC;
const TAG_SERIAL_NUMBER: u8 = 0xFF;
const TAG_STRING: u8 = 0xFE;
const TAG_RANGE_LIMITS: u8 = 0xFD;
const TAG_COLOR_POINT: u8 = 0xFB;
const TAG_STANDARD_TIMINGS: u8 = 0xFA;
const TAG_COLOR_MANAGEMENT: u8 = 0xF9;
const TAG_TIMING_CODES: u8 = 0xF8;
const TAG_ESTABLISHED_TIMINGS: u8 = 0xF7;

/// Walk the four descriptor slots and fill in the text fields.
pub(super) fn decode_descriptors(edid: &[u8], info: &mut MonitorInfo) {
    for slot in 0..DESCRIPTOR_COUNT {
        let base = DESCRIPTOR_BASE + slot * DESCRIPTOR_SIZE;
        let desc = &edid[base..base + DESCRIPTOR_SIZE];

        if desc[0] != 0x00 || desc[1] != 0x00 {
            // detailed timing descriptor
            continue;
        }

        decode_display_descriptor(desc, info);
    }
}

fn decode_display_descriptor(desc: &[u8], info: &mut MonitorInfo) {
    let payload = &desc[5..5 + TEXT_LEN];

    match desc[3] {
        TAG_PRODUCT_NAME => info.product_name = decode_lf_string(payload),
        TAG_SERIAL_NUMBER => info.serial_number = decode_lf_string(payload),
        TAG_STRING => info.extra_string = decode_lf_string(payload),
        // Structured auxiliary blocks, not needed for hotplug reporting
        TAG_RANGE_LIMITS
        | TAG_COLOR_POINT
        | TAG_STANDARD_TIMINGS
        | TAG_COLOR_MANAGEMENT
        | TAG_TIMING_CODES
        | TAG_ESTABLISHED_TIMINGS => {}
        // Unknown or vendor tags are not an error
        _ => {}
    }
}

/// Decode a line-feed terminated descriptor string.
///
/// Copies at most 13 bytes, stopping at the first 0x0A. Embedded NUL bytes
/// become spaces; some manufacturers pad with NULs instead of a newline.
pub(super) fn decode_lf_string(payload: &[u8]) -> String {
    let mut out = Vec::with_capacity(TEXT_LEN);

    for &b in payload.iter().take(TEXT_LEN) {
        match b {
            0x0A => break,
            0x00 => out.push(b' '),
            _ => out.push(b),
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lf_terminates() {
        assert_eq!(decode_lf_string(b"ACME Display\n"), "ACME Display");
        assert_eq!(decode_lf_string(b"X\nleftovers..."), "X");
    }

    #[test]
    fn test_nul_maps_to_space() {
        assert_eq!(decode_lf_string(b"AB\x00CD\n\x00\x00\x00\x00\x00\x00\x00"), "AB CD");
    }

    #[test]
    fn test_full_width_no_terminator() {
        // exactly 13 bytes, no newline: everything is kept, nothing more
        assert_eq!(decode_lf_string(b"THIRTEENCHARS and junk"), "THIRTEENCHARS");
    }

    #[test]
    fn test_nul_padding_keeps_trailing_spaces() {
        let decoded = decode_lf_string(b"AB\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00");
        assert_eq!(decoded, format!("AB{}", " ".repeat(11)));
    }
}
