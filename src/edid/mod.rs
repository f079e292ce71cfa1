//! EDID block decoder
//!
//! Decodes the 128-byte Extended Display Identification Data block a monitor
//! exposes (via the RandR "EDID" output property or sysfs) into a structured
//! [`MonitorInfo`]. Pure byte-level parsing, no I/O.

mod descriptor;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::fmt;

/// The fixed 8-byte signature every EDID block starts with.
pub const EDID_MAGIC: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

/// Minimum block size; extension blocks append in 128-byte multiples.
pub const EDID_BLOCK_SIZE: usize = 128;

/// EDID decode failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer than 128 bytes supplied
    Truncated { len: usize },
    /// Bytes 0..8 do not match the EDID signature
    BadHeader,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Truncated { len } => {
                write!(f, "EDID block truncated: need {} bytes, got {}", EDID_BLOCK_SIZE, len)
            }
            DecodeError::BadHeader => write!(f, "EDID header signature mismatch"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Digital interface type (video input definition, low nibble)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DigitalInterface {
    Undefined = 0,
    Dvi = 1,
    HdmiA = 2,
    HdmiB = 3,
    Mddi = 4,
    DisplayPort = 5,
}

impl DigitalInterface {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => DigitalInterface::Dvi,
            2 => DigitalInterface::HdmiA,
            3 => DigitalInterface::HdmiB,
            4 => DigitalInterface::Mddi,
            5 => DigitalInterface::DisplayPort,
            _ => DigitalInterface::Undefined,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DigitalInterface::Undefined => "Undefined",
            DigitalInterface::Dvi => "DVI",
            DigitalInterface::HdmiA => "HDMI-A",
            DigitalInterface::HdmiB => "HDMI-B",
            DigitalInterface::Mddi => "MDDI",
            DigitalInterface::DisplayPort => "DisplayPort",
        }
    }
}

impl fmt::Display for DigitalInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Analog color type (feature support byte, bits 4-3)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorType {
    Undefined = 0,
    Monochrome = 1,
    Rgb = 2,
    Other = 3,
}

impl ColorType {
    pub fn from_u8(value: u8) -> Self {
        match value & 0x03 {
            1 => ColorType::Monochrome,
            2 => ColorType::Rgb,
            3 => ColorType::Other,
            _ => ColorType::Undefined,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorType::Undefined => "Undefined",
            ColorType::Monochrome => "Monochrome",
            ColorType::Rgb => "RGB",
            ColorType::Other => "Other",
        }
    }
}

impl fmt::Display for ColorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Signal input variant: digital panels report interface and color encodings,
/// analog ones only a coarse color type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalInput {
    Digital {
        interface: DigitalInterface,
        rgb444: bool,
        ycrcb444: bool,
        ycrcb422: bool,
    },
    Analog {
        color_type: ColorType,
    },
}

impl SignalInput {
    pub fn is_digital(&self) -> bool {
        matches!(self, SignalInput::Digital { .. })
    }
}

/// Decoded EDID base block
///
/// Built fresh per [`decode`] call; only returned when the header signature
/// validates. The checksum is informational: real-world blocks with a bad
/// checksum byte are still accepted, matching common decoder behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorInfo {
    /// Wrapping sum of all 128 bytes (zero for a spec-conforming block)
    pub checksum: u8,
    /// Three-letter PNP vendor id, when the encoded letters are in range
    pub vendor: Option<String>,
    /// Manufacturer-assigned product code
    pub product_code: u16,
    /// 32-bit serial number field (zero when unused)
    pub serial: u32,
    /// Product name from descriptor tag 0xFC, at most 13 chars
    pub product_name: String,
    /// Serial number string from descriptor tag 0xFF, at most 13 chars
    pub serial_number: String,
    /// Unstructured text from descriptor tag 0xFE, at most 13 chars
    pub extra_string: String,
    /// Physical image size; zero means undefined (projectors)
    pub width_mm: u32,
    pub height_mm: u32,
    /// Landscape aspect ratio, when the size fields encode one (EDID 1.4)
    pub aspect_ratio: Option<f32>,
    /// Display gamma; None when the field is 0xFF (stored elsewhere)
    pub gamma: Option<f32>,
    /// Week of manufacture, 1..=54; None when unset or out of range
    pub production_week: Option<u8>,
    /// Year of manufacture
    pub production_year: Option<u16>,
    /// Model year, when the week byte is 0xFF
    pub model_year: Option<u16>,
    pub major_version: u8,
    pub minor_version: u8,
    pub input: SignalInput,
    /// DPMS support flags
    pub standby: bool,
    pub suspend: bool,
    pub active_off: bool,
}

impl MonitorInfo {
    pub fn is_digital(&self) -> bool {
        self.input.is_digital()
    }
}

/// Decode an EDID base block.
///
/// Accepts any buffer of at least 128 bytes; extension blocks past the base
/// block are ignored. A bad header is a hard failure, never a partial struct.
pub fn decode(edid: &[u8]) -> Result<MonitorInfo, DecodeError> {
    if edid.len() < EDID_BLOCK_SIZE {
        return Err(DecodeError::Truncated { len: edid.len() });
    }
    if edid[0..8] != EDID_MAGIC {
        return Err(DecodeError::BadHeader);
    }

    let checksum = edid[..EDID_BLOCK_SIZE]
        .iter()
        .fold(0u8, |sum, b| sum.wrapping_add(*b));

    let major_version = edid[18];
    let minor_version = edid[19];

    let mut info = MonitorInfo {
        checksum,
        vendor: decode_vendor(BigEndian::read_u16(&edid[8..10])),
        product_code: LittleEndian::read_u16(&edid[10..12]),
        serial: LittleEndian::read_u32(&edid[12..16]),
        product_name: String::new(),
        serial_number: String::new(),
        extra_string: String::new(),
        width_mm: 0,
        height_mm: 0,
        aspect_ratio: None,
        gamma: decode_gamma(edid[23]),
        production_week: None,
        production_year: None,
        model_year: None,
        major_version,
        minor_version,
        input: decode_signal_input(edid[20], edid[24]),
        standby: edid[24] & 0x80 != 0,
        suspend: edid[24] & 0x40 != 0,
        active_off: edid[24] & 0x20 != 0,
    };

    decode_manufacture_date(edid[16], edid[17], &mut info);
    decode_screen_size(edid[21], edid[22], minor_version, &mut info);
    descriptor::decode_descriptors(edid, &mut info);

    Ok(info)
}

/// PNP vendor id: three 5-bit letters packed big-endian, 1 = 'A'.
fn decode_vendor(raw: u16) -> Option<String> {
    let letters = [(raw >> 10) & 0x1F, (raw >> 5) & 0x1F, raw & 0x1F];
    let mut vendor = String::with_capacity(3);

    for code in letters {
        if !(1..=26).contains(&code) {
            return None;
        }
        vendor.push((b'A' + code as u8 - 1) as char);
    }

    Some(vendor)
}

/// Gamma is stored as (gamma * 100) - 100; 0xFF means "defined elsewhere".
fn decode_gamma(raw: u8) -> Option<f32> {
    if raw == 0xFF {
        return None;
    }
    Some((raw as f32 + 100.0) / 100.0)
}

fn decode_signal_input(video_input: u8, features: u8) -> SignalInput {
    if video_input & 0x80 != 0 {
        SignalInput::Digital {
            interface: DigitalInterface::from_u8(video_input & 0x0F),
            // digital displays always support RGB 4:4:4
            rgb444: true,
            ycrcb444: features & 0x08 != 0,
            ycrcb422: features & 0x10 != 0,
        }
    } else {
        SignalInput::Analog {
            color_type: ColorType::from_u8(features >> 3),
        }
    }
}

/// Week 1..=54 is a calendar week; 0xFF redefines the year byte as the model
/// year; anything else leaves the week undefined.
fn decode_manufacture_date(week: u8, year: u8, info: &mut MonitorInfo) {
    if week == 0xFF {
        info.model_year = Some(1990 + year as u16);
        return;
    }

    if (1..=54).contains(&week) {
        info.production_week = Some(week);
    }
    info.production_year = Some(1990 + year as u16);
}

/// Size bytes are in cm. On EDID 1.4 a single nonzero byte encodes an aspect
/// ratio instead; both zero means undefined (projector).
fn decode_screen_size(h_cm: u8, v_cm: u8, minor_version: u8, info: &mut MonitorInfo) {
    if h_cm != 0 && v_cm != 0 {
        info.width_mm = h_cm as u32 * 10;
        info.height_mm = v_cm as u32 * 10;
        let ratio = info.width_mm as f32 / info.height_mm as f32;
        info.aspect_ratio = Some(ratio);
    } else if minor_version >= 4 && h_cm != 0 {
        info.aspect_ratio = Some((h_cm as f32 + 99.0) / 100.0);
    } else if minor_version >= 4 && v_cm != 0 {
        info.aspect_ratio = Some(100.0 / (v_cm as f32 + 99.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal valid EDID base block: magic, ACME vendor, 1.3, digital
    /// HDMI-A input, 40x30 cm, gamma 2.20, week 12 of 2014, DPMS standby +
    /// active-off, serial 0x01020304, with a correct checksum byte.
    fn sample_edid() -> [u8; 128] {
        let mut edid = [0u8; 128];
        edid[0..8].copy_from_slice(&EDID_MAGIC);
        // "ACM" = 00001 00011 01101
        edid[8] = 0x04;
        edid[9] = 0x6D;
        // product code 0xA123 little-endian
        edid[10] = 0x23;
        edid[11] = 0xA1;
        // serial 0x01020304 little-endian
        edid[12] = 0x04;
        edid[13] = 0x03;
        edid[14] = 0x02;
        edid[15] = 0x01;
        edid[16] = 12; // week
        edid[17] = 24; // 1990 + 24 = 2014
        edid[18] = 1;
        edid[19] = 3;
        edid[20] = 0x82; // digital, HDMI-A
        edid[21] = 40; // cm
        edid[22] = 30;
        edid[23] = 120; // gamma 2.20
        edid[24] = 0xA8; // standby + active-off + ycrcb444
        fix_checksum(&mut edid);
        edid
    }

    fn fix_checksum(edid: &mut [u8; 128]) {
        edid[127] = 0;
        let sum = edid.iter().fold(0u8, |s, b| s.wrapping_add(*b));
        edid[127] = 0u8.wrapping_sub(sum);
    }

    fn set_descriptor(edid: &mut [u8; 128], slot: usize, tag: u8, payload: &[u8]) {
        let base = 0x36 + slot * 18;
        edid[base] = 0;
        edid[base + 1] = 0;
        edid[base + 3] = tag;
        edid[base + 5..base + 5 + payload.len()].copy_from_slice(payload);
    }

    #[test]
    fn test_bad_header_rejected() {
        let mut edid = sample_edid();
        edid[0] = 0x55;
        assert_eq!(decode(&edid), Err(DecodeError::BadHeader));
    }

    #[test]
    fn test_truncated_rejected() {
        let edid = sample_edid();
        assert_eq!(decode(&edid[..127]), Err(DecodeError::Truncated { len: 127 }));
        assert_eq!(decode(&[]), Err(DecodeError::Truncated { len: 0 }));
    }

    #[test]
    fn test_fixed_fields() {
        let info = decode(&sample_edid()).unwrap();
        assert_eq!(info.vendor.as_deref(), Some("ACM"));
        assert_eq!(info.product_code, 0xA123);
        assert_eq!(info.serial, 0x01020304);
        assert_eq!(info.production_week, Some(12));
        assert_eq!(info.production_year, Some(2014));
        assert_eq!(info.model_year, None);
        assert_eq!(info.major_version, 1);
        assert_eq!(info.minor_version, 3);
        assert_eq!(info.width_mm, 400);
        assert_eq!(info.height_mm, 300);
        assert_eq!(info.gamma, Some(2.2));
        assert!(info.standby);
        assert!(!info.suspend);
        assert!(info.active_off);
    }

    #[test]
    fn test_digital_input() {
        let info = decode(&sample_edid()).unwrap();
        assert!(info.is_digital());
        match info.input {
            SignalInput::Digital {
                interface,
                rgb444,
                ycrcb444,
                ycrcb422,
            } => {
                assert_eq!(interface, DigitalInterface::HdmiA);
                assert!(rgb444);
                assert!(ycrcb444);
                assert!(!ycrcb422);
            }
            SignalInput::Analog { .. } => panic!("expected digital input"),
        }
    }

    #[test]
    fn test_analog_input() {
        let mut edid = sample_edid();
        edid[20] = 0x00;
        edid[24] = 0x10; // color type bits = 10 -> RGB
        fix_checksum(&mut edid);

        let info = decode(&edid).unwrap();
        assert!(!info.is_digital());
        assert_eq!(info.input, SignalInput::Analog { color_type: ColorType::Rgb });
    }

    #[test]
    fn test_gamma_255_is_undefined() {
        let mut edid = sample_edid();
        edid[23] = 0xFF;
        fix_checksum(&mut edid);
        assert_eq!(decode(&edid).unwrap().gamma, None);
    }

    #[test]
    fn test_week_out_of_range_is_undefined() {
        let mut edid = sample_edid();
        edid[16] = 60;
        fix_checksum(&mut edid);
        let info = decode(&edid).unwrap();
        assert_eq!(info.production_week, None);
        assert_eq!(info.production_year, Some(2014));
    }

    #[test]
    fn test_week_255_selects_model_year() {
        let mut edid = sample_edid();
        edid[16] = 0xFF;
        fix_checksum(&mut edid);
        let info = decode(&edid).unwrap();
        assert_eq!(info.production_week, None);
        assert_eq!(info.production_year, None);
        assert_eq!(info.model_year, Some(2014));
    }

    #[test]
    fn test_product_name_descriptor() {
        let mut edid = sample_edid();
        set_descriptor(&mut edid, 0, 0xFC, b"ACME Display\n");
        fix_checksum(&mut edid);
        assert_eq!(decode(&edid).unwrap().product_name, "ACME Display");
    }

    #[test]
    fn test_all_text_descriptors() {
        let mut edid = sample_edid();
        set_descriptor(&mut edid, 0, 0xFC, b"ACME Display\n");
        set_descriptor(&mut edid, 1, 0xFF, b"SN-12345\n");
        set_descriptor(&mut edid, 2, 0xFE, b"rev B\n");
        fix_checksum(&mut edid);

        let info = decode(&edid).unwrap();
        assert_eq!(info.product_name, "ACME Display");
        assert_eq!(info.serial_number, "SN-12345");
        assert_eq!(info.extra_string, "rev B");
    }

    #[test]
    fn test_embedded_nul_becomes_space() {
        let mut edid = sample_edid();
        set_descriptor(&mut edid, 0, 0xFC, b"AB\x00CD\n");
        fix_checksum(&mut edid);
        assert_eq!(decode(&edid).unwrap().product_name, "AB CD");
    }

    #[test]
    fn test_unknown_descriptor_tag_ignored() {
        let mut edid = sample_edid();
        set_descriptor(&mut edid, 0, 0x42, b"garbage here\n");
        set_descriptor(&mut edid, 1, 0xFD, &[0x30, 0x3C, 0x1E, 0x4B, 0x0F]);
        fix_checksum(&mut edid);

        let info = decode(&edid).unwrap();
        assert_eq!(info.product_name, "");
        assert_eq!(info.serial_number, "");
        assert_eq!(info.extra_string, "");
    }

    #[test]
    fn test_bad_checksum_still_decodes() {
        let mut edid = sample_edid();
        set_descriptor(&mut edid, 0, 0xFC, b"ACME Display\n");
        fix_checksum(&mut edid);
        edid[127] = edid[127].wrapping_add(1);

        let info = decode(&edid).unwrap();
        assert_eq!(info.checksum, 1);
        assert_eq!(info.product_name, "ACME Display");
    }

    #[test]
    fn test_projector_size_undefined() {
        let mut edid = sample_edid();
        edid[21] = 0;
        edid[22] = 0;
        fix_checksum(&mut edid);

        let info = decode(&edid).unwrap();
        assert_eq!(info.width_mm, 0);
        assert_eq!(info.height_mm, 0);
        assert_eq!(info.aspect_ratio, None);
    }

    #[test]
    fn test_aspect_ratio_only_on_edid_1_4() {
        let mut edid = sample_edid();
        edid[19] = 4;
        edid[21] = 79; // (79 + 99) / 100 = 16:9
        edid[22] = 0;
        fix_checksum(&mut edid);

        let info = decode(&edid).unwrap();
        assert_eq!(info.width_mm, 0);
        assert_eq!(info.height_mm, 0);
        assert_eq!(info.aspect_ratio, Some(1.78));
    }

    #[test]
    fn test_vendor_out_of_range_is_none() {
        let mut edid = sample_edid();
        edid[8] = 0x00; // first letter code 0
        edid[9] = 0x00;
        fix_checksum(&mut edid);
        assert_eq!(decode(&edid).unwrap().vendor, None);
    }
}
