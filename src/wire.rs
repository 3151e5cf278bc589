//! Wire format for the packet-dump protocol.
//!
//! Requests are exactly 2 bytes:
//! ```text
//! ┌───────────┬───────────────────────────────┐
//! │ call type │ payload                       │
//! │ 1 byte    │ 1 byte                        │
//! │ 1 or 2    │ 0 for type 1; sequence for 2  │
//! └───────────┴───────────────────────────────┘
//! ```
//!
//! Responses are fixed 17-byte frames, Big Endian:
//! ```text
//! ┌─────────┬───────┬──────────┬──────────┬──────────┐
//! │ symbol  │ side  │ quantity │ price    │ sequence │
//! │ 4 ASCII │ B / S │ i32 BE   │ i32 BE   │ i32 BE   │
//! └─────────┴───────┴──────────┴──────────┴──────────┘
//! ```
//!
//! [`decode_frame`] parses structurally, then validates semantically;
//! the first violated rule fails the whole decode.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Response frame size in bytes (fixed, exactly 17).
pub const FRAME_LEN: usize = 17;

/// Request size in bytes (fixed, exactly 2).
pub const REQUEST_LEN: usize = 2;

/// Call type: stream all packets.
pub const CALL_STREAM_ALL: u8 = 1;

/// Call type: resolve one packet by sequence.
pub const CALL_RESOLVE: u8 = 2;

/// Highest sequence representable in the single-byte resolve payload.
pub const MAX_RESOLVE_SEQUENCE: i32 = u8::MAX as i32;

/// Order side, wire-encoded as ASCII `B` / `S`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "B")]
    Buy,
    #[serde(rename = "S")]
    Sell,
}

impl Side {
    fn from_wire(byte: u8) -> Option<Self> {
        match byte {
            b'B' => Some(Side::Buy),
            b'S' => Some(Side::Sell),
            _ => None,
        }
    }

    fn to_wire(self) -> u8 {
        match self {
            Side::Buy => b'B',
            Side::Sell => b'S',
        }
    }
}

/// One decoded record. Constructed only by [`decode_frame`], so every
/// packet in circulation has passed wire-level validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    /// 4-character ASCII instrument code.
    pub symbol: String,
    pub side: Side,
    /// Strictly positive.
    pub quantity: i32,
    /// Strictly positive. No decimal scaling is applied.
    pub price: i32,
    /// Non-negative position in the server's emission order.
    pub sequence: i32,
}

/// Encode the "stream all packets" request.
pub fn encode_stream_all() -> [u8; REQUEST_LEN] {
    [CALL_STREAM_ALL, 0]
}

/// Encode a "resolve packet by sequence" request.
///
/// The payload is a single byte, so sequences outside `0..=255` are
/// rejected here rather than silently truncated.
pub fn encode_resolve(sequence: i32) -> Result<[u8; REQUEST_LEN], ValidationError> {
    if !(0..=MAX_RESOLVE_SEQUENCE).contains(&sequence) {
        return Err(ValidationError::SequenceOutOfRange(sequence));
    }
    Ok([CALL_RESOLVE, sequence as u8])
}

/// Decode and validate one 17-byte response frame.
pub fn decode_frame(buf: &[u8; FRAME_LEN]) -> Result<Packet, ValidationError> {
    let symbol_bytes = &buf[0..4];
    let side_byte = buf[4];
    let quantity = i32::from_be_bytes([buf[5], buf[6], buf[7], buf[8]]);
    let price = i32::from_be_bytes([buf[9], buf[10], buf[11], buf[12]]);
    let sequence = i32::from_be_bytes([buf[13], buf[14], buf[15], buf[16]]);

    let symbol = match std::str::from_utf8(symbol_bytes) {
        Ok(s) if s.is_ascii() && !s.trim().is_empty() => s.to_string(),
        _ => {
            return Err(ValidationError::InvalidSymbol(
                String::from_utf8_lossy(symbol_bytes).into_owned(),
            ));
        }
    };
    let side = Side::from_wire(side_byte)
        .ok_or_else(|| ValidationError::InvalidSide((side_byte as char).to_string()))?;
    if quantity <= 0 {
        return Err(ValidationError::InvalidQuantity(quantity));
    }
    if price <= 0 {
        return Err(ValidationError::InvalidPrice(price));
    }
    if sequence < 0 {
        return Err(ValidationError::InvalidSequence(sequence));
    }

    Ok(Packet {
        symbol,
        side,
        quantity,
        price,
        sequence,
    })
}

/// Encode a packet into its 17-byte frame layout. The inverse of
/// [`decode_frame`]; used to fabricate server responses in tests and
/// tooling.
///
/// # Panics
///
/// Panics if the symbol is not exactly 4 bytes. Packets produced by
/// [`decode_frame`] always satisfy this.
pub fn encode_frame(packet: &Packet) -> [u8; FRAME_LEN] {
    let mut buf = [0u8; FRAME_LEN];
    let sym = packet.symbol.as_bytes();
    assert_eq!(sym.len(), 4, "symbol must be exactly 4 bytes");
    buf[0..4].copy_from_slice(&sym[..4]);
    buf[4] = packet.side.to_wire();
    buf[5..9].copy_from_slice(&packet.quantity.to_be_bytes());
    buf[9..13].copy_from_slice(&packet.price.to_be_bytes());
    buf[13..17].copy_from_slice(&packet.sequence.to_be_bytes());
    buf
}
