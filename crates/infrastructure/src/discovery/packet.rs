//! Art-Net poll / poll-reply wire format.
//!
//! Only the fields needed for discovery are encoded or decoded. Multi-byte
//! header fields are little-endian; the reported IP is four octets in
//! network order.

use bytes::{BufMut, Bytes, BytesMut};
use domain::DomainError;
use std::net::Ipv4Addr;

pub const ARTNET_PORT: u16 = 6454;
pub const ARTNET_ID: &[u8; 8] = b"Art-Net\0";
pub const OP_POLL: u16 = 0x2000;
pub const OP_POLL_REPLY: u16 = 0x2100;
pub const PROTOCOL_VERSION: u16 = 0x0000;

const HEADER_LEN: usize = 10;
const IP_RANGE: std::ops::Range<usize> = 10..14;
const SHORT_NAME_RANGE: std::ops::Range<usize> = 26..43;
const LONG_NAME_RANGE: std::ops::Range<usize> = 44..171;

/// Poll request broadcast to every node on the segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtPoll {
    pub talk_to_me: u8,
    pub priority: u8,
}

impl ArtPoll {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_LEN + 4);
        buf.put_slice(ARTNET_ID);
        buf.put_u16_le(OP_POLL);
        buf.put_u16_le(PROTOCOL_VERSION);
        buf.put_u8(self.talk_to_me);
        buf.put_u8(self.priority);
        buf.freeze()
    }
}

/// Fields of a poll reply relevant to discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReply {
    pub reported_ip: Ipv4Addr,
    pub short_name: String,
    pub long_name: String,
}

/// True when the datagram carries the Art-Net identifier and the reply opcode.
pub fn is_poll_reply(data: &[u8]) -> bool {
    data.len() >= HEADER_LEN
        && data.starts_with(ARTNET_ID)
        && u16::from_le_bytes([data[8], data[9]]) == OP_POLL_REPLY
}

pub fn decode_poll_reply(data: &[u8]) -> Result<PollReply, DomainError> {
    if !is_poll_reply(data) {
        return Err(DomainError::ProtocolDecode(format!(
            "not an ArtPollReply ({} bytes)",
            data.len()
        )));
    }

    let ip = data.get(IP_RANGE).ok_or_else(|| {
        DomainError::ProtocolDecode(format!(
            "reply truncated before IP address ({} bytes)",
            data.len()
        ))
    })?;

    Ok(PollReply {
        reported_ip: Ipv4Addr::new(ip[0], ip[1], ip[2], ip[3]),
        short_name: ascii_field(data, SHORT_NAME_RANGE),
        long_name: ascii_field(data, LONG_NAME_RANGE),
    })
}

/// NUL-padded ASCII text. Only the trailing padding is stripped; a field cut
/// short by the datagram end is decoded from whatever bytes are present.
fn ascii_field(data: &[u8], range: std::ops::Range<usize>) -> String {
    let end = range.end.min(data.len());
    let Some(raw) = data.get(range.start..end) else {
        return String::new();
    };
    let len = raw.iter().rposition(|&b| b != 0).map_or(0, |last| last + 1);
    raw[..len]
        .iter()
        .filter(|b| b.is_ascii())
        .map(|&b| b as char)
        .collect()
}

#[cfg(test)]
pub(crate) fn build_reply(ip: [u8; 4], short_name: &str, long_name: &str) -> Vec<u8> {
    let mut data = vec![0u8; 239];
    data[..8].copy_from_slice(ARTNET_ID);
    data[8..10].copy_from_slice(&OP_POLL_REPLY.to_le_bytes());
    data[10..14].copy_from_slice(&ip);
    data[26..26 + short_name.len()].copy_from_slice(short_name.as_bytes());
    data[44..44 + long_name.len()].copy_from_slice(long_name.as_bytes());
    data
}
