use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

const UNIVERSE_SIZE: u32 = 512;
/// Highest universe whose last channel still has an absolute number in `u32`.
pub const MAX_UNIVERSE: u32 = u32::MAX / UNIVERSE_SIZE;

/// Value object representing a DMX patch point.
///
/// Rules:
/// - `universe` is 1-based, at most `MAX_UNIVERSE`
/// - `address` is within 1..=512
/// - Scene documents may spell it absolute (`513`) or dotted (`2.1`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DmxAddress {
    pub dmx_break: u32,
    pub universe: u32,
    pub address: u16,
}

impl DmxAddress {
    /// Create a DmxAddress with validation
    pub fn new(dmx_break: u32, universe: u32, address: u16) -> Result<Self> {
        if universe == 0 {
            return Err(DomainError::DocumentParse(
                "DMX universe must be 1 or greater".to_string(),
            ));
        }
        if universe > MAX_UNIVERSE {
            return Err(DomainError::DocumentParse(format!(
                "DMX universe {universe} out of range (max {MAX_UNIVERSE})"
            )));
        }
        if address == 0 || u32::from(address) > UNIVERSE_SIZE {
            return Err(DomainError::DocumentParse(format!(
                "DMX address {address} out of range (1-512)"
            )));
        }
        Ok(Self {
            dmx_break,
            universe,
            address,
        })
    }

    /// Parse the textual form used inside scene documents.
    pub fn parse(text: &str, dmx_break: u32) -> Result<Self> {
        let text = text.trim();
        let invalid = || DomainError::DocumentParse(format!("Invalid DMX address '{text}'"));

        if let Some((universe, address)) = text.split_once('.') {
            let universe: u32 = universe.trim().parse().map_err(|_| invalid())?;
            let address: u16 = address.trim().parse().map_err(|_| invalid())?;
            return Self::new(dmx_break, universe, address);
        }

        let absolute: u32 = text.parse().map_err(|_| invalid())?;
        Self::from_absolute(dmx_break, absolute)
    }

    pub fn from_absolute(dmx_break: u32, absolute: u32) -> Result<Self> {
        if absolute == 0 {
            return Err(DomainError::DocumentParse(
                "Absolute DMX address must be 1 or greater".to_string(),
            ));
        }
        let zero_based = absolute - 1;
        let universe = zero_based / UNIVERSE_SIZE + 1;
        let address = (zero_based % UNIVERSE_SIZE + 1) as u16;
        Self::new(dmx_break, universe, address)
    }

    /// Absolute channel number, 1-based across all universes.
    ///
    /// `None` when the fields were set directly past `MAX_UNIVERSE`.
    pub fn absolute(&self) -> Option<u32> {
        self.universe
            .checked_sub(1)?
            .checked_mul(UNIVERSE_SIZE)?
            .checked_add(u32::from(self.address))
    }
}

impl std::fmt::Display for DmxAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:03}", self.universe, self.address)
    }
}
