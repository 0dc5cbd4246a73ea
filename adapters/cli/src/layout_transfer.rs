use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use rampart_core::{GridPoint, MapId, TowerKind};
use serde::{Deserialize, Serialize};

const LAYOUT_DOMAIN: &str = "rampart";
const LAYOUT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const LAYOUT_HEADER: &str = "rampart:v1";
/// Delimiter used to separate the prefix, map identifier and payload.
const FIELD_DELIMITER: char = ':';

/// Towers placed on a map, in a form that can be pasted between runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct TowerLayout {
    /// Map the layout was built on.
    pub(crate) map: MapId,
    /// Towers in the order they should be purchased.
    pub(crate) towers: Vec<LayoutTower>,
}

impl TowerLayout {
    /// Encodes the layout into a single-line string.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = Payload {
            towers: self.towers.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!("{LAYOUT_HEADER}:{}:{encoded}", self.map.get()))
    }

    /// Decodes a layout from its string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let map = parts.next().ok_or(LayoutTransferError::MissingMap)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != LAYOUT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != LAYOUT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let map = map
            .trim()
            .parse::<u32>()
            .map(MapId::new)
            .map_err(|_| LayoutTransferError::InvalidMap(map.to_owned()))?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: Payload =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            map,
            towers: decoded.towers,
        })
    }
}

/// Tower entry of a transferred layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct LayoutTower {
    /// Kind of tower to purchase.
    pub(crate) kind: TowerKind,
    /// Cell the tower stands on.
    pub(crate) cell: GridPoint,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Payload {
    towers: Vec<LayoutTower>,
}

/// Errors that can occur while encoding or decoding layout strings.
#[derive(Debug)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing.
    MissingPrefix,
    /// The version segment was missing.
    MissingVersion,
    /// The map identifier segment was missing.
    MissingMap,
    /// The payload segment was missing.
    MissingPayload,
    /// The prefix segment did not name this game.
    InvalidPrefix(String),
    /// The version identifier is not understood.
    UnsupportedVersion(String),
    /// The map identifier is not a number.
    InvalidMap(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload could not be converted to or from JSON.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for LayoutTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "layout string was empty"),
            Self::MissingPrefix => write!(f, "layout string is missing the prefix"),
            Self::MissingVersion => write!(f, "layout string is missing the version"),
            Self::MissingMap => write!(f, "layout string is missing the map identifier"),
            Self::MissingPayload => write!(f, "layout string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "layout prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "layout version '{version}' is not supported")
            }
            Self::InvalidMap(map) => write!(f, "could not parse map identifier '{map}'"),
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode layout payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not process layout payload: {error}")
            }
        }
    }
}

impl Error for LayoutTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}
