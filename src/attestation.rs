//! Tip attestation records and their schema-encoded payload
//!
//! The payload follows the four-field tip schema
//! `string praise, address from, address to, uint256 amount`. Field
//! descriptors arrive as a JSON array in schema order; each position is
//! checked against its declared type before a value is taken from it.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::address::{parse_address, shorten_address, Address};
use crate::amount::{decimal_u256, format_units, COMMONS_DECIMALS};
use crate::error::Error;
use crate::time::format_block_timestamp;

/// Field names and type tags of the tip schema, in order
pub const TIP_SCHEMA: [(&str, &str); 4] = [
    ("praise", "string"),
    ("from", "address"),
    ("to", "address"),
    ("amount", "uint256"),
];

/// Text shown in place of a tip whose payload cannot be decoded
pub const UNREADABLE_TIP: &str = "(unreadable tip)";

/// One entry of a decoded payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedField {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub signature: String,
    pub value: FieldValue,
}

/// The typed value wrapper inside a [`DecodedField`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldValue {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    pub value: Value,
}

/// Decoded tip payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TipPayload {
    pub comment: String,
    pub from: Address,
    pub to: Address,
    /// Tipped amount in base units
    #[serde(with = "decimal_u256")]
    pub amount: U256,
}

/// Decode a `decodedDataJson` payload against the tip schema
pub fn decode_tip(decoded_data_json: &str) -> Result<TipPayload, Error> {
    let fields: Vec<DecodedField> = serde_json::from_str(decoded_data_json)
        .map_err(|e| Error::MalformedAttestation(format!("payload is not a field array: {}", e)))?;

    if fields.len() != TIP_SCHEMA.len() {
        return Err(Error::MalformedAttestation(format!(
            "expected {} fields, found {}",
            TIP_SCHEMA.len(),
            fields.len()
        )));
    }
    for (index, (field, (name, type_name))) in fields.iter().zip(TIP_SCHEMA.iter()).enumerate() {
        if field.type_name != *type_name {
            return Err(Error::MalformedAttestation(format!(
                "field {} ({}) should be {} but is declared {}",
                index, name, type_name, field.type_name
            )));
        }
    }

    Ok(TipPayload {
        comment: string_value(&fields[0])?,
        from: address_value(&fields[1])?,
        to: address_value(&fields[2])?,
        amount: uint_value(&fields[3])?,
    })
}

fn string_value(field: &DecodedField) -> Result<String, Error> {
    field
        .value
        .value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::MalformedAttestation(format!("{} is not a string", field.name)))
}

fn address_value(field: &DecodedField) -> Result<Address, Error> {
    let text = field
        .value
        .value
        .as_str()
        .ok_or_else(|| Error::MalformedAttestation(format!("{} is not an address", field.name)))?;
    parse_address(text)
        .map_err(|_| Error::MalformedAttestation(format!("{} is not an address: {}", field.name, text)))
}

/// Accepts `{"type": "BigNumber", "hex": "0x.."}` or a bare `0x..` string
fn uint_value(field: &DecodedField) -> Result<U256, Error> {
    let hex_text = match &field.value.value {
        Value::Object(map) => map.get("hex").and_then(Value::as_str),
        Value::String(text) => Some(text.as_str()),
        _ => None,
    }
    .ok_or_else(|| Error::MalformedAttestation(format!("{} has no hex value", field.name)))?;

    hex_to_u256(hex_text)
        .ok_or_else(|| Error::MalformedAttestation(format!("{} is not a uint256: {}", field.name, hex_text)))
}

/// Decode a `0x`-prefixed big-endian hex integer of at most 64 digits
pub fn hex_to_u256(text: &str) -> Option<U256> {
    let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))?;
    if digits.is_empty() || digits.len() > 64 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    U256::from_str_radix(digits, 16).ok()
}

/// An attestation as returned by the attestation indexer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationRecord {
    pub id: String,
    pub attester: String,
    pub recipient: String,
    #[serde(rename = "refUID", default)]
    pub ref_uid: String,
    #[serde(default)]
    pub revocable: bool,
    #[serde(default)]
    pub revoked: bool,
    #[serde(default)]
    pub schema_id: String,
    #[serde(default)]
    pub time: u64,
    #[serde(default)]
    pub time_created: u64,
    #[serde(default)]
    pub expiration_time: u64,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub decoded_data_json: String,
}

/// A tip ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TipView {
    pub id: String,
    pub payload: TipPayload,
    /// Recipient recorded on the attestation itself
    pub recipient: String,
    pub time_created: u64,
}

impl TipView {
    pub fn from_record(record: &AttestationRecord) -> Result<Self, Error> {
        Ok(Self {
            id: record.id.clone(),
            payload: decode_tip(&record.decoded_data_json)?,
            recipient: record.recipient.clone(),
            time_created: record.time_created,
        })
    }

    /// `0x1234...abcd → 0x5678...ef01`
    pub fn route(&self) -> String {
        format!(
            "{} → {}",
            shorten_address(&self.payload.from.to_string()),
            shorten_address(&self.recipient)
        )
    }

    /// Full-precision amount with the token symbol, e.g. `1.5 COMMONS`
    pub fn amount_display(&self) -> String {
        format!("{} COMMONS", format_units(self.payload.amount, COMMONS_DECIMALS))
    }

    pub fn date(&self) -> String {
        format_block_timestamp(&self.time_created.to_string())
    }
}

/// Decode every record, skipping the ones whose payload is malformed
pub fn decode_records(records: &[AttestationRecord]) -> Vec<TipView> {
    records
        .iter()
        .filter_map(|record| match TipView::from_record(record) {
            Ok(view) => Some(view),
            Err(e) => {
                warn!("Skipping attestation {}: {}", record.id, e);
                None
            }
        })
        .collect()
}

/// One display line for a record; malformed payloads render as a placeholder
pub fn summary_line(record: &AttestationRecord) -> String {
    match TipView::from_record(record) {
        Ok(view) => format!(
            "{}  {}  {}  {}",
            view.date(),
            view.route(),
            view.amount_display(),
            view.payload.comment
        ),
        Err(_) => format!("{}  {}", shorten_address(&record.id), UNREADABLE_TIP),
    }
}
