//! Partial view of `DownstreamTlsContext` and `CommonTlsContext`.
//!
//! xds-api v0.2 doesn't generate these messages. Only the fields this server
//! edits are decoded; every other field is kept as its raw protobuf encoding
//! and written back unchanged, so a decode/encode cycle never drops TLS
//! settings we don't model.
use prost::Message;
use prost::encoding::{WireType, decode_key, decode_varint, encode_key, encode_varint};
use xds_api::pb::envoy::extensions::transport_sockets::tls::v3::SdsSecretConfig;
use xds_api::pb::google::protobuf::Any;

use crate::error::{Error, Result};

pub const DOWNSTREAM_TLS_CONTEXT_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.transport_sockets.tls.v3.DownstreamTlsContext";

/// `DownstreamTlsContext.common_tls_context`
const COMMON_TLS_CONTEXT_TAG: u32 = 1;
/// `CommonTlsContext.tls_certificate_sds_secret_configs`
const TLS_CERTIFICATE_SDS_SECRET_CONFIGS_TAG: u32 = 6;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownstreamTlsContext {
    pub common_tls_context: Option<CommonTlsContext>,
    /// Raw encoding of all other fields, in wire order
    retained: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonTlsContext {
    pub tls_certificate_sds_secret_configs: Vec<SdsSecretConfig>,
    /// Raw encoding of all other fields, in wire order
    retained: Vec<u8>,
}

impl DownstreamTlsContext {
    /// Unpack a transport socket's typed config
    pub fn from_any(any: &Any) -> Result<Self> {
        if any.type_url != DOWNSTREAM_TLS_CONTEXT_TYPE_URL {
            return Err(Error::UnexpectedTypeUrl {
                expected: DOWNSTREAM_TLS_CONTEXT_TYPE_URL,
                found: any.type_url.clone(),
            });
        }
        Self::decode(&any.value)
    }

    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut context = Self::default();
        for field in split_fields(buf)? {
            if field.tag == COMMON_TLS_CONTEXT_TAG {
                let common = CommonTlsContext::decode(field.length_delimited()?)?;
                // A repeated singular message field merges into the first one
                match context.common_tls_context.as_mut() {
                    Some(existing) => existing.merge(common),
                    None => context.common_tls_context = Some(common),
                }
            } else {
                context.retained.extend_from_slice(field.raw);
            }
        }
        Ok(context)
    }

    pub fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = self.retained.clone();
        if let Some(common) = &self.common_tls_context {
            encode_length_delimited(COMMON_TLS_CONTEXT_TAG, &common.encode_to_vec(), &mut buf);
        }
        buf
    }

    pub fn to_any(&self) -> Any {
        Any {
            type_url: DOWNSTREAM_TLS_CONTEXT_TYPE_URL.to_string(),
            value: self.encode_to_vec(),
        }
    }

    /// Get the common TLS context, creating an empty one if absent
    pub fn common_tls_context_mut(&mut self) -> &mut CommonTlsContext {
        self.common_tls_context.get_or_insert_with(CommonTlsContext::default)
    }
}

impl CommonTlsContext {
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut context = Self::default();
        for field in split_fields(buf)? {
            if field.tag == TLS_CERTIFICATE_SDS_SECRET_CONFIGS_TAG {
                let config = SdsSecretConfig::decode(field.length_delimited()?)?;
                context.tls_certificate_sds_secret_configs.push(config);
            } else {
                context.retained.extend_from_slice(field.raw);
            }
        }
        Ok(context)
    }

    pub fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = self.retained.clone();
        for config in &self.tls_certificate_sds_secret_configs {
            encode_length_delimited(
                TLS_CERTIFICATE_SDS_SECRET_CONFIGS_TAG,
                &config.encode_to_vec(),
                &mut buf,
            );
        }
        buf
    }

    fn merge(&mut self, other: CommonTlsContext) {
        self.tls_certificate_sds_secret_configs
            .extend(other.tls_certificate_sds_secret_configs);
        self.retained.extend(other.retained);
    }
}

/// One top-level field of an encoded message
struct RawField<'a> {
    tag: u32,
    wire_type: WireType,
    /// Key and value bytes exactly as they appeared on the wire
    raw: &'a [u8],
    /// Value bytes (without length prefix) for length-delimited fields
    payload: &'a [u8],
}

impl<'a> RawField<'a> {
    fn length_delimited(&self) -> Result<&'a [u8]> {
        if self.wire_type != WireType::LengthDelimited {
            return Err(Error::TlsContext(format!(
                "field {} has wire type {:?}, expected length-delimited",
                self.tag, self.wire_type
            )));
        }
        Ok(self.payload)
    }
}

fn split_fields(buf: &[u8]) -> Result<Vec<RawField<'_>>> {
    let mut fields = Vec::new();
    let mut rest = buf;

    while !rest.is_empty() {
        let start = buf.len() - rest.len();
        let (tag, wire_type) = decode_key(&mut rest)?;

        let mut payload: &[u8] = &[];
        match wire_type {
            WireType::Varint => {
                decode_varint(&mut rest)?;
            }
            WireType::SixtyFourBit => rest = advance(rest, 8, tag)?,
            WireType::ThirtyTwoBit => rest = advance(rest, 4, tag)?,
            WireType::LengthDelimited => {
                let len = usize::try_from(decode_varint(&mut rest)?)
                    .map_err(|_| Error::TlsContext(format!("field {} length overflow", tag)))?;
                payload = rest.get(..len).ok_or_else(|| truncated(tag))?;
                rest = &rest[len..];
            }
            WireType::StartGroup | WireType::EndGroup => {
                return Err(Error::TlsContext(format!(
                    "field {} uses unsupported group encoding",
                    tag
                )));
            }
        }

        let end = buf.len() - rest.len();
        fields.push(RawField {
            tag,
            wire_type,
            raw: &buf[start..end],
            payload,
        });
    }

    Ok(fields)
}

fn advance(buf: &[u8], len: usize, tag: u32) -> Result<&[u8]> {
    buf.get(len..).ok_or_else(|| truncated(tag))
}

fn truncated(tag: u32) -> Error {
    Error::TlsContext(format!("field {} is truncated", tag))
}

fn encode_length_delimited(tag: u32, value: &[u8], buf: &mut Vec<u8>) {
    encode_key(tag, WireType::LengthDelimited, buf);
    encode_varint(value.len() as u64, buf);
    buf.extend_from_slice(value);
}
