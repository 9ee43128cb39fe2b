//! # Wire Codec
//!
//! Network encoding of registrations and pings. Only wire-visible fields are
//! carried; receiver-local bookkeeping is rebuilt on decode.
//!
//! ```text
//! ServiceNode     = key(33) tier(1) payment_key_hash(20) collateral(varint, 36 each)
//!                   anchor_height(u32 LE) anchor_hash(32) signature(varbytes)
//! ServiceNodePing = key(33) anchor_height(u32 LE) anchor_hash(32) config(varstr)
//!                   ServiceNode signature(varbytes)
//! ```

use crate::domain::ping::ServiceNodePing;
use crate::domain::service_node::ServiceNode;
use crate::domain::value_objects::Tier;
use shared_crypto::{Secp256k1PublicKey, COMPRESSED_PUBLIC_KEY_SIZE};
use shared_types::{
    write_var_bytes, write_var_string, write_vec, BlockAnchor, CodecError, OutPoint, WireDecode,
    WireEncode, WireReader, OUTPOINT_SIZE,
};

impl WireEncode for ServiceNode {
    fn encode(&self, out: &mut Vec<u8>) {
        self.identity_key().as_bytes().encode(out);
        self.tier().as_u8().encode(out);
        self.payment_key_hash().encode(out);
        write_vec(out, self.collateral());
        self.anchor_height().encode(out);
        self.anchor_hash().encode(out);
        write_var_bytes(out, self.signature());
    }
}

impl WireDecode for ServiceNode {
    /// Decoded records start with the last-seen anchor at the registration
    /// anchor and the registration time set to now.
    fn decode(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        let identity_key =
            Secp256k1PublicKey::from_raw(reader.read_array::<COMPRESSED_PUBLIC_KEY_SIZE>()?);
        let tier = Tier::from_u8(reader.read_u8()?);
        let payment_key_hash = reader.read_array::<20>()?;
        let collateral = reader.read_vec::<OutPoint>(OUTPOINT_SIZE)?;
        let height = reader.read_u32_le()?;
        let hash = reader.read_array::<32>()?;
        let signature = reader.read_var_bytes()?;

        Ok(ServiceNode::new(
            identity_key,
            tier,
            payment_key_hash,
            collateral,
            BlockAnchor::new(height, hash),
            signature,
        ))
    }
}

impl WireEncode for ServiceNodePing {
    fn encode(&self, out: &mut Vec<u8>) {
        self.identity_key().as_bytes().encode(out);
        self.anchor_height().encode(out);
        self.anchor_hash().encode(out);
        write_var_string(out, self.config());
        self.service_node().encode(out);
        write_var_bytes(out, self.signature());
    }
}

impl WireDecode for ServiceNodePing {
    /// Plain field decode. Use [`ServiceNodePing::from_wire`] to also
    /// reconcile the embedded registration.
    fn decode(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        let identity_key =
            Secp256k1PublicKey::from_raw(reader.read_array::<COMPRESSED_PUBLIC_KEY_SIZE>()?);
        let height = reader.read_u32_le()?;
        let hash = reader.read_array::<32>()?;
        let config = reader.read_var_string()?;
        let service_node = ServiceNode::decode(reader)?;
        let signature = reader.read_var_bytes()?;

        Ok(
            ServiceNodePing::new(identity_key, BlockAnchor::new(height, hash), config, service_node)
                .with_signature(signature),
        )
    }
}
