//! Legacy transaction wire format
//!
//! Only what a single System Program transfer needs: account metas,
//! instructions, message compilation, ed25519 signing and the compact
//! binary serialization the RPC node accepts.

use ed25519_dalek::{Signer, SigningKey};

use crate::wallet::pubkey::{Hash, Pubkey, Signature};

/// System Program id (all-zero key, base58 `111...1`)
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new([0u8; 32]);

/// System Program instruction index for `Transfer`
const SYSTEM_TRANSFER_INDEX: u32 = 2;

/// An account referenced by an instruction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        AccountMeta { pubkey, is_signer, is_writable: true }
    }

    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        AccountMeta { pubkey, is_signer, is_writable: false }
    }
}

/// A program invocation before compilation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// Build a System Program transfer of `lamports` from `from` to `to`
pub fn system_transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
        data,
    }
}

/// Message header counts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

/// Instruction with accounts replaced by indices into the key table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

/// A compiled legacy message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
}

#[derive(Clone, Copy)]
struct KeyFlags {
    is_signer: bool,
    is_writable: bool,
}

impl Message {
    /// Compile instructions with `payer` as the first signer.
    ///
    /// Keys are deduplicated (flags are OR-ed) and ordered: writable
    /// signers, readonly signers, writable non-signers, readonly non-signers.
    pub fn new(instructions: &[Instruction], payer: &Pubkey, recent_blockhash: Hash) -> Self {
        let mut keys: Vec<(Pubkey, KeyFlags)> = vec![(
            *payer,
            KeyFlags { is_signer: true, is_writable: true },
        )];

        let mut upsert = |pubkey: Pubkey, is_signer: bool, is_writable: bool| {
            match keys.iter_mut().find(|(k, _)| *k == pubkey) {
                Some((_, flags)) => {
                    flags.is_signer |= is_signer;
                    flags.is_writable |= is_writable;
                }
                None => keys.push((pubkey, KeyFlags { is_signer, is_writable })),
            }
        };

        for ix in instructions {
            for meta in &ix.accounts {
                upsert(meta.pubkey, meta.is_signer, meta.is_writable);
            }
            upsert(ix.program_id, false, false);
        }

        // Stable sort keeps the payer first among writable signers
        keys.sort_by_key(|(_, f)| match (f.is_signer, f.is_writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        });

        let header = MessageHeader {
            num_required_signatures: keys.iter().filter(|(_, f)| f.is_signer).count() as u8,
            num_readonly_signed_accounts: keys
                .iter()
                .filter(|(_, f)| f.is_signer && !f.is_writable)
                .count() as u8,
            num_readonly_unsigned_accounts: keys
                .iter()
                .filter(|(_, f)| !f.is_signer && !f.is_writable)
                .count() as u8,
        };

        let account_keys: Vec<Pubkey> = keys.into_iter().map(|(k, _)| k).collect();
        let index_of = |key: &Pubkey| -> u8 {
            account_keys.iter().position(|k| k == key).unwrap_or(0) as u8
        };

        let instructions = instructions
            .iter()
            .map(|ix| CompiledInstruction {
                program_id_index: index_of(&ix.program_id),
                accounts: ix.accounts.iter().map(|m| index_of(&m.pubkey)).collect(),
                data: ix.data.clone(),
            })
            .collect();

        Message {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        }
    }

    /// Serialize to the bytes that get signed
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(256);
        out.push(self.header.num_required_signatures);
        out.push(self.header.num_readonly_signed_accounts);
        out.push(self.header.num_readonly_unsigned_accounts);

        encode_compact_u16(self.account_keys.len() as u16, &mut out);
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }

        out.extend_from_slice(self.recent_blockhash.as_bytes());

        encode_compact_u16(self.instructions.len() as u16, &mut out);
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            encode_compact_u16(ix.accounts.len() as u16, &mut out);
            out.extend_from_slice(&ix.accounts);
            encode_compact_u16(ix.data.len() as u16, &mut out);
            out.extend_from_slice(&ix.data);
        }
        out
    }
}

/// A signed transaction ready for submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<Signature>,
    pub message: Message,
}

impl Transaction {
    /// Sign a single-signer message
    pub fn new_signed(message: Message, signer: &SigningKey) -> Self {
        let sig = signer.sign(&message.serialize());
        Transaction {
            signatures: vec![Signature::from(sig)],
            message,
        }
    }

    /// The first signature identifies the transaction on chain
    pub fn signature(&self) -> Option<&Signature> {
        self.signatures.first()
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        encode_compact_u16(self.signatures.len() as u16, &mut out);
        for sig in &self.signatures {
            out.extend_from_slice(sig.as_bytes());
        }
        out.extend_from_slice(&self.message.serialize());
        out
    }
}

/// Append `value` in the 1-3 byte little-endian base-128 "shortvec" form
pub fn encode_compact_u16(value: u16, out: &mut Vec<u8>) {
    let mut rem = value;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            out.push(byte);
            break;
        }
        byte |= 0x80;
        out.push(byte);
    }
}

/// Decode a shortvec prefix, returning the value and bytes consumed
pub fn decode_compact_u16(bytes: &[u8]) -> Option<(u16, usize)> {
    let mut value: u32 = 0;
    for (i, byte) in bytes.iter().take(3).enumerate() {
        value |= ((byte & 0x7f) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return u16::try_from(value).ok().map(|v| (v, i + 1));
        }
    }
    None
}
