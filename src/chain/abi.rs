//! Minimal ABI encoding and decoding for the handful of view calls the
//! dashboard issues.
//!
//! Call data is a 4-byte selector followed by 32-byte words; return data is a
//! sequence of 32-byte words. Only the types the dashboard contracts use are
//! supported: unsigned integers (decoded into `u128`) and addresses.

use crate::chain::Address;
use crate::error::{Error, Result};

/// A 4-byte function selector
pub type Selector = [u8; 4];

// ═══════════════════════════════════════════════════════════════════════════════
// SELECTORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Precomputed selectors for every function the dashboard calls.
pub mod selectors {
    use super::Selector;

    /// `totalSupply()`
    pub const TOTAL_SUPPLY: Selector = [0x18, 0x16, 0x0d, 0xdd];
    /// `balanceOf(address)`
    pub const BALANCE_OF: Selector = [0x70, 0xa0, 0x82, 0x31];
    /// `rewardRate()`
    pub const REWARD_RATE: Selector = [0x7b, 0x0a, 0x47, 0xee];
    /// `periodFinish()`
    pub const PERIOD_FINISH: Selector = [0xeb, 0xe2, 0xb1, 0x2b];
    /// `earned(address)`
    pub const EARNED: Selector = [0x00, 0x8c, 0xc2, 0x62];
    /// `exit()` - unstake everything and claim
    pub const EXIT: Selector = [0xe9, 0xfa, 0xd8, 0xee];
    /// `getReward()` - claim only
    pub const GET_REWARD: Selector = [0x3d, 0x18, 0xb9, 0x12];
    /// `poolInfo(uint256)`
    pub const POOL_INFO: Selector = [0x15, 0x26, 0xfe, 0x27];
    /// `userInfo(uint256,address)`
    pub const USER_INFO: Selector = [0x93, 0xf1, 0xa4, 0x0b];
    /// `totalAllocPoint()`
    pub const TOTAL_ALLOC_POINT: Selector = [0x17, 0xca, 0xf6, 0xf1];
    /// `rewardPerBlock()` on the liquidity-mining program
    pub const REWARD_PER_BLOCK: Selector = [0xb0, 0xbc, 0xf4, 0x2a];
    /// `pendingReward(uint256,address)` on the liquidity-mining program
    pub const PENDING_REWARD: Selector = [0x19, 0x54, 0x26, 0xec];
    /// `getReserves()` on a pair contract
    pub const GET_RESERVES: Selector = [0x09, 0x02, 0xf1, 0xac];
    /// `token0()` on a pair contract
    pub const TOKEN0: Selector = [0x0d, 0xfe, 0x16, 0x81];
    /// `token1()` on a pair contract
    pub const TOKEN1: Selector = [0xd2, 0x12, 0x20, 0xa7];
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENCODING
// ═══════════════════════════════════════════════════════════════════════════════

/// A call argument
#[derive(Debug, Clone)]
pub enum AbiArg {
    /// Unsigned integer, left-padded to 32 bytes
    Uint(u128),
    /// Address, left-padded to 32 bytes
    Addr(Address),
}

/// Encode a function call into `0x`-prefixed hex call data.
pub fn encode_call(selector: Selector, args: &[AbiArg]) -> String {
    let mut data = String::with_capacity(2 + 8 + args.len() * 64);
    data.push_str("0x");
    data.push_str(&hex::encode(selector));
    for arg in args {
        match arg {
            AbiArg::Uint(v) => {
                // 32-byte word: 16 zero bytes then the big-endian u128
                data.push_str(&"0".repeat(32));
                data.push_str(&hex::encode(v.to_be_bytes()));
            }
            AbiArg::Addr(a) => {
                data.push_str(&"0".repeat(24));
                data.push_str(a.hex_body());
            }
        }
    }
    data
}

// ═══════════════════════════════════════════════════════════════════════════════
// DECODING
// ═══════════════════════════════════════════════════════════════════════════════

fn word_at<'a>(data: &'a str, what: &str, index: usize) -> Result<&'a str> {
    let body = data.strip_prefix("0x").unwrap_or(data);
    let start = index * 64;
    let end = start + 64;
    if body.len() < end {
        return Err(Error::AbiDecode {
            what: what.to_string(),
            details: format!(
                "return data too short: {} hex chars, need word {}",
                body.len(),
                index
            ),
        });
    }
    Ok(&body[start..end])
}

/// Decode the word at `index` of the return data as an unsigned integer.
///
/// Values above `u128::MAX` are rejected rather than truncated.
pub fn decode_uint_at(data: &str, what: &str, index: usize) -> Result<u128> {
    let word = word_at(data, what, index)?;
    let (high, low) = word.split_at(32);
    if high.bytes().any(|b| b != b'0') {
        return Err(Error::Overflow {
            operation: format!("decode {}", what),
        });
    }
    u128::from_str_radix(low, 16).map_err(|e| Error::AbiDecode {
        what: what.to_string(),
        details: e.to_string(),
    })
}

/// Decode the first word of the return data as an unsigned integer.
pub fn decode_uint(data: &str, what: &str) -> Result<u128> {
    decode_uint_at(data, what, 0)
}

/// Decode the word at `index` of the return data as an address.
pub fn decode_address_at(data: &str, what: &str, index: usize) -> Result<Address> {
    let word = word_at(data, what, index)?;
    Address::parse(&format!("0x{}", &word[24..]))
}
