//! Minimal script builder for the genesis coinbase.
//!
//! Only the pushes needed to reproduce the canonical coinbase are supported;
//! script evaluation lives in the node's script engine.

/// Push the empty vector / number zero
pub const OP_0: u8 = 0x00;
/// Next byte is the length of the data to push
pub const OP_PUSHDATA1: u8 = 0x4c;
/// Next two bytes are the length of the data to push
pub const OP_PUSHDATA2: u8 = 0x4d;
/// Next four bytes are the length of the data to push
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Push the number -1
pub const OP_1NEGATE: u8 = 0x4f;
/// Push the number 1
pub const OP_1: u8 = 0x51;
/// Check a signature against the public key on the stack
pub const OP_CHECKSIG: u8 = 0xac;

/// Serialized script bytes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script(Vec<u8>);

impl Script {
    /// Create an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an integer using the small-integer opcodes where possible
    pub fn push_int(mut self, n: i64) -> Self {
        match n {
            -1 => self.0.push(OP_1NEGATE),
            0 => self.0.push(OP_0),
            1..=16 => self.0.push(OP_1 + (n as u8 - 1)),
            _ => return self.push_slice(&script_num(n)),
        }
        self
    }

    /// Push an integer as a minimally encoded data element, never as an opcode
    pub fn push_num(self, n: i64) -> Self {
        self.push_slice(&script_num(n))
    }

    /// Push raw data with the shortest length prefix
    pub fn push_slice(mut self, data: &[u8]) -> Self {
        let len = data.len();
        if len < OP_PUSHDATA1 as usize {
            self.0.push(len as u8);
        } else if len <= 0xff {
            self.0.push(OP_PUSHDATA1);
            self.0.push(len as u8);
        } else if len <= 0xffff {
            self.0.push(OP_PUSHDATA2);
            self.0.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            self.0.push(OP_PUSHDATA4);
            self.0.extend_from_slice(&(len as u32).to_le_bytes());
        }
        self.0.extend_from_slice(data);
        self
    }

    /// Append a single opcode
    pub fn push_opcode(mut self, opcode: u8) -> Self {
        self.0.push(opcode);
        self
    }

    /// Script bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Script length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Minimal little-endian sign-magnitude encoding of a script number
fn script_num(n: i64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    let negative = n < 0;
    let mut abs = n.unsigned_abs();
    let mut out = Vec::with_capacity(9);
    while abs > 0 {
        out.push((abs & 0xff) as u8);
        abs >>= 8;
    }
    // The top bit carries the sign, so add a byte if it is already taken
    let last = out.len() - 1;
    if out[last] & 0x80 != 0 {
        out.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        out[last] |= 0x80;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_int_small_values_use_opcodes() {
        assert_eq!(Script::new().push_int(0).as_bytes(), &[OP_0]);
        assert_eq!(Script::new().push_int(-1).as_bytes(), &[OP_1NEGATE]);
        assert_eq!(Script::new().push_int(16).as_bytes(), &[0x60]);
    }

    #[test]
    fn test_push_int_genesis_bits() {
        let script = Script::new().push_int(486_604_799);
        assert_eq!(script.as_bytes(), &[0x04, 0xff, 0xff, 0x00, 0x1d]);
    }

    #[test]
    fn test_push_num_is_always_data() {
        assert_eq!(Script::new().push_num(4).as_bytes(), &[0x01, 0x04]);
        assert_eq!(Script::new().push_num(128).as_bytes(), &[0x02, 0x80, 0x00]);
        assert_eq!(Script::new().push_num(-128).as_bytes(), &[0x02, 0x80, 0x80]);
        assert_eq!(Script::new().push_num(-5).as_bytes(), &[0x01, 0x85]);
    }

    #[test]
    fn test_push_slice_length_prefixes() {
        assert_eq!(Script::new().push_slice(&[0xaa; 75]).as_bytes()[0], 75);

        let pushdata1 = Script::new().push_slice(&[0xaa; 76]);
        assert_eq!(&pushdata1.as_bytes()[..2], &[OP_PUSHDATA1, 76]);
        assert_eq!(pushdata1.len(), 78);

        let pushdata2 = Script::new().push_slice(&[0xaa; 300]);
        assert_eq!(&pushdata2.as_bytes()[..3], &[OP_PUSHDATA2, 0x2c, 0x01]);
    }

    #[test]
    fn test_pay_to_pubkey() {
        let script = Script::new().push_slice(&[0x04; 65]).push_opcode(OP_CHECKSIG);
        assert_eq!(script.len(), 67);
        assert_eq!(script.as_bytes()[0], 65);
        assert_eq!(script.as_bytes()[66], OP_CHECKSIG);
    }
}
