//! Opcode table
//!
//! Families that encode an index in the byte (PUSH, DUP, SWAP, LOG) carry
//! it as data. Stack arity and immediate sizes live in [`Opcode::info`].

use std::fmt;

/// Decoded opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Opcode {
    // Stop and Arithmetic
    STOP,
    ADD,
    MUL,
    SUB,
    DIV,
    SDIV,
    MOD,
    SMOD,
    ADDMOD,
    MULMOD,
    EXP,
    SIGNEXTEND,

    // Comparison & Bitwise Logic
    LT,
    GT,
    SLT,
    SGT,
    EQ,
    ISZERO,
    AND,
    OR,
    XOR,
    NOT,
    BYTE,
    SHL,
    SHR,
    SAR,

    KECCAK256,

    // Environment
    ADDRESS,
    BALANCE,
    ORIGIN,
    CALLER,
    CALLVALUE,
    CALLDATALOAD,
    CALLDATASIZE,
    CALLDATACOPY,
    CODESIZE,
    CODECOPY,
    GASPRICE,
    EXTCODESIZE,
    EXTCODECOPY,
    RETURNDATASIZE,
    RETURNDATACOPY,
    EXTCODEHASH,

    // Block
    BLOCKHASH,
    COINBASE,
    TIMESTAMP,
    NUMBER,
    PREVRANDAO,
    GASLIMIT,
    CHAINID,
    SELFBALANCE,
    BASEFEE,

    // Stack, Memory, Storage and Flow
    POP,
    MLOAD,
    MSTORE,
    MSTORE8,
    SLOAD,
    SSTORE,
    JUMP,
    JUMPI,
    PC,
    MSIZE,
    GAS,
    JUMPDEST,
    TLOAD,
    TSTORE,
    MCOPY,

    /// PUSH0..PUSH32, carrying the immediate byte count
    PUSH(u8),
    /// DUP1..DUP16, carrying the position to copy (1 = top)
    DUP(u8),
    /// SWAP1..SWAP16, carrying the distance below the top
    SWAP(u8),
    /// LOG0..LOG4, carrying the topic count
    LOG(u8),

    // System
    CREATE,
    CALL,
    CALLCODE,
    RETURN,
    DELEGATECALL,
    CREATE2,
    STATICCALL,
    REVERT,
    INVALID,
    SELFDESTRUCT,
}

/// Static metadata for one opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    /// Mnemonic
    pub name: &'static str,
    /// Words popped
    pub inputs: usize,
    /// Words pushed
    pub outputs: usize,
    /// Immediate bytes following the opcode byte
    pub immediate: usize,
}

const PUSH_NAMES: [&str; 33] = [
    "PUSH0", "PUSH1", "PUSH2", "PUSH3", "PUSH4", "PUSH5", "PUSH6", "PUSH7", "PUSH8", "PUSH9",
    "PUSH10", "PUSH11", "PUSH12", "PUSH13", "PUSH14", "PUSH15", "PUSH16", "PUSH17", "PUSH18",
    "PUSH19", "PUSH20", "PUSH21", "PUSH22", "PUSH23", "PUSH24", "PUSH25", "PUSH26", "PUSH27",
    "PUSH28", "PUSH29", "PUSH30", "PUSH31", "PUSH32",
];

const DUP_NAMES: [&str; 16] = [
    "DUP1", "DUP2", "DUP3", "DUP4", "DUP5", "DUP6", "DUP7", "DUP8", "DUP9", "DUP10", "DUP11",
    "DUP12", "DUP13", "DUP14", "DUP15", "DUP16",
];

const SWAP_NAMES: [&str; 16] = [
    "SWAP1", "SWAP2", "SWAP3", "SWAP4", "SWAP5", "SWAP6", "SWAP7", "SWAP8", "SWAP9", "SWAP10",
    "SWAP11", "SWAP12", "SWAP13", "SWAP14", "SWAP15", "SWAP16",
];

const LOG_NAMES: [&str; 5] = ["LOG0", "LOG1", "LOG2", "LOG3", "LOG4"];

const fn info(name: &'static str, inputs: usize, outputs: usize) -> OpcodeInfo {
    OpcodeInfo {
        name,
        inputs,
        outputs,
        immediate: 0,
    }
}

impl Opcode {
    /// Decode an opcode byte. Unassigned bytes return `None`.
    pub fn from_byte(byte: u8) -> Option<Self> {
        use Opcode::*;
        let op = match byte {
            0x00 => STOP,
            0x01 => ADD,
            0x02 => MUL,
            0x03 => SUB,
            0x04 => DIV,
            0x05 => SDIV,
            0x06 => MOD,
            0x07 => SMOD,
            0x08 => ADDMOD,
            0x09 => MULMOD,
            0x0A => EXP,
            0x0B => SIGNEXTEND,
            0x10 => LT,
            0x11 => GT,
            0x12 => SLT,
            0x13 => SGT,
            0x14 => EQ,
            0x15 => ISZERO,
            0x16 => AND,
            0x17 => OR,
            0x18 => XOR,
            0x19 => NOT,
            0x1A => BYTE,
            0x1B => SHL,
            0x1C => SHR,
            0x1D => SAR,
            0x20 => KECCAK256,
            0x30 => ADDRESS,
            0x31 => BALANCE,
            0x32 => ORIGIN,
            0x33 => CALLER,
            0x34 => CALLVALUE,
            0x35 => CALLDATALOAD,
            0x36 => CALLDATASIZE,
            0x37 => CALLDATACOPY,
            0x38 => CODESIZE,
            0x39 => CODECOPY,
            0x3A => GASPRICE,
            0x3B => EXTCODESIZE,
            0x3C => EXTCODECOPY,
            0x3D => RETURNDATASIZE,
            0x3E => RETURNDATACOPY,
            0x3F => EXTCODEHASH,
            0x40 => BLOCKHASH,
            0x41 => COINBASE,
            0x42 => TIMESTAMP,
            0x43 => NUMBER,
            0x44 => PREVRANDAO,
            0x45 => GASLIMIT,
            0x46 => CHAINID,
            0x47 => SELFBALANCE,
            0x48 => BASEFEE,
            0x50 => POP,
            0x51 => MLOAD,
            0x52 => MSTORE,
            0x53 => MSTORE8,
            0x54 => SLOAD,
            0x55 => SSTORE,
            0x56 => JUMP,
            0x57 => JUMPI,
            0x58 => PC,
            0x59 => MSIZE,
            0x5A => GAS,
            0x5B => JUMPDEST,
            0x5C => TLOAD,
            0x5D => TSTORE,
            0x5E => MCOPY,
            0x5F..=0x7F => PUSH(byte - 0x5F),
            0x80..=0x8F => DUP(byte - 0x7F),
            0x90..=0x9F => SWAP(byte - 0x8F),
            0xA0..=0xA4 => LOG(byte - 0xA0),
            0xF0 => CREATE,
            0xF1 => CALL,
            0xF2 => CALLCODE,
            0xF3 => RETURN,
            0xF4 => DELEGATECALL,
            0xF5 => CREATE2,
            0xFA => STATICCALL,
            0xFD => REVERT,
            0xFE => INVALID,
            0xFF => SELFDESTRUCT,
            _ => return None,
        };
        Some(op)
    }

    /// Encode back to the opcode byte
    pub fn byte(self) -> u8 {
        use Opcode::*;
        match self {
            STOP => 0x00,
            ADD => 0x01,
            MUL => 0x02,
            SUB => 0x03,
            DIV => 0x04,
            SDIV => 0x05,
            MOD => 0x06,
            SMOD => 0x07,
            ADDMOD => 0x08,
            MULMOD => 0x09,
            EXP => 0x0A,
            SIGNEXTEND => 0x0B,
            LT => 0x10,
            GT => 0x11,
            SLT => 0x12,
            SGT => 0x13,
            EQ => 0x14,
            ISZERO => 0x15,
            AND => 0x16,
            OR => 0x17,
            XOR => 0x18,
            NOT => 0x19,
            BYTE => 0x1A,
            SHL => 0x1B,
            SHR => 0x1C,
            SAR => 0x1D,
            KECCAK256 => 0x20,
            ADDRESS => 0x30,
            BALANCE => 0x31,
            ORIGIN => 0x32,
            CALLER => 0x33,
            CALLVALUE => 0x34,
            CALLDATALOAD => 0x35,
            CALLDATASIZE => 0x36,
            CALLDATACOPY => 0x37,
            CODESIZE => 0x38,
            CODECOPY => 0x39,
            GASPRICE => 0x3A,
            EXTCODESIZE => 0x3B,
            EXTCODECOPY => 0x3C,
            RETURNDATASIZE => 0x3D,
            RETURNDATACOPY => 0x3E,
            EXTCODEHASH => 0x3F,
            BLOCKHASH => 0x40,
            COINBASE => 0x41,
            TIMESTAMP => 0x42,
            NUMBER => 0x43,
            PREVRANDAO => 0x44,
            GASLIMIT => 0x45,
            CHAINID => 0x46,
            SELFBALANCE => 0x47,
            BASEFEE => 0x48,
            POP => 0x50,
            MLOAD => 0x51,
            MSTORE => 0x52,
            MSTORE8 => 0x53,
            SLOAD => 0x54,
            SSTORE => 0x55,
            JUMP => 0x56,
            JUMPI => 0x57,
            PC => 0x58,
            MSIZE => 0x59,
            GAS => 0x5A,
            JUMPDEST => 0x5B,
            TLOAD => 0x5C,
            TSTORE => 0x5D,
            MCOPY => 0x5E,
            PUSH(n) => 0x5F + n,
            DUP(n) => 0x7F + n,
            SWAP(n) => 0x8F + n,
            LOG(n) => 0xA0 + n,
            CREATE => 0xF0,
            CALL => 0xF1,
            CALLCODE => 0xF2,
            RETURN => 0xF3,
            DELEGATECALL => 0xF4,
            CREATE2 => 0xF5,
            STATICCALL => 0xFA,
            REVERT => 0xFD,
            INVALID => 0xFE,
            SELFDESTRUCT => 0xFF,
        }
    }

    /// Name, stack arity and immediate size
    pub fn info(self) -> OpcodeInfo {
        use Opcode::*;
        match self {
            STOP => info("STOP", 0, 0),
            ADD => info("ADD", 2, 1),
            MUL => info("MUL", 2, 1),
            SUB => info("SUB", 2, 1),
            DIV => info("DIV", 2, 1),
            SDIV => info("SDIV", 2, 1),
            MOD => info("MOD", 2, 1),
            SMOD => info("SMOD", 2, 1),
            ADDMOD => info("ADDMOD", 3, 1),
            MULMOD => info("MULMOD", 3, 1),
            EXP => info("EXP", 2, 1),
            SIGNEXTEND => info("SIGNEXTEND", 2, 1),
            LT => info("LT", 2, 1),
            GT => info("GT", 2, 1),
            SLT => info("SLT", 2, 1),
            SGT => info("SGT", 2, 1),
            EQ => info("EQ", 2, 1),
            ISZERO => info("ISZERO", 1, 1),
            AND => info("AND", 2, 1),
            OR => info("OR", 2, 1),
            XOR => info("XOR", 2, 1),
            NOT => info("NOT", 1, 1),
            BYTE => info("BYTE", 2, 1),
            SHL => info("SHL", 2, 1),
            SHR => info("SHR", 2, 1),
            SAR => info("SAR", 2, 1),
            KECCAK256 => info("KECCAK256", 2, 1),
            ADDRESS => info("ADDRESS", 0, 1),
            BALANCE => info("BALANCE", 1, 1),
            ORIGIN => info("ORIGIN", 0, 1),
            CALLER => info("CALLER", 0, 1),
            CALLVALUE => info("CALLVALUE", 0, 1),
            CALLDATALOAD => info("CALLDATALOAD", 1, 1),
            CALLDATASIZE => info("CALLDATASIZE", 0, 1),
            CALLDATACOPY => info("CALLDATACOPY", 3, 0),
            CODESIZE => info("CODESIZE", 0, 1),
            CODECOPY => info("CODECOPY", 3, 0),
            GASPRICE => info("GASPRICE", 0, 1),
            EXTCODESIZE => info("EXTCODESIZE", 1, 1),
            EXTCODECOPY => info("EXTCODECOPY", 4, 0),
            RETURNDATASIZE => info("RETURNDATASIZE", 0, 1),
            RETURNDATACOPY => info("RETURNDATACOPY", 3, 0),
            EXTCODEHASH => info("EXTCODEHASH", 1, 1),
            BLOCKHASH => info("BLOCKHASH", 1, 1),
            COINBASE => info("COINBASE", 0, 1),
            TIMESTAMP => info("TIMESTAMP", 0, 1),
            NUMBER => info("NUMBER", 0, 1),
            PREVRANDAO => info("PREVRANDAO", 0, 1),
            GASLIMIT => info("GASLIMIT", 0, 1),
            CHAINID => info("CHAINID", 0, 1),
            SELFBALANCE => info("SELFBALANCE", 0, 1),
            BASEFEE => info("BASEFEE", 0, 1),
            POP => info("POP", 1, 0),
            MLOAD => info("MLOAD", 1, 1),
            MSTORE => info("MSTORE", 2, 0),
            MSTORE8 => info("MSTORE8", 2, 0),
            SLOAD => info("SLOAD", 1, 1),
            SSTORE => info("SSTORE", 2, 0),
            JUMP => info("JUMP", 1, 0),
            JUMPI => info("JUMPI", 2, 0),
            PC => info("PC", 0, 1),
            MSIZE => info("MSIZE", 0, 1),
            GAS => info("GAS", 0, 1),
            JUMPDEST => info("JUMPDEST", 0, 0),
            TLOAD => info("TLOAD", 1, 1),
            TSTORE => info("TSTORE", 2, 0),
            MCOPY => info("MCOPY", 3, 0),
            PUSH(n) => OpcodeInfo {
                immediate: n as usize,
                ..info(PUSH_NAMES[n as usize], 0, 1)
            },
            DUP(n) => info(DUP_NAMES[n as usize - 1], n as usize, n as usize + 1),
            SWAP(n) => info(SWAP_NAMES[n as usize - 1], n as usize + 1, n as usize + 1),
            LOG(n) => info(LOG_NAMES[n as usize], n as usize + 2, 0),
            CREATE => info("CREATE", 3, 1),
            CALL => info("CALL", 7, 1),
            CALLCODE => info("CALLCODE", 7, 1),
            RETURN => info("RETURN", 2, 0),
            DELEGATECALL => info("DELEGATECALL", 6, 1),
            CREATE2 => info("CREATE2", 4, 1),
            STATICCALL => info("STATICCALL", 6, 1),
            REVERT => info("REVERT", 2, 0),
            INVALID => info("INVALID", 0, 0),
            SELFDESTRUCT => info("SELFDESTRUCT", 1, 0),
        }
    }

    /// Mnemonic
    pub fn name(self) -> &'static str {
        self.info().name
    }

}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Offsets of every JUMPDEST byte that is an instruction, not PUSH data
pub fn analyze_jump_dests(code: &[u8]) -> Vec<bool> {
    let mut dests = vec![false; code.len()];
    let mut pc = 0;
    while pc < code.len() {
        let byte = code[pc];
        if byte == 0x5B {
            dests[pc] = true;
        }
        pc += match Opcode::from_byte(byte) {
            Some(Opcode::PUSH(n)) => 1 + n as usize,
            _ => 1,
        };
    }
    dests
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_byte() {
        assert_eq!(Opcode::from_byte(0x00), Some(Opcode::STOP));
        assert_eq!(Opcode::from_byte(0x01), Some(Opcode::ADD));
        assert_eq!(Opcode::from_byte(0x5F), Some(Opcode::PUSH(0)));
        assert_eq!(Opcode::from_byte(0x60), Some(Opcode::PUSH(1)));
        assert_eq!(Opcode::from_byte(0x7F), Some(Opcode::PUSH(32)));
        assert_eq!(Opcode::from_byte(0x80), Some(Opcode::DUP(1)));
        assert_eq!(Opcode::from_byte(0x9F), Some(Opcode::SWAP(16)));
        assert_eq!(Opcode::from_byte(0xA4), Some(Opcode::LOG(4)));
        assert_eq!(Opcode::from_byte(0xFF), Some(Opcode::SELFDESTRUCT));
    }

    #[test]
    fn test_from_byte_unassigned() {
        for byte in [0x0C, 0x0F, 0x1E, 0x21, 0x49, 0x4F, 0xA5, 0xEF, 0xF6, 0xFB] {
            assert_eq!(Opcode::from_byte(byte), None, "byte 0x{byte:02x}");
        }
    }

    #[test]
    fn test_every_assigned_byte_encodes_back() {
        for byte in 0..=255u8 {
            if let Some(op) = Opcode::from_byte(byte) {
                assert_eq!(op.byte(), byte, "{op}");
            }
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(Opcode::PUSH(0).name(), "PUSH0");
        assert_eq!(Opcode::PUSH(32).name(), "PUSH32");
        assert_eq!(Opcode::DUP(16).name(), "DUP16");
        assert_eq!(Opcode::SWAP(1).name(), "SWAP1");
        assert_eq!(Opcode::LOG(2).to_string(), "LOG2");
    }

    #[test]
    fn test_stack_arity() {
        assert_eq!(Opcode::ADDMOD.info().inputs, 3);
        assert_eq!(Opcode::DUP(3).info().inputs, 3);
        assert_eq!(Opcode::DUP(3).info().outputs, 4);
        assert_eq!(Opcode::SWAP(2).info().inputs, 3);
        assert_eq!(Opcode::LOG(4).info().inputs, 6);
        assert_eq!(Opcode::CALL.info().inputs, 7);
        assert_eq!(Opcode::STATICCALL.info().inputs, 6);
    }

    #[test]
    fn test_push_immediate() {
        assert_eq!(Opcode::PUSH(1).info().immediate, 1);
        assert_eq!(Opcode::PUSH(32).info().immediate, 32);
        assert_eq!(Opcode::PUSH(0).info().immediate, 0);
        assert_eq!(Opcode::ADD.info().immediate, 0);
    }

    #[test]
    fn test_jump_dests_skip_push_data() {
        // PUSH1 0x5B, JUMPDEST
        let code = [0x60, 0x5B, 0x5B];
        let dests = analyze_jump_dests(&code);
        assert_eq!(dests, vec![false, false, true]);
    }

    #[test]
    fn test_jump_dests_truncated_push() {
        // PUSH32 with only two data bytes
        let code = [0x7F, 0x5B, 0x5B];
        assert!(analyze_jump_dests(&code).iter().all(|d| !d));
    }
}
