use thiserror::Error;

/// Errors raised while turning assembly text into bytes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssemblyError {
    #[error("line {line}: unknown mnemonic `{mnemonic}`")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("line {line}: malformed operand `{text}`: {reason}")]
    BadOperand {
        line: usize,
        text: String,
        reason: String,
    },

    #[error("line {line}: `{mnemonic}` expects {expected} but got `{got}` in operand {index}")]
    OperandMismatch {
        line: usize,
        mnemonic: String,
        index: usize,
        expected: &'static str,
        got: String,
    },

    #[error("line {line}: undefined label `{name}`")]
    UndefinedLabel { line: usize, name: String },

    #[error(
        "line {line}: relative displacement to `{name}` is {rela}, outside {min}..={max}"
    )]
    DisplacementOutOfRange {
        line: usize,
        name: String,
        rela: i64,
        min: i64,
        max: i64,
    },

    #[error("line {line}: duplicate label `{name}`")]
    DuplicateLabel { line: usize, name: String },
}

/// Errors raised while decoding a 4-byte instruction word, shared by the
/// disassembler and the simulator's undefined-opcode bookkeeping.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no opcode table entry for category {category} opcode {opcode:#04x}")]
    UnknownOpcode { category: u8, opcode: u8 },
}
