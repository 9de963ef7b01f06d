use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoadError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorCode {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("integer representation too long")]
    IntegerTooLong,
    #[error("integer too large")]
    IntegerTooLarge,
    #[error("malformed UTF-8 encoding")]
    MalformedUtf8,
    #[error("unexpected byte: expected 0x{expected:02x}, found 0x{found:02x}")]
    UnexpectedByte { expected: u8, found: u8 },

    #[error("malformed record type")]
    MalformedRecordType,
    #[error("malformed variant type")]
    MalformedVariantType,
    #[error("malformed tuple type")]
    MalformedTupleType,
    #[error("malformed flags type")]
    MalformedFlagsType,
    #[error("malformed definition type")]
    MalformedDefType,
    #[error("malformed option flag")]
    MalformedOption,
    #[error("malformed import descriptor")]
    MalformedImportDesc,
    #[error("malformed alias")]
    MalformedAlias,
    #[error("malformed module declaration")]
    MalformedModuleDecl,
    #[error("malformed limits")]
    MalformedLimits,
    #[error("malformed mutability")]
    MalformedMutability,
    #[error("malformed core value type")]
    MalformedCoreValType,
    #[error("type nesting exceeds the maximum depth")]
    DepthExceeded,
    #[error("section size mismatch")]
    SectionSizeMismatch,
}

/// The kind of node that was being decoded when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    DefType,
    ComponentType,
    InstanceType,
    ModuleType,
    ExternDesc,
    Alias,
    CoreType,
    TypeSection,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Node::DefType => "type definition",
            Node::ComponentType => "component type",
            Node::InstanceType => "instance type",
            Node::ModuleType => "module type",
            Node::ExternDesc => "extern descriptor",
            Node::Alias => "alias",
            Node::CoreType => "core type",
            Node::TypeSection => "type section",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{code} at offset 0x{offset:08x} ({node})")]
pub struct LoadError {
    pub code: ErrorCode,
    pub offset: usize,
    pub node: Node,
}

impl LoadError {
    pub fn new(code: ErrorCode, offset: usize, node: Node) -> Self {
        Self { code, offset, node }
    }
}
