pub mod binary;

pub use binary::{
    error::{ErrorCode, LoadError, Node},
    module::{Decoder, DecoderConfig},
    section::decode_type_section,
    stream::ByteStream,
};
