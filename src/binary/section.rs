use super::{
    error::{ErrorCode, LoadError, Node, Result},
    module::{Decoder, DecoderConfig},
    types::DefType,
};
use log::{debug, error};

/// Decodes a type section payload, `vec(<deftype>)`, which must be
/// consumed exactly.
pub fn decode_type_section(bytes: &[u8], config: DecoderConfig) -> Result<Vec<DefType>> {
    let mut decoder = Decoder::with_config(bytes, config);
    let types = decoder.vec(Node::TypeSection, |d| d.decode_def_type())?;
    if !decoder.is_end() {
        let err = LoadError::new(
            ErrorCode::SectionSizeMismatch,
            decoder.offset(),
            Node::TypeSection,
        );
        error!("{}", err);
        return Err(err);
    }
    debug!("decoded {} type definitions", types.len());
    Ok(types)
}
