use super::{
    error::{ErrorCode, LoadError, Node, Result},
    stream::ByteStream,
    types::*,
};
use log::{debug, error, trace};
use num_traits::FromPrimitive as _;

pub const DEFAULT_MAX_DEPTH: u32 = 64;

// Upper bound for preallocation; the declared count is untrusted.
const MAX_PREALLOC: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Maximum number of nested type definitions (and module types).
    pub max_depth: u32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Recursive-descent decoder for component-model type definitions.
///
/// A decoder owns its cursor. After any error the cursor position is
/// unspecified and the decoder should be dropped.
#[derive(Debug)]
pub struct Decoder<'a> {
    stream: ByteStream<'a>,
    config: DecoderConfig,
    depth: u32,
}

impl<'a> Decoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_config(bytes, DecoderConfig::default())
    }

    pub fn with_config(bytes: &'a [u8], config: DecoderConfig) -> Self {
        Self {
            stream: ByteStream::new(bytes),
            config,
            depth: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.stream.offset()
    }

    pub fn is_end(&self) -> bool {
        self.stream.is_empty()
    }

    pub(crate) fn fail(&self, code: ErrorCode, node: Node) -> LoadError {
        let err = LoadError::new(code, self.stream.last_offset(), node);
        error!("{}", err);
        err
    }

    pub(crate) fn byte(&mut self, node: Node) -> Result<u8> {
        self.stream.read_byte().map_err(|code| self.fail(code, node))
    }

    pub(crate) fn peek_byte(&mut self, node: Node) -> Result<u8> {
        self.stream.peek_byte().map_err(|code| {
            let err = LoadError::new(code, self.stream.offset(), node);
            error!("{}", err);
            err
        })
    }

    pub(crate) fn expect_byte(&mut self, expected: u8, node: Node) -> Result<()> {
        self.stream
            .read_expected(expected)
            .map_err(|code| self.fail(code, node))
    }

    pub(crate) fn u32(&mut self, node: Node) -> Result<u32> {
        self.stream.read_u32().map_err(|code| self.fail(code, node))
    }

    pub(crate) fn name(&mut self, node: Node) -> Result<String> {
        self.stream.read_name().map_err(|code| self.fail(code, node))
    }

    /// Decodes `count:u32` followed by `count` items, in encounter order.
    pub(crate) fn vec<T>(
        &mut self,
        node: Node,
        mut item: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let count = self.u32(node)? as usize;
        debug!("vector of {} items for {} at 0x{:x}", count, node, self.offset());
        let mut items = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            items.push(item(self)?);
        }
        Ok(items)
    }

    /// Decodes `0x00` (absent) or `0x01 t` (present).
    pub(crate) fn option<T>(
        &mut self,
        node: Node,
        item: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<Option<T>> {
        let flag = self.byte(node)?;
        match OptionTag::from_u8(flag) {
            Some(OptionTag::Absent) => Ok(None),
            Some(OptionTag::Present) => item(self).map(Some),
            None => Err(self.fail(ErrorCode::MalformedOption, node)),
        }
    }

    /// Runs `f` one nesting level deeper, failing once the configured
    /// maximum depth would be exceeded.
    pub(crate) fn nested<T>(
        &mut self,
        node: Node,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        if self.depth >= self.config.max_depth {
            let err = LoadError::new(ErrorCode::DepthExceeded, self.offset(), node);
            error!("{} (max depth {})", err, self.config.max_depth);
            return Err(err);
        }
        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }

    /// label' ::= len:<u32> l:<label>, where `len` must equal the byte
    /// length of `l`.
    pub fn decode_label(&mut self) -> Result<String> {
        let len = self
            .stream
            .read_u32()
            .map_err(|_| self.fail(ErrorCode::MalformedRecordType, Node::DefType))?;
        let label = self
            .stream
            .read_name()
            .map_err(|_| self.fail(ErrorCode::MalformedRecordType, Node::DefType))?;
        if label.len() != len as usize {
            return Err(self.fail(ErrorCode::MalformedRecordType, Node::DefType));
        }
        Ok(label)
    }

    pub fn decode_value_type(&mut self) -> Result<ValueType> {
        let tag = self.byte(Node::DefType)?;
        Ok(match PrimValType::from_u8(tag) {
            Some(prim) => ValueType::Primitive(prim),
            None => ValueType::TypeIndex(u32::from(tag)),
        })
    }

    pub fn decode_label_val_type(&mut self) -> Result<LabelValType> {
        let label = self.decode_label()?;
        let ty = self.decode_value_type()?;
        Ok(LabelValType { label, ty })
    }

    pub fn decode_record(&mut self) -> Result<Record> {
        let fields = self.vec(Node::DefType, |d| d.decode_label_val_type())?;
        if fields.is_empty() {
            return Err(self.fail(ErrorCode::MalformedRecordType, Node::DefType));
        }
        Ok(Record { fields })
    }

    /// case ::= l:<label'> t?:<valtype>? 0x00
    pub fn decode_case(&mut self) -> Result<Case> {
        let label = self.decode_label()?;
        let ty = self.option(Node::DefType, |d| d.decode_value_type())?;
        if self.byte(Node::DefType)? != CASE_TERMINATOR {
            return Err(self.fail(ErrorCode::MalformedVariantType, Node::DefType));
        }
        Ok(Case { label, ty })
    }

    pub fn decode_variant(&mut self) -> Result<VariantTy> {
        let cases = self.vec(Node::DefType, |d| d.decode_case())?;
        Ok(VariantTy { cases })
    }

    pub fn decode_list(&mut self) -> Result<List> {
        Ok(List {
            ty: self.decode_value_type()?,
        })
    }

    pub fn decode_tuple(&mut self) -> Result<Tuple> {
        let types = self.vec(Node::DefType, |d| d.decode_value_type())?;
        if types.is_empty() {
            return Err(self.fail(ErrorCode::MalformedTupleType, Node::DefType));
        }
        Ok(Tuple { types })
    }

    pub fn decode_flags(&mut self) -> Result<Flags> {
        let labels = self.vec(Node::DefType, |d| d.decode_label())?;
        if labels.is_empty() {
            return Err(self.fail(ErrorCode::MalformedFlagsType, Node::DefType));
        }
        Ok(Flags { labels })
    }

    // Unlike flags, an empty enum is accepted.
    pub fn decode_enum(&mut self) -> Result<Enum> {
        let labels = self.vec(Node::DefType, |d| d.decode_label())?;
        Ok(Enum { labels })
    }

    pub fn decode_option(&mut self) -> Result<OptionTy> {
        Ok(OptionTy {
            ty: self.decode_value_type()?,
        })
    }

    pub fn decode_result(&mut self) -> Result<ResultTy> {
        let ok = self.option(Node::DefType, |d| d.decode_value_type())?;
        let err = self.option(Node::DefType, |d| d.decode_value_type())?;
        Ok(ResultTy { ok, err })
    }

    pub fn decode_own(&mut self) -> Result<Own> {
        Ok(Own(self.u32(Node::DefType)?))
    }

    pub fn decode_borrow(&mut self) -> Result<Borrow> {
        Ok(Borrow(self.u32(Node::DefType)?))
    }

    pub fn decode_result_list(&mut self) -> Result<ResultList> {
        let tag = self.byte(Node::DefType)?;
        match ResultListTag::from_u8(tag) {
            Some(ResultListTag::Single) => Ok(ResultList::Single(self.decode_value_type()?)),
            Some(ResultListTag::Named) => Ok(ResultList::Named(
                self.vec(Node::DefType, |d| d.decode_label_val_type())?,
            )),
            None => Err(self.fail(ErrorCode::MalformedDefType, Node::DefType)),
        }
    }

    /// functype ::= ps:<paramlist> rs:<resultlist>, without the leading tag.
    pub fn decode_func_type(&mut self) -> Result<FuncType> {
        let params = self.vec(Node::DefType, |d| d.decode_label_val_type())?;
        let results = self.decode_result_list()?;
        Ok(FuncType { params, results })
    }

    pub fn decode_def_type(&mut self) -> Result<DefType> {
        self.nested(Node::DefType, |d| {
            trace!("decode type definition at 0x{:x}", d.offset());
            let tag = d.byte(Node::DefType)?;
            if let Some(prim) = PrimValType::from_u8(tag) {
                return Ok(DefType::Value(DefValType::Primitive(prim)));
            }
            let Some(tag) = DefTypeTag::from_u8(tag) else {
                return Err(d.fail(ErrorCode::MalformedDefType, Node::DefType));
            };
            let ty = match tag {
                DefTypeTag::Record => DefType::Value(DefValType::Record(d.decode_record()?)),
                DefTypeTag::Variant => DefType::Value(DefValType::Variant(d.decode_variant()?)),
                DefTypeTag::List => DefType::Value(DefValType::List(d.decode_list()?)),
                DefTypeTag::Tuple => DefType::Value(DefValType::Tuple(d.decode_tuple()?)),
                DefTypeTag::Flags => DefType::Value(DefValType::Flags(d.decode_flags()?)),
                DefTypeTag::Enum => DefType::Value(DefValType::Enum(d.decode_enum()?)),
                DefTypeTag::Option => DefType::Value(DefValType::Option(d.decode_option()?)),
                DefTypeTag::Result => DefType::Value(DefValType::Result(d.decode_result()?)),
                DefTypeTag::Own => DefType::Value(DefValType::Own(d.decode_own()?)),
                DefTypeTag::Borrow => DefType::Value(DefValType::Borrow(d.decode_borrow()?)),
                DefTypeTag::Func => DefType::Func(d.decode_func_type()?),
                DefTypeTag::Component => DefType::Component(d.decode_component_type()?),
                DefTypeTag::Instance => DefType::Instance(d.decode_instance_type()?),
            };
            Ok(ty)
        })
    }
}
