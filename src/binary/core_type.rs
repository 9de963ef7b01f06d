use super::{
    error::{ErrorCode, Node, Result},
    module::Decoder,
    types::*,
};
use log::trace;
use num_traits::FromPrimitive as _;

impl<'a> Decoder<'a> {
    /// moduletype ::= 0x50 md*:vec(<core:moduledecl>)
    pub fn decode_module_type(&mut self) -> Result<ModuleType> {
        self.nested(Node::ModuleType, |d| {
            trace!("decode module type at 0x{:x}", d.offset());
            d.expect_byte(MODULE_TYPE_TAG, Node::ModuleType)?;
            let decls = d.vec(Node::ModuleType, |d| d.decode_module_decl())?;
            Ok(ModuleType { decls })
        })
    }

    pub fn decode_module_decl(&mut self) -> Result<ModuleDecl> {
        let tag = self.byte(Node::ModuleType)?;
        let decl = match ModuleDeclTag::from_u8(tag) {
            Some(ModuleDeclTag::Import) => ModuleDecl::Import(self.decode_core_import()?),
            Some(ModuleDeclTag::Type) => {
                let ty = self.decode_core_def_type()?;
                ModuleDecl::Type(Box::new(ty))
            }
            Some(ModuleDeclTag::Alias) => ModuleDecl::Alias(self.decode_alias()?),
            Some(ModuleDeclTag::Export) => {
                let name = self.name(Node::ModuleType)?;
                let desc = self.decode_core_import_desc()?;
                ModuleDecl::Export(CoreExportDecl { name, desc })
            }
            None => return Err(self.fail(ErrorCode::MalformedModuleDecl, Node::ModuleType)),
        };
        Ok(decl)
    }

    /// The leading byte selects the form and is left for the selected
    /// decoder to consume.
    pub fn decode_core_def_type(&mut self) -> Result<CoreDefType> {
        match self.peek_byte(Node::CoreType)? {
            CORE_FUNC_TYPE_TAG => Ok(CoreDefType::Func(self.decode_core_func_type()?)),
            MODULE_TYPE_TAG => Ok(CoreDefType::Module(self.decode_module_type()?)),
            _ => {
                self.byte(Node::CoreType)?;
                Err(self.fail(ErrorCode::MalformedDefType, Node::CoreType))
            }
        }
    }

    /// functype ::= 0x60 rt1:<resulttype> rt2:<resulttype>
    pub fn decode_core_func_type(&mut self) -> Result<CoreFuncType> {
        self.expect_byte(CORE_FUNC_TYPE_TAG, Node::CoreType)?;
        let params = self.vec(Node::CoreType, |d| d.decode_core_val_type())?;
        let results = self.vec(Node::CoreType, |d| d.decode_core_val_type())?;
        Ok(CoreFuncType { params, results })
    }

    pub fn decode_core_val_type(&mut self) -> Result<CoreValType> {
        let tag = self.byte(Node::CoreType)?;
        CoreValType::from_u8(tag)
            .ok_or_else(|| self.fail(ErrorCode::MalformedCoreValType, Node::CoreType))
    }

    /// import ::= mod:<name> nm:<name> d:<importdesc>
    pub fn decode_core_import(&mut self) -> Result<CoreImport> {
        let module = self.name(Node::ModuleType)?;
        let name = self.name(Node::ModuleType)?;
        let desc = self.decode_core_import_desc()?;
        Ok(CoreImport { module, name, desc })
    }

    pub fn decode_core_import_desc(&mut self) -> Result<CoreImportDesc> {
        let tag = self.byte(Node::CoreType)?;
        let desc = match CoreImportDescTag::from_u8(tag) {
            Some(CoreImportDescTag::Func) => CoreImportDesc::Func(self.u32(Node::CoreType)?),
            Some(CoreImportDescTag::Table) => {
                let elem_type = self.decode_core_val_type()?;
                if !elem_type.is_reference() {
                    return Err(self.fail(ErrorCode::MalformedImportDesc, Node::CoreType));
                }
                let limits = self.decode_limits()?;
                CoreImportDesc::Table(TableType { elem_type, limits })
            }
            Some(CoreImportDescTag::Memory) => CoreImportDesc::Memory(self.decode_limits()?),
            Some(CoreImportDescTag::Global) => {
                let ty = self.decode_core_val_type()?;
                let tag = self.byte(Node::CoreType)?;
                let mutable = match Mutability::from_u8(tag) {
                    Some(Mutability::Const) => false,
                    Some(Mutability::Var) => true,
                    None => return Err(self.fail(ErrorCode::MalformedMutability, Node::CoreType)),
                };
                CoreImportDesc::Global(GlobalType { ty, mutable })
            }
            None => return Err(self.fail(ErrorCode::MalformedImportDesc, Node::CoreType)),
        };
        Ok(desc)
    }

    pub fn decode_limits(&mut self) -> Result<Limits> {
        let tag = self.byte(Node::CoreType)?;
        let limits = match LimitsTag::from_u8(tag) {
            Some(LimitsTag::Min) => Limits {
                min: self.u32(Node::CoreType)?,
                max: None,
            },
            Some(LimitsTag::MinMax) => Limits {
                min: self.u32(Node::CoreType)?,
                max: Some(self.u32(Node::CoreType)?),
            },
            None => return Err(self.fail(ErrorCode::MalformedLimits, Node::CoreType)),
        };
        Ok(limits)
    }
}
