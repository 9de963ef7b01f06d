use super::{
    error::{ErrorCode, Node, Result},
    module::Decoder,
    types::*,
};
use log::{error, trace};
use num_traits::FromPrimitive as _;

impl<'a> Decoder<'a> {
    /// componenttype ::= 0x41 cd*:vec(<componentdecl>), without the tag.
    pub fn decode_component_type(&mut self) -> Result<ComponentType> {
        let decls = self.vec(Node::ComponentType, |d| d.decode_component_decl())?;
        Ok(ComponentType { decls })
    }

    /// componentdecl ::= 0x03 id:<importdecl> | id:<instancedecl>
    pub fn decode_component_decl(&mut self) -> Result<ComponentDecl> {
        trace!("decode component declaration at 0x{:x}", self.offset());
        let tag = self.byte(Node::ComponentType)?;
        if tag == COMPONENT_IMPORT_TAG {
            return Ok(ComponentDecl::Import(self.decode_import_decl()?));
        }
        Ok(ComponentDecl::Instance(self.instance_decl_with_tag(tag)?))
    }

    /// instancetype ::= 0x42 id*:vec(<instancedecl>), without the tag.
    pub fn decode_instance_type(&mut self) -> Result<InstanceType> {
        let decls = self.vec(Node::InstanceType, |d| d.decode_instance_decl())?;
        Ok(InstanceType { decls })
    }

    pub fn decode_instance_decl(&mut self) -> Result<InstanceDecl> {
        trace!("decode instance declaration at 0x{:x}", self.offset());
        let tag = self.byte(Node::InstanceType)?;
        self.instance_decl_with_tag(tag)
    }

    fn instance_decl_with_tag(&mut self, tag: u8) -> Result<InstanceDecl> {
        let Some(tag) = InstanceDeclTag::from_u8(tag) else {
            return Err(self.fail(ErrorCode::MalformedDefType, Node::DefType));
        };
        match tag {
            InstanceDeclTag::CoreType => {
                error!("core type declarations in instance types are not supported");
                Err(self.fail(ErrorCode::MalformedDefType, Node::DefType))
            }
            InstanceDeclTag::Type => {
                let ty = self.decode_def_type()?;
                Ok(InstanceDecl::Type(Box::new(ty)))
            }
            InstanceDeclTag::Alias => Ok(InstanceDecl::Alias(self.decode_alias()?)),
            InstanceDeclTag::Export => Ok(InstanceDecl::Export(self.decode_export_decl()?)),
        }
    }

    pub fn decode_import_decl(&mut self) -> Result<ImportDecl> {
        let name = self.name(Node::ComponentType)?;
        let desc = self.decode_extern_desc()?;
        Ok(ImportDecl { name, desc })
    }

    pub fn decode_export_decl(&mut self) -> Result<ExportDecl> {
        let name = self.name(Node::InstanceType)?;
        let desc = self.decode_extern_desc()?;
        Ok(ExportDecl { name, desc })
    }

    pub fn decode_extern_desc(&mut self) -> Result<ExternDesc> {
        for byte in EXTERN_DESC_PREFIX {
            self.expect_byte(byte, Node::ExternDesc)?;
        }
        let type_index = self.u32(Node::ExternDesc)?;
        Ok(ExternDesc { type_index })
    }

    /// alias ::= s:<sort> t:<aliastarget>
    pub fn decode_alias(&mut self) -> Result<Alias> {
        trace!("decode alias at 0x{:x}", self.offset());
        let sort = self.decode_sort()?;
        let tag = self.byte(Node::Alias)?;
        let target = match AliasTargetTag::from_u8(tag) {
            Some(AliasTargetTag::Export) => AliasTarget::Export {
                instance: self.u32(Node::Alias)?,
                name: self.name(Node::Alias)?,
            },
            Some(AliasTargetTag::CoreExport) => AliasTarget::CoreExport {
                instance: self.u32(Node::Alias)?,
                name: self.name(Node::Alias)?,
            },
            Some(AliasTargetTag::Outer) => AliasTarget::Outer {
                count: self.u32(Node::Alias)?,
                index: self.u32(Node::Alias)?,
            },
            None => return Err(self.fail(ErrorCode::MalformedAlias, Node::Alias)),
        };
        Ok(Alias { sort, target })
    }

    pub fn decode_sort(&mut self) -> Result<Sort> {
        let tag = self.byte(Node::Alias)?;
        let sort = match SortTag::from_u8(tag) {
            Some(SortTag::Core) => {
                let tag = self.byte(Node::Alias)?;
                match CoreSort::from_u8(tag) {
                    Some(sort) => Sort::Core(sort),
                    None => return Err(self.fail(ErrorCode::MalformedAlias, Node::Alias)),
                }
            }
            Some(SortTag::Func) => Sort::Func,
            Some(SortTag::Value) => Sort::Value,
            Some(SortTag::Type) => Sort::Type,
            Some(SortTag::Component) => Sort::Component,
            Some(SortTag::Instance) => Sort::Instance,
            None => return Err(self.fail(ErrorCode::MalformedAlias, Node::Alias)),
        };
        Ok(sort)
    }
}
