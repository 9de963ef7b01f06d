//! Companion encoder used to check that decoding is lossless.

use super::types::*;

pub trait Encode {
    fn encode(&self, out: &mut Vec<u8>);

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![];
        self.encode(&mut out);
        out
    }
}

fn u32(value: u32, out: &mut Vec<u8>) {
    leb128::write::unsigned(out, u64::from(value)).expect("writing to a Vec cannot fail");
}

fn name(value: &str, out: &mut Vec<u8>) {
    u32(value.len() as u32, out);
    out.extend_from_slice(value.as_bytes());
}

fn label(value: &str, out: &mut Vec<u8>) {
    u32(value.len() as u32, out);
    name(value, out);
}

fn vec<T>(items: &[T], out: &mut Vec<u8>, mut item: impl FnMut(&T, &mut Vec<u8>)) {
    u32(items.len() as u32, out);
    for i in items {
        item(i, out);
    }
}

fn option<T: Encode>(value: &Option<T>, out: &mut Vec<u8>) {
    match value {
        None => out.push(OptionTag::Absent as u8),
        Some(v) => {
            out.push(OptionTag::Present as u8);
            v.encode(out);
        }
    }
}

impl<T: Encode> Encode for Box<T> {
    fn encode(&self, out: &mut Vec<u8>) {
        (**self).encode(out)
    }
}

impl Encode for ValueType {
    fn encode(&self, out: &mut Vec<u8>) {
        match *self {
            ValueType::Primitive(prim) => out.push(prim as u8),
            ValueType::TypeIndex(idx) => {
                let byte = u8::try_from(idx).expect("type index fits in the tag byte");
                out.push(byte);
            }
        }
    }
}

impl Encode for LabelValType {
    fn encode(&self, out: &mut Vec<u8>) {
        label(&self.label, out);
        self.ty.encode(out);
    }
}

impl Encode for Case {
    fn encode(&self, out: &mut Vec<u8>) {
        label(&self.label, out);
        option(&self.ty, out);
        out.push(CASE_TERMINATOR);
    }
}

impl Encode for DefValType {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            DefValType::Primitive(prim) => out.push(*prim as u8),
            DefValType::Record(record) => {
                out.push(DefTypeTag::Record as u8);
                vec(&record.fields, out, Encode::encode);
            }
            DefValType::Variant(variant) => {
                out.push(DefTypeTag::Variant as u8);
                vec(&variant.cases, out, Encode::encode);
            }
            DefValType::List(list) => {
                out.push(DefTypeTag::List as u8);
                list.ty.encode(out);
            }
            DefValType::Tuple(tuple) => {
                out.push(DefTypeTag::Tuple as u8);
                vec(&tuple.types, out, Encode::encode);
            }
            DefValType::Flags(flags) => {
                out.push(DefTypeTag::Flags as u8);
                vec(&flags.labels, out, |l, out| label(l, out));
            }
            DefValType::Enum(e) => {
                out.push(DefTypeTag::Enum as u8);
                vec(&e.labels, out, |l, out| label(l, out));
            }
            DefValType::Option(opt) => {
                out.push(DefTypeTag::Option as u8);
                opt.ty.encode(out);
            }
            DefValType::Result(result) => {
                out.push(DefTypeTag::Result as u8);
                option(&result.ok, out);
                option(&result.err, out);
            }
            DefValType::Own(Own(idx)) => {
                out.push(DefTypeTag::Own as u8);
                u32(*idx, out);
            }
            DefValType::Borrow(Borrow(idx)) => {
                out.push(DefTypeTag::Borrow as u8);
                u32(*idx, out);
            }
        }
    }
}

impl Encode for DefType {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            DefType::Value(ty) => ty.encode(out),
            DefType::Func(func) => {
                out.push(DefTypeTag::Func as u8);
                vec(&func.params, out, Encode::encode);
                match &func.results {
                    ResultList::Single(ty) => {
                        out.push(ResultListTag::Single as u8);
                        ty.encode(out);
                    }
                    ResultList::Named(results) => {
                        out.push(ResultListTag::Named as u8);
                        vec(results, out, Encode::encode);
                    }
                }
            }
            DefType::Component(component) => {
                out.push(DefTypeTag::Component as u8);
                vec(&component.decls, out, Encode::encode);
            }
            DefType::Instance(instance) => {
                out.push(DefTypeTag::Instance as u8);
                vec(&instance.decls, out, Encode::encode);
            }
        }
    }
}

impl Encode for ExternDesc {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&EXTERN_DESC_PREFIX);
        u32(self.type_index, out);
    }
}

impl Encode for ComponentDecl {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            ComponentDecl::Import(import) => {
                out.push(COMPONENT_IMPORT_TAG);
                name(&import.name, out);
                import.desc.encode(out);
            }
            ComponentDecl::Instance(decl) => decl.encode(out),
        }
    }
}

impl Encode for InstanceDecl {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            InstanceDecl::Type(ty) => {
                out.push(InstanceDeclTag::Type as u8);
                ty.encode(out);
            }
            InstanceDecl::Alias(alias) => {
                out.push(InstanceDeclTag::Alias as u8);
                alias.encode(out);
            }
            InstanceDecl::Export(export) => {
                out.push(InstanceDeclTag::Export as u8);
                name(&export.name, out);
                export.desc.encode(out);
            }
        }
    }
}

impl Encode for Alias {
    fn encode(&self, out: &mut Vec<u8>) {
        match self.sort {
            Sort::Core(sort) => out.extend([SortTag::Core as u8, sort as u8]),
            Sort::Func => out.push(SortTag::Func as u8),
            Sort::Value => out.push(SortTag::Value as u8),
            Sort::Type => out.push(SortTag::Type as u8),
            Sort::Component => out.push(SortTag::Component as u8),
            Sort::Instance => out.push(SortTag::Instance as u8),
        }
        match &self.target {
            AliasTarget::Export { instance, name: n } => {
                out.push(AliasTargetTag::Export as u8);
                u32(*instance, out);
                name(n, out);
            }
            AliasTarget::CoreExport { instance, name: n } => {
                out.push(AliasTargetTag::CoreExport as u8);
                u32(*instance, out);
                name(n, out);
            }
            AliasTarget::Outer { count, index } => {
                out.push(AliasTargetTag::Outer as u8);
                u32(*count, out);
                u32(*index, out);
            }
        }
    }
}

impl Encode for ModuleType {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(MODULE_TYPE_TAG);
        vec(&self.decls, out, Encode::encode);
    }
}

impl Encode for ModuleDecl {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            ModuleDecl::Import(import) => {
                out.push(ModuleDeclTag::Import as u8);
                name(&import.module, out);
                name(&import.name, out);
                import.desc.encode(out);
            }
            ModuleDecl::Type(ty) => {
                out.push(ModuleDeclTag::Type as u8);
                ty.encode(out);
            }
            ModuleDecl::Alias(alias) => {
                out.push(ModuleDeclTag::Alias as u8);
                alias.encode(out);
            }
            ModuleDecl::Export(export) => {
                out.push(ModuleDeclTag::Export as u8);
                name(&export.name, out);
                export.desc.encode(out);
            }
        }
    }
}

impl Encode for CoreDefType {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            CoreDefType::Func(func) => {
                out.push(CORE_FUNC_TYPE_TAG);
                vec(&func.params, out, |ty, out| out.push(*ty as u8));
                vec(&func.results, out, |ty, out| out.push(*ty as u8));
            }
            CoreDefType::Module(module) => module.encode(out),
        }
    }
}

impl Encode for Limits {
    fn encode(&self, out: &mut Vec<u8>) {
        match self.max {
            None => {
                out.push(LimitsTag::Min as u8);
                u32(self.min, out);
            }
            Some(max) => {
                out.push(LimitsTag::MinMax as u8);
                u32(self.min, out);
                u32(max, out);
            }
        }
    }
}

impl Encode for CoreImportDesc {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            CoreImportDesc::Func(idx) => {
                out.push(CoreImportDescTag::Func as u8);
                u32(*idx, out);
            }
            CoreImportDesc::Table(table) => {
                out.push(CoreImportDescTag::Table as u8);
                out.push(table.elem_type as u8);
                table.limits.encode(out);
            }
            CoreImportDesc::Memory(limits) => {
                out.push(CoreImportDescTag::Memory as u8);
                limits.encode(out);
            }
            CoreImportDesc::Global(global) => {
                out.push(CoreImportDescTag::Global as u8);
                out.push(global.ty as u8);
                let mutability = if global.mutable {
                    Mutability::Var
                } else {
                    Mutability::Const
                };
                out.push(mutability as u8);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::{arbitrary, module::Decoder};
    use proptest::prelude::*;

    fn label_bytes(s: &str) -> Vec<u8> {
        let mut out = vec![];
        label(s, &mut out);
        out
    }

    fn name_bytes(s: &str) -> Vec<u8> {
        let mut out = vec![];
        name(s, &mut out);
        out
    }

    fn assert_def_type_round_trip(bytes: &[u8]) {
        let mut decoder = Decoder::new(bytes);
        let ty = decoder
            .decode_def_type()
            .unwrap_or_else(|err| panic!("{:02x?}: {}", bytes, err));
        assert!(decoder.is_end(), "trailing bytes after {:?}", ty);
        assert_eq!(ty.to_bytes(), bytes, "{:?}", ty);
    }

    #[test]
    fn value_types_round_trip() {
        let mut record = vec![0x72, 0x02];
        record.extend(label_bytes("key"));
        record.push(0x73);
        record.extend(label_bytes("value"));
        record.push(0x05);

        let mut variant = vec![0x71, 0x02];
        variant.extend(label_bytes("ok"));
        variant.extend([0x01, 0x79, 0x00]);
        variant.extend(label_bytes("none"));
        variant.extend([0x00, 0x00]);

        let mut flags = vec![0x6e, 0x03];
        for l in ["read", "write", "exec"] {
            flags.extend(label_bytes(l));
        }

        let mut enumeration = vec![0x6d, 0x01];
        enumeration.extend(label_bytes("only"));

        let inputs: Vec<Vec<u8>> = vec![
            vec![0x7f],
            vec![0x73],
            record,
            variant,
            vec![0x70, 0x72],
            vec![0x6f, 0x03, 0x7d, 0x7c, 0x10],
            flags,
            enumeration,
            vec![0x6d, 0x00],
            vec![0x6b, 0x74],
            vec![0x6a, 0x01, 0x79, 0x00],
            vec![0x69, 0xe5, 0x8e, 0x26],
            vec![0x68, 0x00],
        ];
        for bytes in inputs {
            assert_def_type_round_trip(&bytes);
        }
    }

    #[test]
    fn func_type_round_trip() {
        let mut func = vec![0x40, 0x02];
        func.extend(label_bytes("a"));
        func.push(0x78);
        func.extend(label_bytes("b"));
        func.push(0x01);
        func.extend([0x01, 0x01]);
        func.extend(label_bytes("sum"));
        func.push(0x78);
        assert_def_type_round_trip(&func);
        assert_def_type_round_trip(&[0x40, 0x00, 0x00, 0x7f]);
        assert_def_type_round_trip(&[0x40, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn component_and_instance_types_round_trip() {
        let mut instance = vec![0x42, 0x03, 0x01, 0x70, 0x7d, 0x04];
        instance.extend(name_bytes("m"));
        instance.extend([0x00, 0x11, 0x81, 0x01]);
        instance.extend([0x02, 0x01, 0x00, 0x00]);
        instance.extend(name_bytes("f"));
        assert_def_type_round_trip(&instance);

        let mut component = vec![0x41, 0x03, 0x03];
        component.extend(name_bytes("dep"));
        component.extend([0x00, 0x11, 0x00]);
        component.extend([0x01]);
        component.extend(&instance);
        component.extend([0x02, 0x00, 0x12, 0x02, 0x02, 0x01]);
        assert_def_type_round_trip(&component);
    }

    #[test]
    fn module_type_round_trip() {
        let mut bytes = vec![0x50, 0x05];
        bytes.extend([0x01, 0x60, 0x02, 0x7f, 0x6f, 0x00]);
        bytes.push(0x00);
        bytes.extend(name_bytes("env"));
        bytes.extend(name_bytes("table"));
        bytes.extend([0x01, 0x70, 0x01, 0x00, 0x80, 0x02]);
        bytes.extend([0x01, 0x50, 0x00]);
        bytes.push(0x03);
        bytes.extend(name_bytes("g"));
        bytes.extend([0x03, 0x7b, 0x00]);
        bytes.extend([0x02, 0x00, 0x00, 0x02, 0x00, 0x03]);

        let mut decoder = Decoder::new(&bytes);
        let module = decoder.decode_module_type().expect("valid module type");
        assert!(decoder.is_end());
        assert_eq!(module.to_bytes(), bytes);
    }

    // Padded LEB128 is valid input but the tree does not keep the padding,
    // so it re-encodes to the minimal form.
    #[test]
    fn padded_varints_re_encode_minimally() {
        let cases: [(&[u8], &[u8]); 3] = [
            (&[0x69, 0x80, 0x00], &[0x69, 0x00]),
            (&[0x6d, 0x80, 0x00], &[0x6d, 0x00]),
            (&[0x40, 0x80, 0x00, 0x00, 0x7f], &[0x40, 0x00, 0x00, 0x7f]),
        ];
        for (padded, minimal) in cases {
            let mut decoder = Decoder::new(padded);
            let ty = decoder.decode_def_type().expect("padded varints are accepted");
            assert!(decoder.is_end());
            let expected = Decoder::new(minimal).decode_def_type().expect("minimal form");
            assert_eq!(ty, expected);
            assert_eq!(ty.to_bytes(), minimal);
        }
    }

    proptest! {
        #[test]
        fn generated_def_types_round_trip(ty in arbitrary::def_type()) {
            let bytes = ty.to_bytes();
            let mut decoder = Decoder::new(&bytes);
            let decoded = decoder
                .decode_def_type()
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            prop_assert!(decoder.is_end());
            prop_assert_eq!(&decoded, &ty);
            prop_assert_eq!(decoded.to_bytes(), bytes);
        }

        #[test]
        fn generated_module_types_round_trip(module in arbitrary::module_type()) {
            let bytes = module.to_bytes();
            let mut decoder = Decoder::new(&bytes);
            let decoded = decoder
                .decode_module_type()
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            prop_assert!(decoder.is_end());
            prop_assert_eq!(&decoded, &module);
            prop_assert_eq!(decoded.to_bytes(), bytes);
        }
    }
}
