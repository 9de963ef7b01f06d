use num_derive::FromPrimitive;

// https://github.com/WebAssembly/component-model/blob/main/design/mvp/Binary.md#type-definitions

pub const COMPONENT_IMPORT_TAG: u8 = 0x03;
pub const MODULE_TYPE_TAG: u8 = 0x50;
pub const CORE_FUNC_TYPE_TAG: u8 = 0x60;
pub const CASE_TERMINATOR: u8 = 0x00;
/// `(core module (type i))`, the only extern descriptor shape accepted.
pub const EXTERN_DESC_PREFIX: [u8; 2] = [0x00, 0x11];

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum PrimValType {
    Bool = 0x7f,
    S8 = 0x7e,
    U8 = 0x7d,
    S16 = 0x7c,
    U16 = 0x7b,
    S32 = 0x7a,
    U32 = 0x79,
    S64 = 0x78,
    U64 = 0x77,
    Float32 = 0x76,
    Float64 = 0x75,
    Char = 0x74,
    String = 0x73,
}

/// Leading byte of every non-primitive type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum DefTypeTag {
    Record = 0x72,
    Variant = 0x71,
    List = 0x70,
    Tuple = 0x6f,
    Flags = 0x6e,
    Enum = 0x6d,
    Option = 0x6b,
    Result = 0x6a,
    Own = 0x69,
    Borrow = 0x68,
    Func = 0x40,
    Component = 0x41,
    Instance = 0x42,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum ResultListTag {
    Single = 0x00,
    Named = 0x01,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum OptionTag {
    Absent = 0x00,
    Present = 0x01,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum InstanceDeclTag {
    CoreType = 0x00,
    Type = 0x01,
    Alias = 0x02,
    Export = 0x04,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum ModuleDeclTag {
    Import = 0x00,
    Type = 0x01,
    Alias = 0x02,
    Export = 0x03,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum SortTag {
    Core = 0x00,
    Func = 0x01,
    Value = 0x02,
    Type = 0x03,
    Component = 0x04,
    Instance = 0x05,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum CoreSort {
    Func = 0x00,
    Table = 0x01,
    Memory = 0x02,
    Global = 0x03,
    Type = 0x10,
    Module = 0x11,
    Instance = 0x12,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum AliasTargetTag {
    Export = 0x00,
    CoreExport = 0x01,
    Outer = 0x02,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum CoreImportDescTag {
    Func = 0x00,
    Table = 0x01,
    Memory = 0x02,
    Global = 0x03,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum CoreValType {
    I32 = 0x7f,
    I64 = 0x7e,
    F32 = 0x7d,
    F64 = 0x7c,
    V128 = 0x7b,
    FuncRef = 0x70,
    ExternRef = 0x6f,
}

impl CoreValType {
    pub fn is_reference(self) -> bool {
        matches!(self, CoreValType::FuncRef | CoreValType::ExternRef)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum LimitsTag {
    Min = 0x00,
    MinMax = 0x01,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum Mutability {
    Const = 0x00,
    Var = 0x01,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Primitive(PrimValType),
    /// Index carried directly in the tag byte, not LEB128-encoded.
    TypeIndex(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelValType {
    pub label: String,
    pub ty: ValueType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub fields: Vec<LabelValType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub label: String,
    pub ty: Option<ValueType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantTy {
    pub cases: Vec<Case>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub ty: ValueType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple {
    pub types: Vec<ValueType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flags {
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionTy {
    pub ty: ValueType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTy {
    pub ok: Option<ValueType>,
    pub err: Option<ValueType>,
}

/// Owned handle to the resource type at the given index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Own(pub u32);

/// Borrowed handle to the resource type at the given index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Borrow(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultList {
    Single(ValueType),
    Named(Vec<LabelValType>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncType {
    pub params: Vec<LabelValType>,
    pub results: ResultList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefValType {
    Primitive(PrimValType),
    Record(Record),
    Variant(VariantTy),
    List(List),
    Tuple(Tuple),
    Flags(Flags),
    Enum(Enum),
    Option(OptionTy),
    Result(ResultTy),
    Own(Own),
    Borrow(Borrow),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefType {
    Value(DefValType),
    Func(FuncType),
    Component(ComponentType),
    Instance(InstanceType),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentType {
    pub decls: Vec<ComponentDecl>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceType {
    pub decls: Vec<InstanceDecl>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleType {
    pub decls: Vec<ModuleDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentDecl {
    Import(ImportDecl),
    Instance(InstanceDecl),
}

/// Declarations allowed in instance type bodies.
///
/// The encoding reserves a discriminant for inline core types, which this
/// decoder rejects, so there is no variant for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceDecl {
    Type(Box<DefType>),
    Alias(Alias),
    Export(ExportDecl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub name: String,
    pub desc: ExternDesc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDecl {
    pub name: String,
    pub desc: ExternDesc,
}

/// Reference to a core module type.
///
/// Only the `0x00 0x11 typeidx` shape is understood; the other extern
/// descriptor forms (functions, values, types, instances, components) are
/// not decoded yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternDesc {
    pub type_index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    Core(CoreSort),
    Func,
    Value,
    Type,
    Component,
    Instance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasTarget {
    Export { instance: u32, name: String },
    CoreExport { instance: u32, name: String },
    Outer { count: u32, index: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub sort: Sort,
    pub target: AliasTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleDecl {
    Import(CoreImport),
    Type(Box<CoreDefType>),
    Alias(Alias),
    Export(CoreExportDecl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreImport {
    pub module: String,
    pub name: String,
    pub desc: CoreImportDesc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreExportDecl {
    pub name: String,
    pub desc: CoreImportDesc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreImportDesc {
    Func(u32),
    Table(TableType),
    Memory(Limits),
    Global(GlobalType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min: u32,
    pub max: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableType {
    pub elem_type: CoreValType,
    pub limits: Limits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalType {
    pub ty: CoreValType,
    pub mutable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreFuncType {
    pub params: Vec<CoreValType>,
    pub results: Vec<CoreValType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreDefType {
    Func(CoreFuncType),
    Module(ModuleType),
}
