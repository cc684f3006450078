//! Intermediate representation of a generated cobra client file.
//!
//! The flag translator, request initializer and command assembler build these
//! values; the Go renderer consumes them, and `cobra-gen analyze` serializes
//! them for inspection. Nothing here carries Go source text except names and
//! type expressions.

use cobra_types::{Method, WireType};
use indexmap::IndexMap;
use serde_derive::Serialize;
use std::fmt;

/// pflag binding used for a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlagKind {
    String,
    BytesBase64,
    Bool,
    Float32,
    Float64,
    Int32,
    Int64,
    Uint32,
    Uint64,
}

impl FlagKind {
    /// Flag binding for a scalar wire type; enums, groups and messages have none.
    pub fn for_wire_type(wire_type: WireType) -> Option<Self> {
        use WireType::*;
        match wire_type {
            String => Some(FlagKind::String),
            Bytes => Some(FlagKind::BytesBase64),
            Bool => Some(FlagKind::Bool),
            Float => Some(FlagKind::Float32),
            Double => Some(FlagKind::Float64),
            Int32 | Fixed32 | Sfixed32 | Sint32 => Some(FlagKind::Int32),
            Int64 | Fixed64 | Sfixed64 | Sint64 => Some(FlagKind::Int64),
            Uint32 => Some(FlagKind::Uint32),
            Uint64 => Some(FlagKind::Uint64),
            Enum | Group | Message => None,
        }
    }

    /// Name of the `pflag.FlagSet` method that binds this kind.
    pub fn binder(&self) -> &'static str {
        match self {
            FlagKind::String => "StringVar",
            FlagKind::BytesBase64 => "BytesBase64Var",
            FlagKind::Bool => "BoolVar",
            FlagKind::Float32 => "Float32Var",
            FlagKind::Float64 => "Float64Var",
            FlagKind::Int32 => "Int32Var",
            FlagKind::Int64 => "Int64Var",
            FlagKind::Uint32 => "Uint32Var",
            FlagKind::Uint64 => "Uint64Var",
        }
    }

    /// Go literal for the flag's default value.
    pub fn default_literal(&self) -> &'static str {
        match self {
            FlagKind::String => "\"\"",
            FlagKind::BytesBase64 => "[]byte{}",
            FlagKind::Bool => "false",
            _ => "0",
        }
    }
}

/// One line of flag registration code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FlagFragment {
    /// Binds a flag to a request field, e.g. `&reqArgs.Inner.Value` as `inner-value`.
    Bind {
        binding: FlagKind,
        target: String,
        flag_name: String,
        help: String,
    },
    /// A field that has no flag; rendered as a comment.
    Unsupported { note: String },
}

impl FlagFragment {
    pub fn flag_name(&self) -> Option<&str> {
        match self {
            FlagFragment::Bind { flag_name, .. } => Some(flag_name),
            FlagFragment::Unsupported { .. } => None,
        }
    }
}

/// Go expression that pre-allocates a request so flags can bind into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum InitExpr {
    /// `&Type{Field: <expr>, ...}`, with fields in declaration order.
    Construct {
        type_name: String,
        fields: IndexMap<String, InitExpr>,
    },
    /// `[]*Type{}` for a repeated message field.
    EmptyList { type_name: String },
    /// Nothing to allocate; parents omit the field.
    Empty,
}

impl InitExpr {
    pub fn is_empty(&self) -> bool {
        matches!(self, InitExpr::Empty)
    }

    pub fn type_name(&self) -> Option<&str> {
        match self {
            InitExpr::Construct { type_name, .. } | InitExpr::EmptyList { type_name } => {
                Some(type_name)
            }
            InitExpr::Empty => None,
        }
    }
}

/* Single-line Go form, e.g. `&Outer{B: &M{}}` */
impl fmt::Display for InitExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitExpr::Construct { type_name, fields } => {
                write!(f, "&{type_name}{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, "}}")
            }
            InitExpr::EmptyList { type_name } => write!(f, "[]*{type_name}{{}}"),
            InitExpr::Empty => write!(f, "nil"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreamingMode {
    Unary,
    ServerStreaming,
    ClientStreaming,
    Bidirectional,
}

impl StreamingMode {
    pub fn of(method: &Method) -> Self {
        match (method.client_streaming, method.server_streaming) {
            (false, false) => StreamingMode::Unary,
            (false, true) => StreamingMode::ServerStreaming,
            (true, false) => StreamingMode::ClientStreaming,
            (true, true) => StreamingMode::Bidirectional,
        }
    }

    pub fn is_streaming(&self) -> bool {
        !matches!(self, StreamingMode::Unary)
    }

    /// Run-body steps for this mode.
    pub fn dispatch(&self) -> Vec<DispatchStep> {
        use DispatchStep::*;
        match self {
            StreamingMode::Unary => vec![DecodeRequest, MergeFlags, CallUnary, EncodeResponse],
            StreamingMode::ServerStreaming => {
                vec![DecodeRequest, MergeFlags, OpenServerStream, RecvUntilEof]
            }
            StreamingMode::ClientStreaming => {
                vec![OpenClientStream, SendUntilEof, CloseAndRecv, EncodeResponse]
            }
            StreamingMode::Bidirectional => vec![OpenClientStream, SendUntilEof, RecvUntilEof],
        }
    }
}

/// One step of a subcommand's `Run` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchStep {
    /// Decode one request from the input codec into `v`.
    DecodeRequest,
    /// Overlay the flag-bound request skeleton onto `v`.
    MergeFlags,
    CallUnary,
    OpenServerStream,
    /// Encode each streamed response until the server closes the stream.
    RecvUntilEof,
    OpenClientStream,
    /// Decode, merge and send requests until the input is exhausted.
    SendUntilEof,
    CloseAndRecv,
    EncodeResponse,
}

/// Everything needed to render one method's subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Subcommand {
    /// Go name of the owning service, e.g. `NestedMessages`.
    pub service: String,
    /// Go name of the method, e.g. `GetDeeplyNested`.
    pub method: String,
    /// Constructor function, e.g. `_NestedMessagesGetClientCommand`.
    pub constructor: String,
    /// Cobra `Use` name: the method name in lower case.
    pub use_name: String,
    pub long: String,
    /// Go type of the request, possibly package qualified.
    pub input_type: String,
    pub init: InitExpr,
    pub flags: Vec<FlagFragment>,
    pub mode: StreamingMode,
    pub steps: Vec<DispatchStep>,
}

/// Connection flag defaults baked into a service's config struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConnectionDefaults {
    pub server_addr: String,
    pub response_format: String,
    pub timeout_secs: u64,
    pub auth_token_type: String,
}

/// Per-service group command with its connection config and helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServiceGroup {
    pub name: String,
    pub use_name: String,
    pub defaults: ConnectionDefaults,
}

/// Top-level units of a generated file, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "unit", rename_all = "kebab-case")]
pub enum CommandUnit {
    ServiceGroup(ServiceGroup),
    Subcommand(Subcommand),
    /// `var _<Service>ClientSubCommands = []func() *cobra.Command{...}`
    SubcommandList {
        service: String,
        constructors: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct GoImport {
    pub alias: String,
    pub path: String,
}

impl GoImport {
    pub fn new(alias: &str, path: &str) -> Self {
        Self {
            alias: alias.to_string(),
            path: path.to_string(),
        }
    }

    /// Standard library paths have no dot in their first element.
    pub fn is_std(&self) -> bool {
        !self.path.split('/').next().unwrap_or_default().contains('.')
    }
}

/// A complete generated file before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GoFile {
    /// Proto file this was generated from.
    pub source: String,
    /// Output path, e.g. `nested.cobra.pb.go`.
    pub output_name: String,
    pub package: String,
    pub imports: Vec<GoImport>,
    pub units: Vec<CommandUnit>,
}

impl GoFile {
    pub fn subcommands(&self) -> impl Iterator<Item = &Subcommand> {
        self.units.iter().filter_map(|unit| match unit {
            CommandUnit::Subcommand(subcommand) => Some(subcommand),
            _ => None,
        })
    }
}
