//! Dialect-neutral descriptors consumed by the Oracle compiler.

pub mod blueprint;
pub mod dml;
pub mod objects;
pub mod procedure;
pub mod query;
pub mod values;

pub use self::blueprint::{
    ColumnDefinition, ColumnType, DefaultValue, ForeignKeyCommand, IndexCommand, IndexKind,
    SchemaCommand, TableBlueprint,
};
pub use self::dml::{DEFAULT_KEY_COLUMN, DeleteDescriptor, InsertDescriptor, Row, UpdateDescriptor};
pub use self::objects::{FullTextPreference, SequenceSpec, TriggerSpec};
pub use self::procedure::{ProcedureCall, ProcedureParam};
pub use self::query::{
    Aggregate, Boolean, DatePart, Expr, Join, JoinKind, Lock, Ordering, Predicate, PredicateKind,
    QueryDescriptor, SortOrder,
};
pub use self::values::{OutBinding, OutKind, Value};
