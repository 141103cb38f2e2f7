use serde::{Deserialize, Serialize};

/// Abstract column types understood by the type mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Char,
    String,
    Nvarchar2,
    Text,
    MediumText,
    LongText,
    Integer,
    BigInteger,
    MediumInteger,
    SmallInteger,
    TinyInteger,
    Float,
    Double,
    Decimal,
    Boolean,
    Enum,
    Date,
    DateTime,
    DateTimeTz,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    Binary,
    Uuid,
    IpAddress,
    MacAddress,
    Json,
    Jsonb,
}

impl ColumnType {
    /// Integer family, eligible for auto-increment.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ColumnType::Integer
                | ColumnType::BigInteger
                | ColumnType::MediumInteger
                | ColumnType::SmallInteger
                | ColumnType::TinyInteger
        )
    }

    /// Look up a type by its DSL name.
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name.to_ascii_lowercase().as_str() {
            "char" => ColumnType::Char,
            "string" | "varchar" | "varchar2" => ColumnType::String,
            "nvarchar2" => ColumnType::Nvarchar2,
            "text" => ColumnType::Text,
            "mediumtext" => ColumnType::MediumText,
            "longtext" => ColumnType::LongText,
            "integer" | "int" => ColumnType::Integer,
            "biginteger" | "bigint" => ColumnType::BigInteger,
            "mediuminteger" => ColumnType::MediumInteger,
            "smallinteger" | "smallint" => ColumnType::SmallInteger,
            "tinyinteger" | "tinyint" => ColumnType::TinyInteger,
            "float" => ColumnType::Float,
            "double" => ColumnType::Double,
            "decimal" | "numeric" => ColumnType::Decimal,
            "boolean" | "bool" => ColumnType::Boolean,
            "enum" => ColumnType::Enum,
            "date" => ColumnType::Date,
            "datetime" => ColumnType::DateTime,
            "datetimetz" => ColumnType::DateTimeTz,
            "time" => ColumnType::Time,
            "timetz" => ColumnType::TimeTz,
            "timestamp" => ColumnType::Timestamp,
            "timestamptz" => ColumnType::TimestampTz,
            "binary" | "blob" => ColumnType::Binary,
            "uuid" => ColumnType::Uuid,
            "ipaddress" => ColumnType::IpAddress,
            "macaddress" => ColumnType::MacAddress,
            "json" => ColumnType::Json,
            "jsonb" => ColumnType::Jsonb,
            _ => return None,
        };
        Some(ty)
    }
}

/// Column default, rendered by the type mapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// Expression emitted unquoted (e.g. `sysdate`)
    Raw(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// A column of a table blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
    #[serde(default)]
    pub length: Option<u32>,
    /// Float precision or decimal total digits
    #[serde(default)]
    pub precision: Option<u32>,
    /// Decimal places
    #[serde(default)]
    pub places: Option<u32>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub default: Option<DefaultValue>,
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default)]
    pub comment: Option<String>,
    /// Allowed values, emitted as a check constraint
    #[serde(default)]
    pub allowed: Vec<String>,
    /// First value of the emulating sequence
    #[serde(default)]
    pub start_value: Option<u64>,
    #[serde(default)]
    pub nocache: bool,
    /// Modify an existing column instead of adding it
    #[serde(default)]
    pub change: bool,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub index: bool,
}

impl ColumnDefinition {
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            length: None,
            precision: None,
            places: None,
            nullable: false,
            default: None,
            auto_increment: false,
            comment: None,
            allowed: Vec::new(),
            start_value: None,
            nocache: false,
            change: false,
            primary: false,
            unique: false,
            index: false,
        }
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn precision(mut self, total: u32, places: u32) -> Self {
        self.precision = Some(total);
        self.places = Some(places);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn allowed(mut self, values: &[&str]) -> Self {
        self.allowed = values.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn change(mut self) -> Self {
        self.change = true;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn index(mut self) -> Self {
        self.index = true;
        self
    }

    /// Auto-increment on an integer column, the only kind that gets sequence emulation.
    pub fn is_serial(&self) -> bool {
        self.auto_increment && self.column_type.is_integer()
    }
}

/// Index-like commands, also the suffix of derived index names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    Primary,
    Unique,
    Index,
    Foreign,
    Fulltext,
}

impl IndexKind {
    pub fn suffix(&self) -> &'static str {
        match self {
            IndexKind::Primary => "pk",
            IndexKind::Unique => "uk",
            IndexKind::Index => "index",
            IndexKind::Foreign => "fk",
            IndexKind::Fulltext => "fulltext",
        }
    }
}

/// Index or constraint definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexCommand {
    /// Explicit name; derived from table and columns when absent
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default)]
    pub columns: Vec<String>,
}

impl IndexCommand {
    pub fn on(columns: &[&str]) -> Self {
        Self {
            index: None,
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn named(index: &str, columns: &[&str]) -> Self {
        Self {
            index: Some(index.to_string()),
            ..Self::on(columns)
        }
    }
}

/// Foreign key definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyCommand {
    #[serde(default)]
    pub index: Option<String>,
    pub columns: Vec<String>,
    /// Referenced table
    pub on: String,
    pub references: Vec<String>,
    #[serde(default)]
    pub on_delete: Option<String>,
}

impl ForeignKeyCommand {
    pub fn new(columns: &[&str], on: &str, references: &[&str]) -> Self {
        Self {
            index: None,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            on: on.to_string(),
            references: references.iter().map(|c| c.to_string()).collect(),
            on_delete: None,
        }
    }

    pub fn on_delete(mut self, action: &str) -> Self {
        self.on_delete = Some(action.to_string());
        self
    }
}

/// A schema command carried by a blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SchemaCommand {
    Create,
    /// Add the blueprint's new (non-`change`) columns
    Add,
    /// Modify the blueprint's `change` columns
    Change,
    Drop,
    DropIfExists,
    DropColumn(Vec<String>),
    Rename { to: String },
    RenameColumn { from: String, to: String },
    Primary(IndexCommand),
    Unique(IndexCommand),
    Index(IndexCommand),
    Fulltext(IndexCommand),
    Foreign(ForeignKeyCommand),
    DropPrimary(IndexCommand),
    DropUnique(IndexCommand),
    DropIndex(IndexCommand),
    DropForeign(IndexCommand),
    DropFullText(IndexCommand),
}

/// A transient description of one schema operation on a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableBlueprint {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
    #[serde(default)]
    pub commands: Vec<SchemaCommand>,
    #[serde(default)]
    pub comment: Option<String>,
    /// Column comments in addition to those set on the definitions
    #[serde(default)]
    pub column_comments: Vec<(String, String)>,
}

impl TableBlueprint {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Blueprint for `create table`.
    pub fn create(name: &str) -> Self {
        Self::new(name).command(SchemaCommand::Create)
    }

    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    pub fn command(mut self, command: SchemaCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn creating(&self) -> bool {
        self.commands.iter().any(|c| matches!(c, SchemaCommand::Create))
    }

    /// Columns added by this blueprint.
    pub fn added_columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter().filter(|c| !c.change)
    }

    /// Columns modified by this blueprint.
    pub fn changed_columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter().filter(|c| c.change)
    }

    /// The auto-increment column emulated with a sequence and trigger.
    pub fn serial_column(&self) -> Option<&ColumnDefinition> {
        self.added_columns().find(|c| c.is_serial())
    }
}
