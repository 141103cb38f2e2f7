//! Column type mapping.

use super::wrapper::{Wrapper, quote_string};
use crate::ast::{ColumnDefinition, ColumnType, DefaultValue};

const DEFAULT_STRING_LENGTH: u32 = 255;

/// Oracle column type for a definition.
pub fn type_for(column: &ColumnDefinition) -> String {
    let length = |default: u32| column.length.unwrap_or(default);
    match column.column_type {
        ColumnType::Char => format!("char({})", length(DEFAULT_STRING_LENGTH)),
        ColumnType::String => format!("varchar2({})", length(DEFAULT_STRING_LENGTH)),
        ColumnType::Nvarchar2 => format!("nvarchar2({})", length(DEFAULT_STRING_LENGTH)),
        ColumnType::Text | ColumnType::MediumText | ColumnType::LongText => "clob".to_string(),
        ColumnType::Integer => format!("number({},0)", length(10)),
        ColumnType::BigInteger => format!("number({},0)", length(19)),
        ColumnType::MediumInteger => format!("number({},0)", length(7)),
        ColumnType::SmallInteger => format!("number({},0)", length(5)),
        ColumnType::TinyInteger => format!("number({},0)", length(3)),
        ColumnType::Float => match column.precision {
            Some(p) => format!("float({})", p),
            None => "float(126)".to_string(),
        },
        ColumnType::Double => "float(126)".to_string(),
        ColumnType::Decimal => format!(
            "number({},{})",
            column.precision.unwrap_or(8),
            column.places.unwrap_or(2)
        ),
        ColumnType::Boolean => "char(1)".to_string(),
        ColumnType::Enum => format!("varchar2({})", length(DEFAULT_STRING_LENGTH)),
        ColumnType::Date | ColumnType::DateTime | ColumnType::Time => "date".to_string(),
        ColumnType::Timestamp => "timestamp".to_string(),
        ColumnType::DateTimeTz | ColumnType::TimeTz | ColumnType::TimestampTz => {
            "timestamp with time zone".to_string()
        }
        ColumnType::Binary => "blob".to_string(),
        ColumnType::Uuid => "char(36)".to_string(),
        ColumnType::IpAddress => "varchar(45)".to_string(),
        ColumnType::MacAddress => "varchar(17)".to_string(),
        ColumnType::Json | ColumnType::Jsonb => "clob".to_string(),
    }
}

/// Render a default value. Booleans become `'1'` / `'0'`, raw expressions
/// stay unquoted, anything else is a quoted literal.
pub fn default_value(value: &DefaultValue) -> String {
    match value {
        DefaultValue::Raw(sql) => sql.clone(),
        DefaultValue::Bool(b) => quote_string(if *b { "1" } else { "0" }),
        DefaultValue::Int(n) => quote_string(&n.to_string()),
        DefaultValue::Float(n) => quote_string(&n.to_string()),
        DefaultValue::String(s) => quote_string(s),
    }
}

/// ` default <v> {null|not null} [check (col in (...))]`
pub fn modifiers(wrapper: &Wrapper, column: &ColumnDefinition) -> String {
    let mut sql = String::new();

    if let Some(default) = &column.default {
        sql.push_str(" default ");
        sql.push_str(&default_value(default));
    }

    sql.push_str(if column.nullable { " null" } else { " not null" });

    if !column.allowed.is_empty() {
        let allowed = column
            .allowed
            .iter()
            .map(|v| quote_string(v))
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(&format!(
            " check ({} in ({}))",
            wrapper.wrap_value(&column.name),
            allowed
        ));
    }

    sql
}

/// Full column definition: `name type modifiers`.
pub fn column_definition(wrapper: &Wrapper, column: &ColumnDefinition) -> String {
    format!(
        "{} {}{}",
        wrapper.wrap(&column.name),
        type_for(column),
        modifiers(wrapper, column)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OracleConfig;

    fn col(ty: ColumnType) -> ColumnDefinition {
        ColumnDefinition::new("c", ty)
    }

    #[test]
    fn test_type_table() {
        let cases = [
            (col(ColumnType::Char).length(2), "char(2)"),
            (col(ColumnType::String).length(100), "varchar2(100)"),
            (col(ColumnType::String), "varchar2(255)"),
            (col(ColumnType::Nvarchar2).length(50), "nvarchar2(50)"),
            (col(ColumnType::Text), "clob"),
            (col(ColumnType::MediumText), "clob"),
            (col(ColumnType::LongText), "clob"),
            (col(ColumnType::Integer), "number(10,0)"),
            (col(ColumnType::Integer).length(12), "number(12,0)"),
            (col(ColumnType::BigInteger), "number(19,0)"),
            (col(ColumnType::MediumInteger), "number(7,0)"),
            (col(ColumnType::SmallInteger), "number(5,0)"),
            (col(ColumnType::TinyInteger), "number(3,0)"),
            (col(ColumnType::Float), "float(126)"),
            (col(ColumnType::Double), "float(126)"),
            (col(ColumnType::Decimal).precision(10, 3), "number(10,3)"),
            (col(ColumnType::Decimal), "number(8,2)"),
            (col(ColumnType::Boolean), "char(1)"),
            (col(ColumnType::Enum), "varchar2(255)"),
            (col(ColumnType::Enum).length(20), "varchar2(20)"),
            (col(ColumnType::Date), "date"),
            (col(ColumnType::DateTime), "date"),
            (col(ColumnType::Time), "date"),
            (col(ColumnType::Timestamp), "timestamp"),
            (col(ColumnType::TimestampTz), "timestamp with time zone"),
            (col(ColumnType::DateTimeTz), "timestamp with time zone"),
            (col(ColumnType::Binary), "blob"),
            (col(ColumnType::Uuid), "char(36)"),
            (col(ColumnType::IpAddress), "varchar(45)"),
            (col(ColumnType::MacAddress), "varchar(17)"),
            (col(ColumnType::Json), "clob"),
            (col(ColumnType::Jsonb), "clob"),
        ];
        for (column, expected) in cases {
            assert_eq!(type_for(&column), expected, "{:?}", column.column_type);
        }

        let mut float = col(ColumnType::Float);
        float.precision = Some(53);
        assert_eq!(type_for(&float), "float(53)");
    }

    #[test]
    fn test_modifier_order() {
        let w = Wrapper::new(&OracleConfig::default());
        let status = ColumnDefinition::new("status", ColumnType::Enum)
            .length(20)
            .allowed(&["draft", "published"])
            .default(DefaultValue::String("draft".into()));
        assert_eq!(
            column_definition(&w, &status),
            "status varchar2(20) default 'draft' not null check (status in ('draft', 'published'))"
        );

        let active = ColumnDefinition::new("active", ColumnType::Boolean)
            .nullable()
            .default(DefaultValue::Bool(true));
        assert_eq!(modifiers(&w, &active), " default '1' null");

        let created = ColumnDefinition::new("created_at", ColumnType::Timestamp)
            .default(DefaultValue::Raw("systimestamp".into()));
        assert_eq!(modifiers(&w, &created), " default systimestamp not null");
    }

    #[test]
    fn test_reserved_column_definition() {
        let w = Wrapper::new(&OracleConfig::default());
        let level = ColumnDefinition::new("level", ColumnType::Integer);
        assert_eq!(column_definition(&w, &level), "\"LEVEL\" number(10,0) not null");
    }
}
