//! Column specification parser using nom.
//!
//! Compact column lists for the CLI and quick blueprints.
//!
//! # Syntax Overview
//!
//! ```text
//! id:increments, email:string(100):unique, price:decimal(10,2):default=0
//! ─┬ ─────┬─────  ──┬── ───┬─── ─┬─ ───┬──
//!  │      │         │      │     │     └── Modifiers (flags, key=value)
//!  │      │         │      │     └── Type arguments (length or precision,scale)
//!  │      │         │      └── Type
//!  │      │         └── Column name
//!  │      └── `increments` = integer + auto-increment
//!  └── Column name
//! ```
//!
//! Modifiers: `nullable`, `ai`, `pk`, `unique`, `index`, `nocache`,
//! `default=<v>`, `comment=<text>`, `in=a|b|c`, `start=<n>`. Values that
//! contain `:` or `,` go in single quotes.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag_no_case, take_while, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{map, map_opt, map_res, opt, value},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded, tuple},
};

use crate::ast::{ColumnDefinition, ColumnType, DefaultValue};
use crate::error::{OracleError, OracleResult};

/// Unquoted defaults emitted as expressions rather than string literals.
const DEFAULT_EXPRESSIONS: &[&str] = &[
    "null",
    "sysdate",
    "systimestamp",
    "current_date",
    "current_timestamp",
    "sys_guid()",
];

#[derive(Debug, Clone)]
enum Modifier {
    Nullable,
    AutoIncrement,
    Primary,
    Unique,
    Index,
    NoCache,
    Default(DefaultValue),
    Comment(String),
    Allowed(Vec<String>),
    Start(u64),
}

/// Parse a comma-separated column list.
pub fn parse_columns(input: &str) -> OracleResult<Vec<ColumnDefinition>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(OracleError::parse(0, "Empty column list"));
    }

    match column_list(input) {
        Ok(("", columns)) => Ok(columns),
        Ok((remaining, _)) => Err(OracleError::parse(
            input.len() - remaining.len(),
            format!("Unexpected trailing content: '{}'", remaining),
        )),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(OracleError::parse(
            input.len() - e.input.len(),
            format!("Invalid column spec near '{}'", e.input),
        )),
        Err(nom::Err::Incomplete(_)) => {
            Err(OracleError::parse(input.len(), "Incomplete column spec"))
        }
    }
}

/// Parse exactly one column.
pub fn parse_column(input: &str) -> OracleResult<ColumnDefinition> {
    let mut columns = parse_columns(input)?;
    if columns.len() != 1 {
        return Err(OracleError::parse(
            0,
            format!("Expected one column, found {}", columns.len()),
        ));
    }
    Ok(columns.remove(0))
}

fn column_list(input: &str) -> IResult<&str, Vec<ColumnDefinition>> {
    separated_list1(delimited(multispace0, char(','), multispace0), column)(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// Type name, flagging the `*increments` shorthands as auto-increment.
fn type_name(name: &str) -> Option<(ColumnType, bool)> {
    let serial = match name.to_ascii_lowercase().as_str() {
        "increments" => Some(ColumnType::Integer),
        "bigincrements" => Some(ColumnType::BigInteger),
        "mediumincrements" => Some(ColumnType::MediumInteger),
        "smallincrements" => Some(ColumnType::SmallInteger),
        "tinyincrements" => Some(ColumnType::TinyInteger),
        _ => None,
    };
    match serial {
        Some(ty) => Some((ty, true)),
        None => ColumnType::from_name(name).map(|ty| (ty, false)),
    }
}

fn column_type(input: &str) -> IResult<&str, (ColumnType, bool)> {
    map_opt(identifier, type_name)(input)
}

fn number_u32(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse::<u32>)(input)
}

/// `(n)` or `(p,s)`
fn type_args(input: &str) -> IResult<&str, (u32, Option<u32>)> {
    delimited(
        char('('),
        tuple((
            number_u32,
            opt(preceded(
                delimited(multispace0, char(','), multispace0),
                number_u32,
            )),
        )),
        char(')'),
    )(input)
}

fn quoted(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
        str::to_string,
    )(input)
}

fn bare(input: &str) -> IResult<&str, String> {
    map(take_while1(|c: char| c != ':' && c != ','), |s: &str| {
        s.trim().to_string()
    })(input)
}

fn text(input: &str) -> IResult<&str, String> {
    alt((quoted, bare))(input)
}

fn classify_default(raw: String) -> DefaultValue {
    let lower = raw.to_ascii_lowercase();
    if lower == "true" {
        DefaultValue::Bool(true)
    } else if lower == "false" {
        DefaultValue::Bool(false)
    } else if let Ok(n) = raw.parse::<i64>() {
        DefaultValue::Int(n)
    } else if let Ok(f) = raw.parse::<f64>() {
        DefaultValue::Float(f)
    } else if DEFAULT_EXPRESSIONS.contains(&lower.as_str()) {
        DefaultValue::Raw(raw)
    } else {
        DefaultValue::String(raw)
    }
}

fn default_value(input: &str) -> IResult<&str, DefaultValue> {
    alt((map(quoted, DefaultValue::String), map(bare, classify_default)))(input)
}

fn allowed_value(input: &str) -> IResult<&str, String> {
    alt((
        quoted,
        map(take_while1(|c: char| c != '|' && c != ':' && c != ','), |s: &str| {
            s.trim().to_string()
        }),
    ))(input)
}

fn modifier(input: &str) -> IResult<&str, Modifier> {
    alt((
        map(preceded(tag_no_case("default="), default_value), Modifier::Default),
        map(preceded(tag_no_case("comment="), text), Modifier::Comment),
        map(
            preceded(tag_no_case("in="), separated_list1(char('|'), allowed_value)),
            Modifier::Allowed,
        ),
        map(
            preceded(tag_no_case("start="), map_res(digit1, str::parse::<u64>)),
            Modifier::Start,
        ),
        value(Modifier::Nullable, tag_no_case("nullable")),
        value(Modifier::NoCache, tag_no_case("nocache")),
        value(Modifier::AutoIncrement, tag_no_case("ai")),
        value(
            Modifier::Primary,
            alt((tag_no_case("primary"), tag_no_case("pk"))),
        ),
        value(Modifier::Unique, tag_no_case("unique")),
        value(Modifier::Index, tag_no_case("index")),
    ))(input)
}

/// `name:type[(args)][:modifier]*`
fn column(input: &str) -> IResult<&str, ColumnDefinition> {
    let (input, name) = identifier(input)?;
    let (input, _) = char(':')(input)?;
    let (input, (column_type, serial)) = column_type(input)?;
    let (input, args) = opt(type_args)(input)?;
    let (input, modifiers) = many0(preceded(char(':'), modifier))(input)?;

    let mut column = ColumnDefinition::new(name, column_type);
    column.auto_increment = serial;

    if let Some((first, second)) = args {
        match (column_type, second) {
            (_, Some(places)) => column = column.precision(first, places),
            (ColumnType::Float | ColumnType::Decimal, None) => column.precision = Some(first),
            _ => column = column.length(first),
        }
    }

    for modifier in modifiers {
        match modifier {
            Modifier::Nullable => column.nullable = true,
            Modifier::AutoIncrement => column.auto_increment = true,
            Modifier::Primary => column.primary = true,
            Modifier::Unique => column.unique = true,
            Modifier::Index => column.index = true,
            Modifier::NoCache => column.nocache = true,
            Modifier::Default(default) => column.default = Some(default),
            Modifier::Comment(comment) => column.comment = Some(comment),
            Modifier::Allowed(values) => column.allowed = values,
            Modifier::Start(start) => column.start_value = Some(start),
        }
    }

    Ok((input, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_column_list() {
        let columns = parse_columns(
            "id:increments, email:string(100):unique, price:decimal(10,2):default=0",
        )
        .unwrap();
        assert_eq!(columns.len(), 3);

        assert_eq!(columns[0].name, "id");
        assert_eq!(columns[0].column_type, ColumnType::Integer);
        assert!(columns[0].is_serial());

        assert_eq!(columns[1].length, Some(100));
        assert!(columns[1].unique);
        assert!(!columns[1].nullable);

        assert_eq!(columns[2].precision, Some(10));
        assert_eq!(columns[2].places, Some(2));
        assert_eq!(columns[2].default, Some(DefaultValue::Int(0)));
    }

    #[test]
    fn test_modifiers() {
        let column = parse_column(
            "status:enum(20):in=draft|live:default='draft':comment='Workflow, state':index",
        )
        .unwrap();
        assert_eq!(column.column_type, ColumnType::Enum);
        assert_eq!(column.length, Some(20));
        assert_eq!(column.allowed, vec!["draft", "live"]);
        assert_eq!(column.default, Some(DefaultValue::String("draft".into())));
        assert_eq!(column.comment.as_deref(), Some("Workflow, state"));
        assert!(column.index);
    }

    #[test]
    fn test_serial_options() {
        let column = parse_column("event_id:bigint:ai:pk:start=1000:nocache").unwrap();
        assert_eq!(column.column_type, ColumnType::BigInteger);
        assert!(column.is_serial() && column.primary && column.nocache);
        assert_eq!(column.start_value, Some(1000));
    }

    #[test]
    fn test_default_classification() {
        let parse_default = |spec: &str| parse_column(spec).unwrap().default;
        assert_eq!(
            parse_default("created_at:timestamp:default=systimestamp"),
            Some(DefaultValue::Raw("systimestamp".into()))
        );
        assert_eq!(
            parse_default("active:boolean:default=true"),
            Some(DefaultValue::Bool(true))
        );
        assert_eq!(
            parse_default("ratio:float(53):default=0.5"),
            Some(DefaultValue::Float(0.5))
        );
        assert_eq!(
            parse_default("nick:string:nullable:default=anon"),
            Some(DefaultValue::String("anon".into()))
        );
    }

    #[test]
    fn test_unknown_type_reports_position() {
        match parse_columns("id:nosuchtype") {
            Err(OracleError::Parse { position, .. }) => assert_eq!(position, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_trailing_and_empty_input() {
        assert!(matches!(
            parse_columns("id:int extra"),
            Err(OracleError::Parse { .. })
        ));
        assert!(matches!(
            parse_columns("id:int, email:bogus"),
            Err(OracleError::Parse { .. })
        ));
        assert!(parse_columns("   ").is_err());
        assert!(parse_column("a:int, b:int").is_err());
    }
}
