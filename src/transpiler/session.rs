//! Session setup statement.

use super::wrapper::quote_string;
use crate::config::OracleConfig;

/// Options whose value is an identifier and must stay unquoted.
const IDENTIFIER_OPTIONS: &[&str] = &["CURRENT_SCHEMA", "EDITION"];

/// `ALTER SESSION SET NLS_... = '...' ...` from the configured formats and
/// extra session variables.
pub fn compile_session_vars(config: &OracleConfig) -> String {
    let mut vars = vec![
        ("NLS_TIME_FORMAT".to_string(), "HH24:MI:SS".to_string()),
        ("NLS_DATE_FORMAT".to_string(), config.date_format.clone()),
        (
            "NLS_TIMESTAMP_FORMAT".to_string(),
            config.timestamp_format.clone(),
        ),
        (
            "NLS_TIMESTAMP_TZ_FORMAT".to_string(),
            config.timestamp_tz_format.clone(),
        ),
        ("NLS_NUMERIC_CHARACTERS".to_string(), ".,".to_string()),
    ];
    vars.extend(
        config
            .session_vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );

    let assignments: Vec<String> = vars
        .iter()
        .map(|(option, value)| {
            let upper = option.to_uppercase();
            if IDENTIFIER_OPTIONS.contains(&upper.as_str()) {
                format!("{} = {}", upper, value)
            } else {
                format!("{} = {}", upper, quote_string(value))
            }
        })
        .collect();

    format!("ALTER SESSION SET {}", assignments.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_vars() {
        let config = OracleConfig::builder()
            .session_var("current_schema", "HR")
            .build()
            .unwrap();
        let sql = compile_session_vars(&config);
        assert!(sql.starts_with("ALTER SESSION SET NLS_TIME_FORMAT = 'HH24:MI:SS' "));
        assert!(sql.contains("NLS_DATE_FORMAT = 'YYYY-MM-DD HH24:MI:SS'"));
        assert!(sql.contains("NLS_TIMESTAMP_TZ_FORMAT = 'YYYY-MM-DD HH24:MI:SS TZH:TZM'"));
        assert!(sql.ends_with("CURRENT_SCHEMA = HR"));
    }
}
