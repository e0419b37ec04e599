//! Parser for the MySQL dump fixtures.
//!
//! Reads `INSERT INTO \`table\` VALUES (...),(...);` blobs straight from the
//! dump text, so loading the fixture data needs no MySQL server. Record and
//! field splitting are quote-aware state machines: commas and parentheses
//! inside string literals must not split anything.

#[cfg(test)]
mod tests;

use crate::models::{Client, Gender, Product};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("INSERT statement for `{0}` is not terminated by ';'")]
    UnterminatedInsert(String),
    #[error("record is not parenthesized: {0}")]
    MalformedRecord(String),
    #[error("table `{table}`: record has {got} fields, expected {expected}")]
    ColumnCount {
        table: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("table `{table}`, column `{column}`: unexpected literal {literal:?}")]
    BadLiteral {
        table: &'static str,
        column: &'static str,
        literal: String,
    },
}

/// A typed SQL literal from a VALUES tuple.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlLiteral {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
}

impl SqlLiteral {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlLiteral::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlLiteral::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlLiteral::Float(f) => Some(*f),
            SqlLiteral::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// String form of the literal; integers and floats stringify the way
    /// identifiers in the dumps are used (ids become document ids).
    pub fn as_string(&self) -> Option<String> {
        match self {
            SqlLiteral::Str(s) => Some(s.clone()),
            SqlLiteral::Int(i) => Some(i.to_string()),
            SqlLiteral::Float(f) => Some(f.to_string()),
            SqlLiteral::Null => None,
        }
    }
}

/// Splits a `(...),(...),(...)` values blob into one string per record,
/// parentheses included. Commas inside string literals never split.
fn split_records(values_blob: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut depth = 0usize;
    let mut in_str = false;
    let mut esc = false;

    for ch in values_blob.chars() {
        buf.push(ch);

        if in_str {
            if esc {
                esc = false;
                continue;
            }
            match ch {
                '\\' => esc = true,
                '\'' => in_str = false,
                _ => {}
            }
        } else {
            match ch {
                '\'' => in_str = true,
                '(' => depth += 1,
                ')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        parts.push(buf.trim().to_string());
                        buf.clear();
                    }
                }
                // only a depth-0 comma separates records
                ',' if depth == 0 => buf.clear(),
                _ => {}
            }
        }
    }

    parts
}

/// Splits a single `(a,'b',NULL,3.14)` record into raw field literals,
/// quotes preserved for later typing.
fn split_fields(record: &str) -> Result<Vec<String>, DumpError> {
    let inner = record
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| DumpError::MalformedRecord(record.to_string()))?;

    let mut fields = Vec::new();
    let mut buf = String::new();
    let mut in_str = false;
    let mut esc = false;

    for ch in inner.chars() {
        if in_str {
            buf.push(ch);
            if esc {
                esc = false;
                continue;
            }
            match ch {
                '\\' => esc = true,
                '\'' => in_str = false,
                _ => {}
            }
        } else {
            match ch {
                '\'' => {
                    in_str = true;
                    buf.push(ch);
                }
                ',' => {
                    fields.push(buf.trim().to_string());
                    buf.clear();
                }
                _ => buf.push(ch),
            }
        }
    }
    if !buf.is_empty() {
        fields.push(buf.trim().to_string());
    }

    Ok(fields)
}

/// Decodes the MySQL string escapes (`\0 \b \n \r \t \Z \\ \' \"`), leaving
/// everything else untouched.
fn mysql_unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.peek() {
            Some('0') => {
                out.push('\0');
                chars.next();
            }
            Some('b') => {
                out.push('\u{8}');
                chars.next();
            }
            Some('n') => {
                out.push('\n');
                chars.next();
            }
            Some('r') => {
                out.push('\r');
                chars.next();
            }
            Some('t') => {
                out.push('\t');
                chars.next();
            }
            Some('Z') => {
                out.push('\u{1a}');
                chars.next();
            }
            Some('\\') => {
                out.push('\\');
                chars.next();
            }
            Some('\'') => {
                out.push('\'');
                chars.next();
            }
            Some('"') => {
                out.push('"');
                chars.next();
            }
            _ => out.push('\\'),
        }
    }
    out
}

/// Types a raw field literal: `NULL`, quoted string, integer, float.
/// Anything else stays a string, matching how MySQL dumps quote values.
fn parse_literal(lit: &str) -> SqlLiteral {
    if lit.eq_ignore_ascii_case("NULL") {
        return SqlLiteral::Null;
    }
    if lit.len() >= 2 && lit.starts_with('\'') && lit.ends_with('\'') {
        return SqlLiteral::Str(mysql_unescape(&lit[1..lit.len() - 1]));
    }
    if lit.contains('.') {
        if let Ok(f) = lit.parse::<f64>() {
            return SqlLiteral::Float(f);
        }
    } else if let Ok(i) = lit.parse::<i64>() {
        return SqlLiteral::Int(i);
    }
    SqlLiteral::Str(lit.to_string())
}

/// Collects every record of every `INSERT INTO \`table\` VALUES ...;`
/// statement in the dump. A dump without such statements yields no rows.
pub fn extract_values(sql: &str, table: &str) -> Result<Vec<Vec<SqlLiteral>>, DumpError> {
    let needle = format!("INSERT INTO `{}` VALUES", table);
    let mut results = Vec::new();
    let mut start = 0;

    while let Some(rel) = sql[start..].find(&needle) {
        let idx = start + rel;
        let after = idx + needle.len();
        let semi = sql[after..]
            .find(';')
            .map(|i| after + i)
            .ok_or_else(|| DumpError::UnterminatedInsert(table.to_string()))?;

        let values_blob = sql[after..semi].trim();
        for record in split_records(values_blob) {
            let fields = split_fields(&record)?;
            results.push(fields.iter().map(|f| parse_literal(f)).collect());
        }
        start = semi + 1;
    }

    Ok(results)
}

const CLIENT_COLUMNS: usize = 6;
const PRODUCT_COLUMNS: usize = 6;

fn expect_columns(
    table: &'static str,
    fields: &[SqlLiteral],
    expected: usize,
) -> Result<(), DumpError> {
    if fields.len() != expected {
        return Err(DumpError::ColumnCount {
            table,
            expected,
            got: fields.len(),
        });
    }
    Ok(())
}

fn bad_literal(table: &'static str, column: &'static str, lit: &SqlLiteral) -> DumpError {
    DumpError::BadLiteral {
        table,
        column,
        literal: format!("{:?}", lit),
    }
}

/// Maps `client` rows `(client_id, name, gender, age, username, password)`
/// to `(document id, Client)` pairs.
pub fn clients_from_dump(sql: &str) -> Result<Vec<(String, Client)>, DumpError> {
    const TABLE: &str = "client";
    let mut out = Vec::new();

    for fields in extract_values(sql, TABLE)? {
        expect_columns(TABLE, &fields, CLIENT_COLUMNS)?;

        let id = fields[0]
            .as_string()
            .ok_or_else(|| bad_literal(TABLE, "client_id", &fields[0]))?;
        let name = fields[1]
            .as_string()
            .ok_or_else(|| bad_literal(TABLE, "name", &fields[1]))?;
        let gender = match fields[2].as_string().as_deref() {
            Some("F") => Gender::F,
            Some("M") => Gender::M,
            _ => return Err(bad_literal(TABLE, "gender", &fields[2])),
        };
        let age = fields[3]
            .as_i64()
            .ok_or_else(|| bad_literal(TABLE, "age", &fields[3]))?;
        let username = fields[4]
            .as_string()
            .ok_or_else(|| bad_literal(TABLE, "username", &fields[4]))?;
        let password = fields[5]
            .as_string()
            .ok_or_else(|| bad_literal(TABLE, "password", &fields[5]))?;

        out.push((
            id,
            Client {
                name,
                gender,
                age,
                username,
                password,
                created_at: None,
                updated_at: None,
            },
        ));
    }

    Ok(out)
}

/// Maps `product` rows
/// `(product_id, order_no, product_name, description, price_min, price_max)`
/// to `(document id, Product)` pairs.
pub fn products_from_dump(sql: &str) -> Result<Vec<(String, Product)>, DumpError> {
    const TABLE: &str = "product";
    let mut out = Vec::new();

    for fields in extract_values(sql, TABLE)? {
        expect_columns(TABLE, &fields, PRODUCT_COLUMNS)?;

        let id = fields[0]
            .as_string()
            .ok_or_else(|| bad_literal(TABLE, "product_id", &fields[0]))?;
        let order_no = fields[1]
            .as_string()
            .ok_or_else(|| bad_literal(TABLE, "order_no", &fields[1]))?;
        let product_name = fields[2]
            .as_string()
            .ok_or_else(|| bad_literal(TABLE, "product_name", &fields[2]))?;
        let description = fields[3].as_string();
        let price_min = fields[4]
            .as_f64()
            .ok_or_else(|| bad_literal(TABLE, "price_min", &fields[4]))?;
        let price_max = if fields[5].is_null() {
            None
        } else {
            Some(
                fields[5]
                    .as_f64()
                    .ok_or_else(|| bad_literal(TABLE, "price_max", &fields[5]))?,
            )
        };

        out.push((
            id,
            Product {
                order_no,
                product_name,
                description,
                price_min,
                price_max,
                created_at: None,
                updated_at: None,
            },
        ));
    }

    Ok(out)
}
