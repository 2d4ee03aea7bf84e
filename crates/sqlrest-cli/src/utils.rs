use std::{
    fmt::Display,
    sync::atomic::{AtomicBool, Ordering},
};

use miette::{miette, IntoDiagnostic, Result, WrapErr};
use nu_ansi_term::Color;
use sqlrest_core::{ChainedQuery, FilterOp};
use ureq::http::{HeaderMap, HeaderName, HeaderValue};

pub static COLOR: AtomicBool = AtomicBool::new(true);

pub struct Colored<T: Display>(pub Color, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if COLOR.load(Ordering::Relaxed) {
            write!(f, "{}", self.0.prefix())?;
            self.1.fmt(f)?;
            write!(f, "{}", self.0.suffix())
        } else {
            self.1.fmt(f)
        }
    }
}

/// A `--where` argument.
#[derive(Debug, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

/// Parses `field=value` or `field=$op.value` (`field=$null` for value-less operators).
pub fn parse_filter(arg: &str) -> Result<Filter> {
    let (field, rest) = arg
        .split_once('=')
        .ok_or_else(|| miette!("Invalid filter '{arg}', expected field=value"))?;

    if field.is_empty() {
        return Err(miette!("Invalid filter '{arg}', field name is empty"));
    }

    let (op, value) = match rest.strip_prefix('$') {
        Some(expr) => {
            let (token, value) = expr.split_once('.').unwrap_or((expr, ""));
            let op = FilterOp::from_token(token)
                .ok_or_else(|| miette!("Unknown operator '${token}' in filter '{arg}'"))?;
            (op, value)
        }
        None => (FilterOp::Eq, rest),
    };

    Ok(Filter {
        field: field.to_string(),
        op,
        value: value.to_string(),
    })
}

pub fn apply_filters(mut query: ChainedQuery, filters: &[String]) -> Result<ChainedQuery> {
    for arg in filters {
        let filter = parse_filter(arg)?;
        query = query.filter(filter.field, filter.op, filter.value);
    }
    Ok(query)
}

/// Parses `key=value`.
pub fn parse_param(arg: &str) -> Result<(&str, &str)> {
    arg.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| miette!("Invalid parameter '{arg}', expected key=value"))
}

/// Parses `Name: value` header arguments.
pub fn parse_headers(args: &[String]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for arg in args {
        let (key, value) = arg
            .split_once(':')
            .ok_or_else(|| miette!("Invalid header '{arg}', expected 'Name: value'"))?;
        let name: HeaderName = key
            .trim()
            .parse()
            .into_diagnostic()
            .wrap_err_with(|| format!("Invalid header name '{}'", key.trim()))?;
        let value: HeaderValue = value
            .trim()
            .parse()
            .into_diagnostic()
            .wrap_err_with(|| format!("Invalid value for header '{name}'"))?;
        headers.append(name, value);
    }
    Ok(headers)
}
