//! Internal representation of query-string clauses.
//!
//! These types are used by [`super::ChainedQuery`] and are not part of the public API.
//! A clause keeps its raw parts; encoding happens when it is rendered.

use std::fmt;

use super::{
    encode::encode_component,
    ops::{Aggregate, FilterOp, JoinKind, Renderer},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Clause {
    Page(u64),
    PageSize(u64),
    Select(String),
    Count(String),
    CountFirst(bool),
    Distinct(bool),
    Renderer(Renderer),
    Order(String),
    GroupBy(String),
    Filter {
        field: String,
        op: FilterOp,
        value: String,
    },
    Join {
        kind: JoinKind,
        table: String,
        local: String,
        op: FilterOp,
        foreign: String,
    },
    Jsonb {
        field: String,
        path: String,
        value: String,
    },
    TextSearch {
        field: String,
        query: String,
        language: Option<String>,
    },
    Having {
        func: Aggregate,
        field: String,
        op: FilterOp,
        value: String,
    },
    Param {
        key: String,
        value: String,
    },
}

impl Clause {
    pub fn is_select(&self) -> bool {
        matches!(self, Clause::Select(_))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Page(n) => write!(f, "_page={n}"),
            Clause::PageSize(n) => write!(f, "_page_size={n}"),
            Clause::Select(fields) => write!(f, "_select={fields}"),
            Clause::Count(field) => write!(f, "_count={field}"),
            Clause::CountFirst(flag) => write!(f, "_count_first={flag}"),
            Clause::Distinct(flag) => write!(f, "_distinct={flag}"),
            Clause::Renderer(mode) => write!(f, "_renderer={mode}"),
            Clause::Order(fields) => write!(f, "_order={fields}"),
            Clause::GroupBy(fields) => write!(f, "_groupby={fields}"),
            Clause::Filter {
                field,
                op,
                value,
            } => {
                match op {
                    FilterOp::Eq => write!(f, "{field}={}", encode_component(value)),
                    FilterOp::Null | FilterOp::NotNull => write!(f, "{field}={op}"),
                    op if !op.encodes_value() => write!(f, "{field}={op}.{value}"),
                    op => write!(f, "{field}={op}.{}", encode_component(value)),
                }
            }
            Clause::Join {
                kind,
                table,
                local,
                op,
                foreign,
            } => write!(f, "_join={kind}:{table}:{local}:{op}:{foreign}"),
            Clause::Jsonb {
                field,
                path,
                value,
            } => write!(f, "{field}->>{path}:jsonb={}", encode_component(value)),
            Clause::TextSearch {
                field,
                query,
                language,
            } => {
                match language {
                    Some(lang) => {
                        write!(f, "{field}${lang}:tsquery={}", encode_component(query))
                    }
                    None => write!(f, "{field}:tsquery={}", encode_component(query)),
                }
            }
            Clause::Having {
                func,
                field,
                op,
                value,
            } => write!(f, "having:{func}:{field}:{op}:{value}"),
            Clause::Param {
                key,
                value,
            } => write!(f, "{key}={}", encode_component(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(field: &str, op: FilterOp, value: &str) -> Clause {
        Clause::Filter {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    #[test]
    fn test_directives() {
        assert_eq!(Clause::Page(2).to_string(), "_page=2");
        assert_eq!(Clause::PageSize(50).to_string(), "_page_size=50");
        assert_eq!(Clause::Count("*".into()).to_string(), "_count=*");
        assert_eq!(Clause::CountFirst(true).to_string(), "_count_first=true");
        assert_eq!(Clause::Distinct(false).to_string(), "_distinct=false");
        assert_eq!(Clause::Renderer(Renderer::Xml).to_string(), "_renderer=xml");
        assert_eq!(Clause::Order("name,-id".into()).to_string(), "_order=name,-id");
    }

    #[test]
    fn test_filters() {
        assert_eq!(filter("name", FilterOp::Eq, "a b").to_string(), "name=a%20b");
        assert_eq!(filter("age", FilterOp::Gt, "18").to_string(), "age=$gt.18");
        assert_eq!(filter("x", FilterOp::In, "1,2,3").to_string(), "x=$in.1,2,3");
        assert_eq!(filter("x", FilterOp::NotIn, "a b,c").to_string(), "x=$nin.a b,c");
        assert_eq!(filter("deleted", FilterOp::Null, "").to_string(), "deleted=$null");
        assert_eq!(filter("deleted", FilterOp::NotNull, "").to_string(), "deleted=$notnull");
        assert_eq!(filter("name", FilterOp::ILike, "%jo%").to_string(), "name=$ilike.%25jo%25");
    }

    #[test]
    fn test_join() {
        let clause = Clause::Join {
            kind: JoinKind::Inner,
            table: "users".into(),
            local: "friends.userid".into(),
            op: FilterOp::Eq,
            foreign: "users.userid".into(),
        };
        assert_eq!(clause.to_string(), "_join=inner:users:friends.userid:$eq:users.userid");
    }

    #[test]
    fn test_jsonb_and_text_search() {
        let jsonb = Clause::Jsonb {
            field: "data".into(),
            path: "owner".into(),
            value: "ann lee".into(),
        };
        assert_eq!(jsonb.to_string(), "data->>owner:jsonb=ann%20lee");

        let search = Clause::TextSearch {
            field: "body".into(),
            query: "fat & rat".into(),
            language: Some("english".into()),
        };
        assert_eq!(search.to_string(), "body$english:tsquery=fat%20%26%20rat");

        let search = Clause::TextSearch {
            field: "body".into(),
            query: "fat".into(),
            language: None,
        };
        assert_eq!(search.to_string(), "body:tsquery=fat");
    }

    #[test]
    fn test_having_value_is_raw() {
        let clause = Clause::Having {
            func: Aggregate::Sum,
            field: "price".into(),
            op: FilterOp::Gt,
            value: "500".into(),
        };
        assert_eq!(clause.to_string(), "having:sum:price:$gt:500");
    }

    #[test]
    fn test_param_is_encoded() {
        let clause = Clause::Param {
            key: "name".into(),
            value: "o'neil & co".into(),
        };
        assert_eq!(clause.to_string(), "name=o'neil%20%26%20co");
    }
}
