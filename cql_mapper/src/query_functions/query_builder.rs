use crate::error::CqlResult;
use crate::query_functions::condition::{Boolean, Condition, WhereClause};
use crate::query_functions::operator::Operator;
use crate::query_functions::query_options::QueryOptions;
use crate::value_functions::cql_value::CqlValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Función de agregación sobre una columna, ej: `count(*)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub function: String,
    pub column: String,
}

/// Estado de una consulta. Solo datos; el texto lo arma un `StatementCompiler`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    pub table: String,
    pub columns: Vec<String>,
    pub wheres: Vec<WhereClause>,
    pub orders: Vec<(String, Direction)>,
    pub limit: Option<usize>,
    pub groups: Vec<String>,
    pub joins: Vec<String>,
    pub aggregate: Option<Aggregate>,
    pub options: QueryOptions,
    pub for_page: Option<usize>,
}

impl QueryBuilder {
    pub fn table(table: &str) -> Self {
        QueryBuilder {
            table: table.to_string(),
            columns: vec![],
            wheres: vec![],
            orders: vec![],
            limit: None,
            groups: vec![],
            joins: vec![],
            aggregate: None,
            options: QueryOptions::default(),
            for_page: None,
        }
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    fn push_where(mut self, boolean: Boolean, condition: Condition) -> Self {
        self.wheres.push(WhereClause { boolean, condition });
        self
    }

    pub fn where_eq(self, column: &str, value: impl Into<CqlValue>) -> Self {
        self.push_where(
            Boolean::And,
            Condition::Basic {
                column: column.to_string(),
                operator: Operator::Equal,
                value: value.into(),
            },
        )
    }

    /// Condición con un operador en texto (`"="`, `">="`, ...).
    pub fn where_op(self, column: &str, operator: &str, value: impl Into<CqlValue>) -> CqlResult<Self> {
        let operator = Operator::parse(operator)?;
        Ok(self.push_where(
            Boolean::And,
            Condition::Basic {
                column: column.to_string(),
                operator,
                value: value.into(),
            },
        ))
    }

    pub fn where_in(self, column: &str, values: Vec<CqlValue>) -> Self {
        self.push_where(
            Boolean::And,
            Condition::In {
                column: column.to_string(),
                values,
            },
        )
    }

    pub fn where_contains(self, column: &str, value: impl Into<CqlValue>) -> Self {
        self.push_where(
            Boolean::And,
            Condition::Contains {
                column: column.to_string(),
                value: value.into(),
            },
        )
    }

    pub fn where_contains_key(self, column: &str, value: impl Into<CqlValue>) -> Self {
        self.push_where(
            Boolean::And,
            Condition::ContainsKey {
                column: column.to_string(),
                value: value.into(),
            },
        )
    }

    pub fn where_token(self, columns: &[&str], operator: Operator, values: Vec<CqlValue>) -> Self {
        self.push_where(
            Boolean::And,
            Condition::Token {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                operator,
                values,
            },
        )
    }

    /// Se acepta en el builder, pero el compilador lo rechaza: CQL no tiene `or`.
    pub fn or_where(self, column: &str, value: impl Into<CqlValue>) -> Self {
        self.push_where(
            Boolean::Or,
            Condition::Basic {
                column: column.to_string(),
                operator: Operator::Equal,
                value: value.into(),
            },
        )
    }

    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.orders.push((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn group_by(mut self, columns: &[&str]) -> Self {
        self.groups.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    /// Se acepta en el builder, pero el compilador lo rechaza: CQL no tiene joins.
    pub fn join(mut self, table: &str) -> Self {
        self.joins.push(table.to_string());
        self
    }

    pub fn allow_filtering(mut self, allow: bool) -> Self {
        self.options.allow_filtering = allow;
        self
    }

    pub fn ttl(mut self, seconds: u32) -> Self {
        self.options.ttl = Some(seconds);
        self
    }

    pub fn set_page_size(mut self, page_size: Option<i32>) -> Self {
        self.options.page_size = page_size;
        self
    }

    pub fn set_pagination_state_token(mut self, token: Option<Vec<u8>>) -> Self {
        self.options.paging_state = token;
        self
    }

    /// Página `page` (desde 1) con `per_page` filas por página.
    pub fn for_page(mut self, page: usize, per_page: i32) -> Self {
        self.for_page = Some(page);
        self.set_page_size(Some(per_page))
    }

    pub fn aggregate(mut self, function: &str, column: &str) -> Self {
        self.aggregate = Some(Aggregate {
            function: function.to_string(),
            column: column.to_string(),
        });
        self
    }

    /// Bindings del where, en el orden en que aparecen los `?`.
    pub fn where_bindings(&self) -> Vec<CqlValue> {
        self.wheres
            .iter()
            .flat_map(|clause| clause.condition.bindings())
            .collect()
    }
}
