// grammar.rs
use crate::error::{CqlResult, ErrorType};
use crate::query_functions::{
    condition::{Boolean, Condition},
    query_builder::QueryBuilder,
    statement::{Record, Statement},
};
use crate::value_functions::cql_value::CqlValue;

/// Traduce el estado de un `QueryBuilder` a texto CQL con sus bindings.
pub trait StatementCompiler {
    fn table_prefix(&self) -> &str;

    fn compile_select(&self, query: &QueryBuilder) -> CqlResult<Statement>;

    /// Una sentencia por fila; una sola fila es un batch de un elemento.
    fn compile_insert(&self, query: &QueryBuilder, rows: &[Record]) -> CqlResult<Vec<Statement>>;

    fn compile_update(&self, query: &QueryBuilder, values: &Record) -> CqlResult<Statement>;

    fn compile_delete(&self, query: &QueryBuilder) -> CqlResult<Statement>;

    /// `select count(*) as aggregate from ...`
    fn compile_count(&self, query: &QueryBuilder) -> CqlResult<Statement> {
        let query = query.clone().aggregate("count", "*");
        self.compile_select(&query)
    }

    /// Envuelve un identificador entre comillas dobles. `*` queda tal cual.
    fn wrap(&self, value: &str) -> String {
        if let Some((column, alias)) = split_alias(value) {
            return format!("{} as {}", self.wrap(column), self.wrap_segment(alias));
        }
        value
            .split('.')
            .map(|segment| self.wrap_segment(segment))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn wrap_segment(&self, segment: &str) -> String {
        let segment = segment.trim();
        if segment == "*" {
            return segment.to_string();
        }
        format!("\"{}\"", segment.replace('"', "\"\""))
    }

    /// Igual que `wrap`, pero agrega el prefijo de tablas configurado.
    fn wrap_table(&self, table: &str) -> String {
        match table.rsplit_once('.') {
            Some((keyspace, name)) => format!(
                "{}.{}",
                self.wrap_segment(keyspace),
                self.wrap_segment(&format!("{}{}", self.table_prefix(), name))
            ),
            None => self.wrap_segment(&format!("{}{}", self.table_prefix(), table)),
        }
    }

    fn columnize(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|column| self.wrap(column))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn split_alias(value: &str) -> Option<(&str, &str)> {
    value
        .find(" as ")
        .or_else(|| value.find(" AS "))
        .map(|index| (&value[..index], &value[index + 4..]))
}

fn parameterize(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Compilador de CQL para Cassandra / ScyllaDB.
#[derive(Debug, Clone, Default)]
pub struct CqlGrammar {
    prefix: String,
}

impl CqlGrammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table_prefix(prefix: &str) -> Self {
        CqlGrammar {
            prefix: prefix.to_string(),
        }
    }

    fn reject_joins(&self, query: &QueryBuilder) -> CqlResult<()> {
        if query.joins.is_empty() {
            Ok(())
        } else {
            Err(ErrorType::UnsupportedFeature(format!(
                "joins are not supported in CQL (join with {})",
                query.joins.join(", ")
            )))
        }
    }

    fn compile_ttl(&self, query: &QueryBuilder) -> String {
        match query.options.effective_ttl() {
            Some(ttl) => format!("using ttl {}", ttl),
            None => String::new(),
        }
    }

    fn compile_columns(&self, query: &QueryBuilder) -> String {
        if let Some(aggregate) = &query.aggregate {
            let column = if aggregate.column == "*" {
                "*".to_string()
            } else {
                self.wrap(&aggregate.column)
            };
            return format!("select {}({}) as aggregate", aggregate.function, column);
        }
        if query.columns.is_empty() {
            return "select *".to_string();
        }
        format!("select {}", self.columnize(&query.columns))
    }

    fn compile_condition(&self, condition: &Condition) -> CqlResult<String> {
        let compiled = match condition {
            Condition::Basic {
                column,
                operator,
                ..
            } => format!("{} {} ?", self.wrap(column), operator.as_str()),
            Condition::In { column, values } => {
                // `in ()` no es CQL válido
                if values.is_empty() {
                    return Err(ErrorType::InvalidQuery(format!(
                        "where in on {} needs at least one value",
                        column
                    )));
                }
                format!("{} in ({})", self.wrap(column), parameterize(values.len()))
            }
            Condition::Contains { column, .. } => format!("{} contains ?", self.wrap(column)),
            Condition::ContainsKey { column, .. } => {
                format!("{} contains key ?", self.wrap(column))
            }
            Condition::Token {
                columns,
                operator,
                values,
            } => format!(
                "token({}) {} token({})",
                self.columnize(columns),
                operator.as_str(),
                parameterize(values.len())
            ),
        };
        Ok(compiled)
    }

    fn compile_wheres(&self, query: &QueryBuilder) -> CqlResult<String> {
        if query.wheres.is_empty() {
            return Ok(String::new());
        }
        if query.wheres.iter().any(|w| w.boolean == Boolean::Or) {
            return Err(ErrorType::UnsupportedFeature(
                "or conditions are not supported in CQL".to_string(),
            ));
        }
        let conditions = query
            .wheres
            .iter()
            .map(|clause| self.compile_condition(&clause.condition))
            .collect::<CqlResult<Vec<_>>>()?;
        Ok(format!("where {}", conditions.join(" and ")))
    }

    fn compile_orders(&self, query: &QueryBuilder) -> String {
        if query.orders.is_empty() {
            return String::new();
        }
        let orders: Vec<String> = query
            .orders
            .iter()
            .map(|(column, direction)| format!("{} {}", self.wrap(column), direction.as_str()))
            .collect();
        format!("order by {}", orders.join(", "))
    }

    fn compile_groups(&self, query: &QueryBuilder) -> String {
        if query.groups.is_empty() {
            String::new()
        } else {
            format!("group by {}", self.columnize(&query.groups))
        }
    }
}

// Une los componentes no vacíos con un espacio.
fn concatenate(components: &[String]) -> String {
    components
        .iter()
        .filter(|c| !c.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

impl StatementCompiler for CqlGrammar {
    fn table_prefix(&self) -> &str {
        &self.prefix
    }

    fn compile_select(&self, query: &QueryBuilder) -> CqlResult<Statement> {
        self.reject_joins(query)?;
        // Mismo orden de componentes que el select de SQL, con ALLOW FILTERING al final
        let components = [
            self.compile_columns(query),
            format!("from {}", self.wrap_table(&query.table)),
            self.compile_wheres(query)?,
            self.compile_orders(query),
            query
                .limit
                .map(|limit| format!("limit {}", limit))
                .unwrap_or_default(),
            self.compile_groups(query),
            if query.options.allow_filtering {
                "ALLOW FILTERING".to_string()
            } else {
                String::new()
            },
        ];
        Ok(Statement::new(
            concatenate(&components),
            query.where_bindings(),
        ))
    }

    fn compile_insert(&self, query: &QueryBuilder, rows: &[Record]) -> CqlResult<Vec<Statement>> {
        self.reject_joins(query)?;
        let first = match rows.first() {
            Some(first) => first,
            None => return Ok(vec![]),
        };
        let columns: Vec<String> = first.keys().cloned().collect();
        let table = self.wrap_table(&query.table);
        let ttl = self.compile_ttl(query);

        rows.iter()
            .map(|row| {
                if !row.keys().eq(first.keys()) {
                    return Err(ErrorType::InvalidQuery(format!(
                        "every inserted row must have the columns {:?}",
                        columns
                    )));
                }
                let text = concatenate(&[
                    format!(
                        "insert into {} ({}) values ({})",
                        table,
                        self.columnize(&columns),
                        parameterize(columns.len())
                    ),
                    ttl.clone(),
                ]);
                Ok(Statement::new(text, row.values().cloned().collect()))
            })
            .collect()
    }

    fn compile_update(&self, query: &QueryBuilder, values: &Record) -> CqlResult<Statement> {
        self.reject_joins(query)?;
        if values.is_empty() {
            return Err(ErrorType::InvalidQuery(
                "update without columns to set".to_string(),
            ));
        }
        let columns: Vec<String> = values
            .keys()
            .map(|column| format!("{} = ?", self.wrap(column)))
            .collect();
        let text = concatenate(&[
            format!("update {}", self.wrap_table(&query.table)),
            self.compile_ttl(query),
            format!("set {}", columns.join(", ")),
            self.compile_wheres(query)?,
        ]);

        let mut bindings: Vec<CqlValue> = values.values().cloned().collect();
        bindings.extend(query.where_bindings());
        Ok(Statement::new(text, bindings))
    }

    fn compile_delete(&self, query: &QueryBuilder) -> CqlResult<Statement> {
        self.reject_joins(query)?;
        let text = concatenate(&[
            format!("delete from {}", self.wrap_table(&query.table)),
            self.compile_wheres(query)?,
        ]);
        Ok(Statement::new(text, query.where_bindings()))
    }
}
