use crate::query_functions::query_builder::Direction;

/// Opciones de almacenamiento de `create table ... with ...`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WithOption {
    orders: Vec<(String, Direction)>,
    attributes: Vec<(String, String)>,
}

impl WithOption {
    pub fn order_by(&mut self, column: &str, direction: Direction) -> &mut Self {
        self.orders.push((column.to_string(), direction));
        self
    }

    /// Atributo crudo, ej: `attribute("gc_grace_seconds", "0")`.
    pub fn attribute(&mut self, key: &str, value: &str) -> &mut Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty() && self.attributes.is_empty()
    }

    pub fn compile(&self, wrap: impl Fn(&str) -> String) -> String {
        if self.is_empty() {
            return String::new();
        }
        let mut parts = vec![];
        if !self.orders.is_empty() {
            let orders: Vec<String> = self
                .orders
                .iter()
                .map(|(column, direction)| format!("{} {}", wrap(column), direction.as_str()))
                .collect();
            parts.push(format!("clustering order by ({})", orders.join(", ")));
        }
        parts.extend(
            self.attributes
                .iter()
                .map(|(key, value)| format!("{}={}", key, value)),
        );
        format!("with {}", parts.join(" AND "))
    }
}
