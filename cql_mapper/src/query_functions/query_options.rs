use crate::message_functions::consistency::Consistency;
use std::time::Duration;

/// Opciones de un pedido. Nunca se persisten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub allow_filtering: bool,
    pub ttl: Option<u32>, // segundos
    pub page_size: Option<i32>,
    pub paging_state: Option<Vec<u8>>,
    pub consistency: Option<Consistency>,
    pub timeout: Option<Duration>,
}

impl QueryOptions {
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_paging_state(mut self, paging_state: Option<Vec<u8>>) -> Self {
        self.paging_state = paging_state;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        if timeout.is_some() {
            self.timeout = timeout;
        }
        self
    }

    /// TTL efectivo: cero equivale a no tener TTL.
    pub fn effective_ttl(&self) -> Option<u32> {
        self.ttl.filter(|ttl| *ttl > 0)
    }
}
