use crate::error::CqlResult;
use crate::session::Session;
use std::time::Duration;

/// Estado del cursor. `LastPage` es terminal: no hay transición de vuelta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    HasMore(Vec<u8>),
    LastPage,
}

impl PageState {
    pub fn from_token(paging_state: Option<Vec<u8>>) -> Self {
        match paging_state {
            Some(token) => PageState::HasMore(token),
            None => PageState::LastPage,
        }
    }
}

/// Cursor de sólo avance sobre un resultado paginado por token.
pub trait PageCursor: Sized {
    fn page_state(&self) -> &PageState;

    fn has_next_page(&self) -> bool {
        matches!(self.page_state(), PageState::HasMore(_))
    }

    fn is_last_page(&self) -> bool {
        !self.has_next_page()
    }

    /// Pide la página siguiente con el token guardado. En la última página
    /// devuelve un cursor vacío y terminal, sin I/O.
    fn next_page(&self, session: &mut dyn Session, hint: Option<Duration>) -> CqlResult<Self>;
}
