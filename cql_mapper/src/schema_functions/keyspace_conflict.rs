/// Qué hacer cuando el keyspace a crear ya existe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyspaceConflict {
    DropAndRecreate,
    Keep,
}

/// Resultado de `create_keyspace_or_resolve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyspaceStatus {
    Created,
    Recreated,
    Kept,
}
