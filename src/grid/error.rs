/// Errors that can occur during grid store operations
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("pharmacy node already exists: {0}")]
    DuplicateNode(String),

    #[error("pharmacy node not found: {0}")]
    NodeNotFound(String),

    #[error("order not found: {0}")]
    OrderNotFound(String),
}
