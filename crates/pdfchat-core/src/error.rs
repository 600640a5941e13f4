use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("message is empty")]
    EmptyMessage,
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("no document loaded")]
    NoDocument,

    #[error("placeholder target is empty")]
    EmptyTarget,

    #[error("not an edit link: {0}")]
    InvalidLink(String),
}
