use crate::SqlWriter;

/// Backend family an [`Executor`](crate::Executor) talks to.
pub trait Driver {
    type SqlWriter: SqlWriter;

    /// Human readable name of the backend.
    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}
