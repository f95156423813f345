use quickread_core::{Driver, GenericSqlWriter};

/// Driver of process local tables. Queries are evaluated directly, the SQL
/// text is rendered only to keep a history of what ran.
#[derive(Clone, Copy, Default, Debug)]
pub struct MemoryDriver;

impl MemoryDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for MemoryDriver {
    type SqlWriter = GenericSqlWriter;
    const NAME: &'static str = "memory";
    fn sql_writer(&self) -> Self::SqlWriter {
        GenericSqlWriter::new()
    }
}
