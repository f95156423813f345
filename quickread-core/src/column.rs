use crate::{TableRef, Value};
use proc_macro2::TokenStream;
use quote::{ToTokens, TokenStreamExt, quote};
use std::borrow::Cow;

/// Fully qualified reference to a table column.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef {
    /// Column name.
    pub name: &'static str,
    /// Table name.
    pub table: &'static str,
    /// Schema name (may be empty).
    pub schema: &'static str,
}

impl ColumnRef {
    pub fn table(&self) -> TableRef {
        TableRef {
            name: Cow::Borrowed(self.table),
            schema: Cow::Borrowed(self.schema),
        }
    }
}

impl AsRef<str> for ColumnRef {
    fn as_ref(&self) -> &str {
        self.name
    }
}

/// Indicates how (or if) a column participates in the primary key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKeyType {
    /// Single-column primary key.
    PrimaryKey,
    /// Member of a composite primary key.
    PartOfPrimaryKey,
    /// Not part of the primary key.
    #[default]
    None,
}

impl PrimaryKeyType {
    pub fn is_key(&self) -> bool {
        !matches!(self, PrimaryKeyType::None)
    }
}

impl ToTokens for PrimaryKeyType {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        use PrimaryKeyType::*;
        tokens.append_all(match self {
            PrimaryKey => quote!(::quickread::PrimaryKeyType::PrimaryKey),
            PartOfPrimaryKey => quote!(::quickread::PrimaryKeyType::PartOfPrimaryKey),
            None => quote!(::quickread::PrimaryKeyType::None),
        });
    }
}

/// Declarative description of an entity column.
#[derive(Default, Debug)]
pub struct ColumnDef {
    /// Column identity.
    pub column_ref: ColumnRef,
    /// Explicit SQL type override (empty => infer from `value`).
    pub column_type: &'static str,
    /// Empty `Value` describing the column type.
    pub value: Value,
    /// Nullability flag.
    pub nullable: bool,
    /// Primary key participation.
    pub primary_key: PrimaryKeyType,
    /// Unique constraint (single column only).
    pub unique: bool,
    /// Optional human-readable comment.
    pub comment: &'static str,
}

impl ColumnDef {
    pub fn name(&self) -> &'static str {
        self.column_ref.name
    }
    pub fn table(&self) -> &'static str {
        self.column_ref.table
    }
    pub fn schema(&self) -> &'static str {
        self.column_ref.schema
    }
}

impl AsRef<str> for ColumnDef {
    fn as_ref(&self) -> &str {
        self.column_ref.name
    }
}

impl<'a> From<&'a ColumnDef> for &'a ColumnRef {
    fn from(value: &'a ColumnDef) -> Self {
        &value.column_ref
    }
}
