use crate::decode_column::{ColumnMetadata, decode_column};
use convert_case::{Case, Casing};
use quickread_core::{PrimaryKeyType, matches_path};
use quote::ToTokens;
use syn::{
    Error, Expr, ExprLit, ExprPath, Fields, Ident, ItemStruct, Lit, LitStr, Result,
    parse::ParseBuffer,
};

pub(crate) struct TableMetadata {
    pub(crate) item: ItemStruct,
    pub(crate) name: String,
    pub(crate) schema: String,
    /// Mapped columns, in declaration order.
    pub(crate) columns: Vec<ColumnMetadata>,
    /// Fields left out of the mapping.
    pub(crate) ignored: Vec<Ident>,
    /// Indexes into `columns`.
    pub(crate) primary_key: Vec<usize>,
}

fn decode_set_columns(item: &ItemStruct, columns: &[ColumnMetadata], col: &Expr) -> Result<Vec<usize>> {
    Ok(match col {
        Expr::Lit(ExprLit {
            lit: Lit::Str(v), ..
        }) => {
            let name = v.value();
            let Some(i) = columns.iter().position(|c| c.name == name) else {
                return Err(Error::new_spanned(
                    v,
                    format!("Column `{}` does not exist in the table", name),
                ));
            };
            vec![i]
        }
        Expr::Path(ExprPath { path, .. }) => {
            let Some(i) = columns.iter().position(|c| {
                let c = c.ident.to_string();
                matches_path(path, &["Self", &c]) || matches_path(path, &[&item.ident.to_string(), &c])
            }) else {
                return Err(Error::new_spanned(
                    path,
                    format!("Field `{}` does not exist in the entity", path.to_token_stream()),
                ));
            };
            vec![i]
        }
        Expr::Tuple(tuple) => {
            let mut result = Vec::with_capacity(tuple.elems.len());
            for elem in &tuple.elems {
                if matches!(elem, Expr::Tuple(..)) {
                    return Err(Error::new_spanned(
                        elem,
                        "Fields list inside tuple must either be a string literal column name or a column reference path",
                    ));
                }
                result.extend(decode_set_columns(item, columns, elem)?);
            }
            result
        }
        Expr::Paren(paren) => decode_set_columns(item, columns, &paren.expr)?,
        _ => {
            return Err(Error::new_spanned(
                col,
                "Expected a column name, a field path or a tuple of them",
            ));
        }
    })
}

pub(crate) fn decode_table(item: ItemStruct) -> Result<TableMetadata> {
    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &item.generics,
            "Entity cannot be derived for generic structs",
        ));
    }
    let Fields::Named(fields) = &item.fields else {
        return Err(Error::new_spanned(
            &item.ident,
            "Entity can only be derived for structs with named fields",
        ));
    };
    let mut columns = Vec::with_capacity(fields.named.len());
    let mut ignored = Vec::new();
    for field in &fields.named {
        let column = decode_column(field)?;
        if column.ignore {
            ignored.push(column.ident);
        } else {
            columns.push(column);
        }
    }
    let mut name = item.ident.to_string().to_case(Case::Snake);
    if name.starts_with('_') {
        name.remove(0);
    }
    let mut schema = String::new();
    let mut primary_key = Vec::new();
    for attr in &item.attrs {
        if !attr.path().is_ident("quickread") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                let value = arg.value().and_then(ParseBuffer::parse::<LitStr>).map_err(|e| {
                    arg.error(format!(
                        "Error while parsing `name`, use it like: `#[quickread(name = \"my_table\")]`: {e}"
                    ))
                })?;
                name = value.value();
            } else if arg.path.is_ident("schema") {
                let value = arg.value().and_then(ParseBuffer::parse::<LitStr>).map_err(|e| {
                    arg.error(format!(
                        "Error while parsing `schema`, use it like: `#[quickread(schema = \"my_schema\")]`: {e}"
                    ))
                })?;
                schema = value.value();
            } else if arg.path.is_ident("primary_key") {
                if !primary_key.is_empty() {
                    return Err(arg.error("Primary key attribute can appear just once on a table"));
                }
                let value = arg.value().and_then(ParseBuffer::parse::<Expr>)?;
                primary_key = decode_set_columns(&item, &columns, &value)?;
            } else {
                return Err(arg.error("Unknown attribute inside quickread macro"));
            }
            Ok(())
        })?;
    }
    if primary_key.is_empty() {
        primary_key = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.primary_key.is_key())
            .map(|(i, _)| i)
            .collect();
    } else if let Some(column) = columns.iter().find(|c| c.primary_key.is_key()) {
        return Err(Error::new_spanned(
            &column.ident,
            format!(
                "Column `{}` cannot be declared as a primary key while the table also specifies one",
                column.name
            ),
        ));
    }
    let key_type = if primary_key.len() == 1 {
        PrimaryKeyType::PrimaryKey
    } else {
        PrimaryKeyType::PartOfPrimaryKey
    };
    for &i in &primary_key {
        columns[i].primary_key = key_type;
        columns[i].nullable = false;
    }
    Ok(TableMetadata {
        item,
        name,
        schema,
        columns,
        ignored,
        primary_key,
    })
}
