mod decode_column;
mod decode_table;
mod encode_column_def;
mod from_row;

use decode_table::{TableMetadata, decode_table};
use encode_column_def::encode_column_def;
use from_row::from_row;
use proc_macro::TokenStream;
use quickread_core::TableRef;
use quote::quote;
use std::borrow::Cow;
use syn::{ItemStruct, parse_macro_input};

/// Implements `Entity` for a struct with named fields.
///
/// Struct attributes: `#[quickread(name = "..", schema = "..", primary_key = ("a", "b"))]`.
/// Field attributes: `#[quickread(name = "..", type = "..", primary_key, unique, ignore)]`.
#[proc_macro_derive(Entity, attributes(quickread))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    match decode_table(item) {
        Ok(table) => entity_impl(&table).into(),
        Err(error) => error.to_compile_error().into(),
    }
}

fn entity_impl(table: &TableMetadata) -> proc_macro2::TokenStream {
    let item = &table.item;
    let name = &item.ident;
    let table_ref = TableRef {
        name: Cow::Owned(table.name.clone()),
        schema: Cow::Owned(table.schema.clone()),
    };
    let columns_defs = table.columns.iter().map(|c| encode_column_def(table, c));
    let primary_key_defs = table
        .primary_key
        .iter()
        .map(|i| quote!(&<#name as ::quickread::Entity>::columns()[#i]));
    let labels = table.columns.iter().map(|c| &c.name);
    let fields = table.columns.iter().map(|c| &c.ident);
    let from_row = from_row(table);
    quote! {
        impl ::quickread::Entity for #name {
            fn table() -> &'static ::quickread::TableRef {
                static TABLE_REF: ::quickread::TableRef = #table_ref;
                &TABLE_REF
            }

            fn columns() -> &'static [::quickread::ColumnDef] {
                static RESULT: ::std::sync::LazyLock<Box<[::quickread::ColumnDef]>> =
                    ::std::sync::LazyLock::new(|| vec![#(#columns_defs),*].into_boxed_slice());
                &RESULT
            }

            fn primary_key_def() -> &'static [&'static ::quickread::ColumnDef] {
                static RESULT: ::std::sync::LazyLock<Box<[&::quickread::ColumnDef]>> =
                    ::std::sync::LazyLock::new(|| vec![#(#primary_key_defs),*].into_boxed_slice());
                &RESULT
            }

            fn labels() -> ::quickread::RowNames {
                static RESULT: ::std::sync::LazyLock<::quickread::RowNames> =
                    ::std::sync::LazyLock::new(|| {
                        let labels: &[&str] = &[#(#labels),*];
                        labels.iter().map(|v| v.to_string()).collect()
                    });
                RESULT.clone()
            }

            #from_row

            fn row_full(&self) -> ::quickread::Row {
                vec![#(::quickread::AsValue::as_value(::std::clone::Clone::clone(&self.#fields))),*]
                    .into_boxed_slice()
            }
        }
    }
}
