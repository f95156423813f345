use crate::{decode_column::ColumnMetadata, decode_table::TableMetadata};
use proc_macro2::TokenStream;
use quote::quote;

pub(crate) fn encode_column_def(table: &TableMetadata, metadata: &ColumnMetadata) -> TokenStream {
    let name = &metadata.name;
    let table_name = &table.name;
    let schema = &table.schema;
    let column_type = &metadata.column_type;
    let value = &metadata.value;
    let nullable = &metadata.nullable;
    let primary_key = &metadata.primary_key;
    let unique = &metadata.unique;
    quote! {
        ::quickread::ColumnDef {
            column_ref: ::quickread::ColumnRef {
                name: #name,
                table: #table_name,
                schema: #schema,
            },
            column_type: #column_type,
            value: #value,
            nullable: #nullable,
            primary_key: #primary_key,
            unique: #unique,
            comment: "",
        }
    }
}
