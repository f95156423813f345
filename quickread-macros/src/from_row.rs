use crate::decode_table::TableMetadata;
use proc_macro2::TokenStream;
use quote::quote;

/// Body of `Entity::from_row`.
///
/// Each column is matched by label and converted through `AsValue`. A missing
/// nullable column is empty, a missing required one is an error. Ignored fields
/// take their default.
pub(crate) fn from_row(table: &TableMetadata) -> TokenStream {
    let struct_name = &table.item.ident;
    let holders = table.columns.iter().map(|c| {
        let ident = &c.ident;
        let ty = &c.ty;
        quote!(let mut #ident: Option<#ty> = None;)
    });
    let assignments = table.columns.iter().map(|c| {
        let ident = &c.ident;
        let ty = &c.ty;
        let name = &c.name;
        quote! {
            #name => {
                #ident = Some(::quickread::Context::with_context(
                    <#ty as ::quickread::AsValue>::try_from_value(__value__),
                    || format!("While decoding column `{}` of `{}`", #name, stringify!(#struct_name)),
                )?);
            }
        }
    });
    let fields = table.columns.iter().map(|c| {
        let ident = &c.ident;
        let ty = &c.ty;
        let name = &c.name;
        let missing = if c.nullable {
            quote!(<#ty as ::quickread::AsValue>::try_from_value(::quickread::Value::Null)?)
        } else {
            quote! {
                return Err(::quickread::Error::msg(format!(
                    "Column `{}` does not exist in the row provided",
                    #name
                )))
            }
        };
        quote! {
            #ident: match #ident {
                Some(v) => v,
                None => #missing,
            }
        }
    });
    let ignored = table
        .ignored
        .iter()
        .map(|ident| quote!(#ident: ::std::default::Default::default()));
    quote! {
        fn from_row(row: ::quickread::RowLabeled) -> ::quickread::Result<Self> {
            #(#holders)*
            for (__name__, __value__) in ::std::iter::zip(row.labels.iter(), row.values.into_vec()) {
                match __name__.as_str() {
                    #(#assignments)*
                    _ => {}
                }
            }
            Ok(Self {
                #(#fields,)*
                #(#ignored,)*
            })
        }
    }
}
