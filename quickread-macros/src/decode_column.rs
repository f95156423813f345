use proc_macro2::TokenStream;
use quickread_core::{PrimaryKeyType, decode_type};
use quote::quote;
use syn::{Error, Field, Ident, LitStr, Result, Type, ext::IdentExt, parse::ParseBuffer};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) name: String,
    pub(crate) column_type: String,
    /// Expression producing the empty value of the column.
    pub(crate) value: TokenStream,
    pub(crate) nullable: bool,
    pub(crate) primary_key: PrimaryKeyType,
    pub(crate) unique: bool,
    pub(crate) ignore: bool,
}

pub(crate) fn decode_column(field: &Field) -> Result<ColumnMetadata> {
    let Some(ident) = field.ident.clone() else {
        return Err(Error::new_spanned(
            field,
            "Entity fields are expected to have a name",
        ));
    };
    let ty = &field.ty;
    // Types unknown at expansion time fall back to their `AsValue` implementation
    let (value, nullable) = match decode_type(ty) {
        Ok((value, nullable)) => (quote!(#value), nullable),
        Err(..) => (quote!(<#ty as ::quickread::AsValue>::as_empty_value()), false),
    };
    let mut name = ident.unraw().to_string();
    if name.starts_with('_') {
        name.remove(0);
    }
    let mut metadata = ColumnMetadata {
        ident,
        ty: ty.clone(),
        name,
        column_type: String::new(),
        value,
        nullable,
        primary_key: PrimaryKeyType::None,
        unique: false,
        ignore: false,
    };
    for attr in &field.attrs {
        if !attr.path().is_ident("quickread") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                let value = arg.value().and_then(ParseBuffer::parse::<LitStr>).map_err(|e| {
                    arg.error(format!(
                        "Error while parsing `name`, use it like: `#[quickread(name = \"my_column\")]`: {e}"
                    ))
                })?;
                metadata.name = value.value();
            } else if arg.path.is_ident("type") {
                let value = arg.value().and_then(ParseBuffer::parse::<LitStr>).map_err(|e| {
                    arg.error(format!(
                        "Error while parsing `type`, use it like: `#[quickread(type = \"VARCHAR\")]`: {e}"
                    ))
                })?;
                metadata.column_type = value.value();
            } else if arg.path.is_ident("primary_key") {
                metadata.primary_key = PrimaryKeyType::PrimaryKey;
                metadata.nullable = false;
            } else if arg.path.is_ident("unique") {
                metadata.unique = true;
            } else if arg.path.is_ident("ignore") {
                metadata.ignore = true;
            } else {
                return Err(arg.error("Unknown attribute inside quickread macro"));
            }
            Ok(())
        })?;
    }
    Ok(metadata)
}
