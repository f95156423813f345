use crate::{Value, matches_path};
use quote::ToTokens;
use std::mem;
use syn::{Error, GenericArgument, PathArguments, Result, Type, TypePath, TypeSlice};

/// Value prototype and nullability of a Rust field type.
pub fn decode_type(ty: &Type) -> Result<(Value, bool)> {
    if let Type::Path(TypePath { path, .. }) = ty {
        if let Some(ident) = path.get_ident() {
            let value = match ident.to_string().as_str() {
                "bool" => Some(Value::Boolean(None)),
                "i8" => Some(Value::Int8(None)),
                "i16" => Some(Value::Int16(None)),
                "i32" => Some(Value::Int32(None)),
                "i64" => Some(Value::Int64(None)),
                "i128" => Some(Value::Int128(None)),
                "u8" => Some(Value::UInt8(None)),
                "u16" => Some(Value::UInt16(None)),
                "u32" => Some(Value::UInt32(None)),
                "u64" => Some(Value::UInt64(None)),
                "u128" => Some(Value::UInt128(None)),
                "isize" => Some(if mem::size_of::<isize>() == mem::size_of::<i32>() {
                    Value::Int32(None)
                } else {
                    Value::Int64(None)
                }),
                "usize" => Some(if mem::size_of::<usize>() == mem::size_of::<u32>() {
                    Value::UInt32(None)
                } else {
                    Value::UInt64(None)
                }),
                "f32" => Some(Value::Float32(None)),
                "f64" => Some(Value::Float64(None)),
                "String" => Some(Value::Varchar(None)),
                _ => None,
            };
            if let Some(value) = value {
                return Ok((value, false));
            }
        }
        if matches_path(path, &["std", "string", "String"]) {
            return Ok((Value::Varchar(None), false));
        } else if matches_path(path, &["rust_decimal", "Decimal"]) {
            return Ok((Value::Decimal(None, 0, 0), false));
        } else if matches_path(path, &["time", "Time"]) {
            return Ok((Value::Time(None), false));
        } else if matches_path(path, &["time", "Date"]) {
            return Ok((Value::Date(None), false));
        } else if matches_path(path, &["time", "PrimitiveDateTime"]) {
            return Ok((Value::Timestamp(None), false));
        } else if matches_path(path, &["time", "OffsetDateTime"]) {
            return Ok((Value::TimestampWithTimezone(None), false));
        } else if matches_path(path, &["uuid", "Uuid"]) {
            return Ok((Value::Uuid(None), false));
        }
        let is_option = matches_path(path, &["std", "option", "Option"]);
        let is_box = matches_path(path, &["std", "boxed", "Box"]);
        let is_vec = matches_path(path, &["std", "vec", "Vec"]);
        if is_option || is_box || is_vec {
            let inner = path.segments.last().and_then(|v| match &v.arguments {
                PathArguments::AngleBracketed(arguments) => {
                    arguments.args.iter().find_map(|v| match v {
                        GenericArgument::Type(v) => Some(v),
                        _ => None,
                    })
                }
                _ => None,
            });
            let Some(inner) = inner else {
                return Err(Error::new_spanned(
                    path,
                    format!("`{}` must have a generic type argument", path.to_token_stream()),
                ));
            };
            let (value, nullable) = decode_type(inner)?;
            if is_vec {
                return match value {
                    Value::UInt8(..) if !nullable => Ok((Value::Blob(None), false)),
                    _ => Err(Error::new_spanned(
                        ty,
                        "Only `Vec<u8>` is supported among collections",
                    )),
                };
            }
            return Ok((value, is_option || nullable));
        }
    } else if let Type::Slice(TypeSlice { elem, .. }) = ty {
        if let (Value::UInt8(..), false) = decode_type(elem)? {
            return Ok((Value::Blob(None), false));
        }
    }
    Err(Error::new_spanned(
        ty,
        format!("Unsupported field type `{}`", ty.to_token_stream()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn decode_scalars() {
        assert_eq!(
            decode_type(&parse_quote!(i64)).unwrap(),
            (Value::Int64(None), false)
        );
        assert_eq!(
            decode_type(&parse_quote!(::std::string::String)).unwrap(),
            (Value::Varchar(None), false)
        );
        assert_eq!(
            decode_type(&parse_quote!(rust_decimal::Decimal)).unwrap(),
            (Value::Decimal(None, 0, 0), false)
        );
        assert_eq!(
            decode_type(&parse_quote!(uuid::Uuid)).unwrap(),
            (Value::Uuid(None), false)
        );
    }

    #[test]
    fn decode_wrappers() {
        assert_eq!(
            decode_type(&parse_quote!(Option<time::Date>)).unwrap(),
            (Value::Date(None), true)
        );
        assert_eq!(
            decode_type(&parse_quote!(Box<Option<f32>>)).unwrap(),
            (Value::Float32(None), true)
        );
        assert_eq!(
            decode_type(&parse_quote!(Vec<u8>)).unwrap(),
            (Value::Blob(None), false)
        );
        assert_eq!(
            decode_type(&parse_quote!(Box<[u8]>)).unwrap(),
            (Value::Blob(None), false)
        );
    }

    #[test]
    fn decode_unsupported() {
        assert!(decode_type(&parse_quote!(Vec<String>)).is_err());
        assert!(decode_type(&parse_quote!(std::collections::HashMap<String, i32>)).is_err());
        assert!(decode_type(&parse_quote!((i32, i32))).is_err());
    }
}
