use crate::quote_cow;
use quote::{ToTokens, TokenStreamExt, quote};
use std::{
    borrow::Cow,
    fmt::{self, Display, Formatter},
};

/// Name and schema of a table.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub name: Cow<'static, str>,
    pub schema: Cow<'static, str>,
}

impl TableRef {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            schema: Cow::Borrowed(""),
        }
    }

    pub fn full_name(&self) -> String {
        let mut result = String::new();
        if !self.schema.is_empty() {
            result.push_str(&self.schema);
            result.push('.');
        }
        result.push_str(&self.name);
        result
    }
}

impl Display for TableRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.schema.is_empty() {
            write!(f, "{}.", self.schema)?;
        }
        f.write_str(&self.name)
    }
}

impl ToTokens for TableRef {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        let name = quote_cow(&self.name);
        let schema = quote_cow(&self.schema);
        tokens.append_all(quote! {
            ::quickread::TableRef {
                name: #name,
                schema: #schema,
            }
        });
    }
}
