//! Parsing and code generation behind `#[thunkwrap::source]`.

mod ast;
mod codegen;

use proc_macro2::TokenStream;
use syn::{ItemImpl, Result};

#[doc(inline)]
pub use ast::{Marker, NameArg, Output, SourceMethod};

mod kw {
    use syn::custom_keyword;

    custom_keyword!(name);
}

/// Implements `ThunkSource`, `SyncSource` and `EventSource` for the self
/// type of `item` from its `#[thunk]`, `#[sync]` and `#[event]` methods.
pub fn expand(mut item: ItemImpl) -> Result<TokenStream> {
    let methods = ast::collect_methods(&mut item)?;
    Ok(codegen::generate(&item, &methods))
}
