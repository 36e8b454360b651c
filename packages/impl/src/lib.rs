use proc_macro::TokenStream;
use syn::{parse::Nothing, parse_macro_input, ItemImpl};

/// Implements the capability traits of `thunkwrap` for the self type of an
/// inherent impl block.
///
/// Only methods carrying one of these markers are dispatched, under their own
/// name or the one given with `name = "..."`:
///
/// - `#[thunk]`: `&self`, owned parameters, then a `Completion`.
/// - `#[sync]`: `&self`, owned parameters, a serializable return value.
/// - `#[event]`: `&self, event: &str, listener: Listener`.
///
/// Any of them may return a `Result`. Its error is reported as
/// `Error::Inner` instead of reaching the completion, and for sync methods
/// the `Ok` value is what gets serialized. Thunk and event methods otherwise
/// return `()`.
#[proc_macro_attribute]
pub fn source(attr: TokenStream, input: TokenStream) -> TokenStream {
    parse_macro_input!(attr as Nothing);
    let input = parse_macro_input!(input as ItemImpl);
    thunkwrap_lib::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
