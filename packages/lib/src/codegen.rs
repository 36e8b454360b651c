use crate::ast::{Marker, Output, SourceMethod};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemImpl;

/// Decodes `args` into `__arg0..` for the method's parameters.
fn decode_params(method: &SourceMethod) -> (TokenStream, Vec<syn::Ident>) {
    let max = method.params.len();
    let idents = (0..max)
        .map(|i| format_ident!("__arg{}", i))
        .collect::<Vec<_>>();
    let decode = method.params.iter().zip(&idents).enumerate().map(|(i, (ty, ident))| {
        quote!(let #ident: #ty = ::thunkwrap::private::from_arg(method, #i, args.next())?;)
    });
    (
        quote! {
            ::thunkwrap::private::check_arity(method, &args, #max)?;
            let mut args = args.into_iter();
            #(#decode)*
        },
        idents,
    )
}

/// Calls the method, turning the error of a fallible one into an early
/// return.
fn invoke(method: &SourceMethod, call: TokenStream) -> TokenStream {
    match method.output {
        Output::Fallible => quote!(#call.map_err(::thunkwrap::private::inner_error)?),
        Output::Unit | Output::Value => call,
    }
}

fn thunk_arm(method: &SourceMethod) -> TokenStream {
    let (decode, idents) = decode_params(method);
    let exposed = &method.exposed;
    let ident = &method.ident;
    let call = invoke(method, quote!(self.#ident(#(#idents,)* done)));
    quote! {
        #exposed => {
            #decode
            #call;
            ::std::result::Result::Ok(())
        }
    }
}

fn sync_arm(method: &SourceMethod) -> TokenStream {
    let (decode, idents) = decode_params(method);
    let exposed = &method.exposed;
    let ident = &method.ident;
    let call = invoke(method, quote!(self.#ident(#(#idents),*)));
    quote! {
        #exposed => {
            #decode
            ::thunkwrap::private::to_value(method, #call)
        }
    }
}

fn event_arm(method: &SourceMethod) -> TokenStream {
    let exposed = &method.exposed;
    let ident = &method.ident;
    let call = invoke(method, quote!(self.#ident(event, listener)));
    quote! {
        #exposed => {
            #call;
            ::std::result::Result::Ok(())
        }
    }
}

fn arms(methods: &[SourceMethod], marker: Marker) -> Option<Vec<TokenStream>> {
    let arms = methods
        .iter()
        .filter(|m| m.marker == marker)
        .map(|m| match marker {
            Marker::Event => event_arm(m),
            Marker::Sync => sync_arm(m),
            Marker::Thunk => thunk_arm(m),
        })
        .collect::<Vec<_>>();
    if arms.is_empty() {
        None
    } else {
        Some(arms)
    }
}

/// Emits `item` followed by the three capability impls. A convention with no
/// marked method keeps the trait's default body.
pub fn generate(item: &ItemImpl, methods: &[SourceMethod]) -> TokenStream {
    let (impl_generics, _, where_clause) = item.generics.split_for_impl();
    let self_ty = &item.self_ty;

    let thunk = arms(methods, Marker::Thunk).map(|arms| {
        quote! {
            #[allow(unused_mut, unused_variables)]
            fn call_async(
                &self,
                method: &str,
                args: ::thunkwrap::Args,
                done: ::thunkwrap::Completion,
            ) -> ::thunkwrap::Result<()> {
                match method {
                    #(#arms)*
                    _ => ::thunkwrap::private::no_such_method(method),
                }
            }
        }
    });
    let sync = arms(methods, Marker::Sync).map(|arms| {
        quote! {
            #[allow(unused_mut, unused_variables)]
            fn call_sync(
                &self,
                method: &str,
                args: ::thunkwrap::Args,
            ) -> ::thunkwrap::Result<::thunkwrap::Value> {
                match method {
                    #(#arms)*
                    _ => ::thunkwrap::private::no_such_method(method),
                }
            }
        }
    });
    let event = arms(methods, Marker::Event).map(|arms| {
        quote! {
            fn subscribe(
                &self,
                method: &str,
                event: &str,
                listener: ::thunkwrap::Listener,
            ) -> ::thunkwrap::Result<()> {
                match method {
                    #(#arms)*
                    _ => ::thunkwrap::private::no_such_method(method),
                }
            }
        }
    });

    quote! {
        #item

        impl #impl_generics ::thunkwrap::ThunkSource for #self_ty #where_clause {
            #thunk
        }

        impl #impl_generics ::thunkwrap::SyncSource for #self_ty #where_clause {
            #sync
        }

        impl #impl_generics ::thunkwrap::EventSource for #self_ty #where_clause {
            #event
        }
    }
}
