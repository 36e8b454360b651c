use crate::kw;
use quote::ToTokens;
use syn::{
    parse::{Parse, ParseStream},
    Attribute, FnArg, Ident, ImplItem, ImplItemMethod, ItemImpl, LitStr, Result, ReturnType,
    Token, Type,
};

macro_rules! markers {
    (
        $(#[$attr:meta])* enum $name:ident
        { $($(#[$m_attr:meta])* $key:ident => $variant:ident;)* }
    ) => {
        $(#[$attr])*
        pub enum $name { $($(#[$m_attr])* $variant,)* }

        impl $name {
            const ALL: &'static [(&'static str, $name)] =
                &[$((stringify!($key), $name::$variant),)*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($key),)*
                }
            }
        }
    };
}

markers! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Marker {
        /// `fn(&self, event: &str, listener: Listener)`
        event => Event;
        /// Owned parameters, any serializable return value.
        sync  => Sync;
        /// Owned parameters followed by the completion.
        thunk => Thunk;
    }
}

fn maybe_marker(attr: &Attribute) -> Option<Marker> {
    let ident = attr.path.get_ident()?;
    Marker::ALL
        .binary_search_by_key(&ident.to_string().as_str(), |&(s, _)| s)
        .ok()
        .map(|i| Marker::ALL[i].1)
}

/// `name = "exposed"`
pub struct NameArg {
    pub name_token: kw::name,
    pub eq_token: Token![=],
    pub value: LitStr,
}

impl Parse for NameArg {
    fn parse(input: ParseStream) -> Result<Self> {
        Ok(Self {
            name_token: input.parse()?,
            eq_token: input.parse()?,
            value: input.parse()?,
        })
    }
}

impl ToTokens for NameArg {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        self.name_token.to_tokens(tokens);
        self.eq_token.to_tokens(tokens);
        self.value.to_tokens(tokens);
    }
}

/// What a marked method hands back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Output {
    Unit,
    /// A `Result`, whose error is reported as an inner failure.
    Fallible,
    /// Any other value. Only allowed on sync methods.
    Value,
}

impl Output {
    fn of(ret: &ReturnType) -> Self {
        let ty = match ret {
            ReturnType::Default => return Output::Unit,
            ReturnType::Type(_, ty) => &**ty,
        };
        match ty {
            Type::Tuple(tuple) if tuple.elems.is_empty() => Output::Unit,
            Type::Path(path)
                if path.qself.is_none()
                    && path.path.segments.last().map_or(false, |s| s.ident == "Result") =>
            {
                Output::Fallible
            }
            _ => Output::Value,
        }
    }
}

/// A method marked for dispatch by name.
pub struct SourceMethod {
    pub marker: Marker,
    /// Name the wrapper builder refers to.
    pub exposed: String,
    pub ident: Ident,
    /// Decoded parameters, in order. For thunks the completion is not part of
    /// this list.
    pub params: Vec<Type>,
    pub output: Output,
}

impl SourceMethod {
    fn parse(marker: Marker, attr: &Attribute, method: &ImplItemMethod) -> Result<Self> {
        let exposed = if attr.tokens.is_empty() {
            method.sig.ident.to_string()
        } else {
            attr.parse_args::<NameArg>()?.value.value()
        };
        let sig = &method.sig;
        if let Some(asyncness) = &sig.asyncness {
            return Err(syn::Error::new_spanned(
                asyncness,
                "async methods cannot be dispatched by name",
            ));
        }
        if !sig.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &sig.generics,
                "generic methods cannot be dispatched by name",
            ));
        }

        let mut inputs = sig.inputs.iter();
        match inputs.next() {
            Some(FnArg::Receiver(recv)) if recv.reference.is_some() && recv.mutability.is_none() => {}
            _ => {
                return Err(syn::Error::new_spanned(
                    sig,
                    format!("{} methods must take `&self`", marker.as_str()),
                ))
            }
        }
        let mut params = inputs
            .map(|arg| match arg {
                FnArg::Typed(arg) => Ok((*arg.ty).clone()),
                FnArg::Receiver(recv) => Err(syn::Error::new_spanned(recv, "unexpected receiver")),
            })
            .collect::<Result<Vec<_>>>()?;

        match marker {
            Marker::Event => {
                if params.len() != 2 {
                    return Err(syn::Error::new_spanned(
                        &sig.inputs,
                        "an event method takes an event name and a listener",
                    ));
                }
                params.clear();
            }
            Marker::Thunk => {
                if params.pop().is_none() {
                    return Err(syn::Error::new_spanned(
                        &sig.inputs,
                        "a thunk method takes a completion as its last parameter",
                    ));
                }
            }
            Marker::Sync => {}
        }
        let output = Output::of(&sig.output);
        if output == Output::Value && marker != Marker::Sync {
            return Err(syn::Error::new_spanned(
                &sig.output,
                format!("{} methods return `()` or a `Result`", marker.as_str()),
            ));
        }
        if let Some(ty) = params.iter().find(|ty| matches!(ty, Type::Reference(_))) {
            return Err(syn::Error::new_spanned(
                ty,
                "parameters must be owned to be decoded from arguments",
            ));
        }

        Ok(Self {
            marker,
            exposed,
            ident: sig.ident.clone(),
            params,
            output,
        })
    }
}

/// Strips the markers out of `item` and collects the marked methods.
pub fn collect_methods(item: &mut ItemImpl) -> Result<Vec<SourceMethod>> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "expected an inherent impl block",
        ));
    }

    let mut methods = Vec::<SourceMethod>::new();
    let mut error: Option<syn::Error> = None;
    let mut push_error = |e: syn::Error| match &mut error {
        Some(error) => error.combine(e),
        None => error = Some(e),
    };

    for item in item.items.iter_mut() {
        let method = match item {
            ImplItem::Method(method) => method,
            _ => continue,
        };
        let mut markers = Vec::new();
        method.attrs.retain(|attr| match maybe_marker(attr) {
            Some(marker) => {
                markers.push((marker, attr.clone()));
                false
            }
            None => true,
        });
        let (marker, attr) = match markers.len() {
            0 => continue,
            1 => markers.remove(0),
            _ => {
                push_error(syn::Error::new_spanned(
                    &markers[1].1,
                    "a method takes a single dispatch marker",
                ));
                continue;
            }
        };
        match SourceMethod::parse(marker, &attr, method) {
            Ok(parsed) => {
                let duplicate = methods
                    .iter()
                    .any(|m| m.marker == parsed.marker && m.exposed == parsed.exposed);
                if duplicate {
                    push_error(syn::Error::new_spanned(
                        &attr,
                        format!(
                            "{} method `{}` is already defined",
                            marker.as_str(),
                            parsed.exposed
                        ),
                    ));
                } else {
                    methods.push(parsed);
                }
            }
            Err(e) => push_error(e),
        }
    }

    match error {
        Some(error) => Err(error),
        None => Ok(methods),
    }
}
