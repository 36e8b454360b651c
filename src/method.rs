//! Thunk and synchronous variants of inner methods.

use crate::{
    format_method_name,
    options::{NormalizedAdd, NormalizedSync},
    transform::wrap_completion,
    wrapper::GeneratedMethod,
    Args, SyncSource, Thunk, ThunkSource, Wrapper, WrapperClass,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// Attaches the synchronous variant of `fn_name`, renamed when a format is
/// configured.
pub(crate) fn add_sync_method<T>(class: &WrapperClass<T>, fn_name: &str, options: &NormalizedSync<T>)
where
    T: SyncSource + Send + Sync + 'static,
{
    let name = match &options.name_format {
        Some(format) => format_method_name(format, fn_name),
        None => fn_name.to_owned(),
    };
    debug!(method = fn_name, generated = %name, "adding sync method");

    let fn_name: Arc<str> = fn_name.into();
    let transformation = options.transformation.clone();
    class.attach(
        name,
        GeneratedMethod::Sync(Arc::new(move |wrapper: &Wrapper<T>, args: Args| {
            trace!(method = %fn_name, args = args.len(), "calling sync method");
            let res = wrapper.inner().call_sync(&fn_name, args)?;
            Ok(match &transformation {
                Some(f) => f(wrapper, res),
                None => res,
            })
        })),
    );
}

/// Attaches the thunk variant of `fn_name` under its own name.
pub(crate) fn add_thunk_method<T>(class: &WrapperClass<T>, fn_name: &str, options: &NormalizedAdd<T>)
where
    T: ThunkSource + Send + Sync + 'static,
{
    debug!(method = fn_name, "adding thunk method");

    let fn_name: Arc<str> = fn_name.into();
    let transformations = options.transformations.clone();
    class.attach(
        fn_name.to_string(),
        GeneratedMethod::Thunk(Arc::new(move |wrapper: &Wrapper<T>, args: Args| {
            let wrapper = wrapper.clone();
            let fn_name = fn_name.clone();
            let transformations = transformations.clone();
            Thunk::new(move |done| {
                let done = match &transformations {
                    Some(table) => wrap_completion(done, table.clone(), wrapper.clone()),
                    None => done,
                };
                trace!(method = %fn_name, args = args.len(), "resuming thunk");
                wrapper.inner().call_async(&fn_name, args.clone(), done)
            })
        })),
    );
}

pub(crate) fn add_methods<T, I>(class: &WrapperClass<T>, fn_names: I, options: &NormalizedAdd<T>)
where
    T: ThunkSource + SyncSource + Send + Sync + 'static,
    I: IntoIterator<Item = String>,
{
    for fn_name in fn_names {
        add_thunk_method(class, &fn_name, options);
        if let Some(sync) = &options.sync {
            add_sync_method(class, &fn_name, sync);
        }
    }
}
