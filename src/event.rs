//! Adapters for subscription methods such as `on` and `once`.

use crate::{
    options::NormalizedEvent,
    transform::{apply_transformations, wrap_listener},
    wrapper::{EventCall, GeneratedMethod},
    Completion, EventSource, Listener, Thunk, Wrapper, WrapperClass,
};
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, trace, warn};

/// Attaches an adapter for the subscription method `fn_name`.
///
/// Called with a listener, the adapter subscribes it, transformed when the
/// event is configured. Called without one, it returns a thunk that
/// completes with `null` and the transformed values of the next firing.
pub(crate) fn add_event_method<T>(
    class: &WrapperClass<T>,
    fn_name: &str,
    options: Arc<NormalizedEvent<T>>,
) where
    T: EventSource + Send + Sync + 'static,
{
    debug!(method = fn_name, events = options.events.len(), "adding event method");

    let fn_name: Arc<str> = fn_name.into();
    class.attach(
        fn_name.to_string(),
        GeneratedMethod::Event(Arc::new(move |wrapper: &Wrapper<T>, call: EventCall| {
            match call {
                EventCall::Listen(event, listener) => {
                    let listener = match options.events.get(&event) {
                        Some(table) => wrap_listener(listener, table.clone(), wrapper.clone()),
                        None => listener,
                    };
                    trace!(method = %fn_name, event = %event, "subscribing listener");
                    wrapper.inner().subscribe(&fn_name, &event, listener)?;
                    Ok(None)
                }
                EventCall::Await(event) => {
                    let wrapper = wrapper.clone();
                    let fn_name = fn_name.clone();
                    let table = options.events.get(&event).cloned();
                    Ok(Some(Thunk::new(move |done| {
                        trace!(method = %fn_name, event = %event, "awaiting event");
                        let listener = first_firing(done, table.clone(), wrapper.clone(), &event);
                        wrapper.inner().subscribe(&fn_name, &event, listener)
                    })))
                }
            }
        })),
    );
}

/// Builds a listener that completes `done` with the first firing only.
fn first_firing<T>(
    done: Completion,
    table: Option<Arc<crate::TransformationTable<T>>>,
    wrapper: Wrapper<T>,
    event: &str,
) -> Listener
where
    T: Send + Sync + 'static,
{
    let done = Mutex::new(Some(done));
    let event = event.to_owned();
    Arc::new(move |raw| {
        let done = done.lock().unwrap_or_else(PoisonError::into_inner).take();
        match done {
            Some(done) => {
                let mut args = apply_transformations(raw, table.as_deref(), &wrapper);
                args.insert(0, Value::Null);
                done(args);
            }
            None => warn!(event = %event, "event fired again after its thunk completed"),
        }
    })
}

pub(crate) fn add_event_methods<T, I>(class: &WrapperClass<T>, fn_names: I, options: NormalizedEvent<T>)
where
    T: EventSource + Send + Sync + 'static,
    I: IntoIterator<Item = String>,
{
    let options = Arc::new(options);
    for fn_name in fn_names {
        add_event_method(class, &fn_name, options.clone());
    }
}
