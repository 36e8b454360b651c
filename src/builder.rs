use crate::{
    event::add_event_methods,
    method::{add_methods, add_sync_method},
    options::{normalize_add_event_options, normalize_add_options, normalize_pass_through_options},
    AddOptions, EventOptions, EventSource, MethodNames, PassThroughOptions, SyncSource,
    ThunkSource, WrapperClass,
};

/// Builds a [`WrapperClass`] one registration at a time.
///
/// ```
/// use serde_json::{json, Value};
/// use thunkwrap::{AddOptions, Args, Result, SyncSource, ThunkSource, WrapperBuilder};
///
/// struct Store;
///
/// impl SyncSource for Store {
///     fn call_sync(&self, method: &str, args: Args) -> Result<Value> {
///         Ok(json!(format!("{method} {}", args.len())))
///     }
/// }
///
/// impl ThunkSource for Store {}
///
/// let class = WrapperBuilder::<Store>::new()
///     .add("get", AddOptions::new().sync(true))
///     .add_pass_through(["len", "keys"], None)
///     .get_wrapper();
/// let store = class.construct(Store);
///
/// assert_eq!(store.call("getSync", vec![json!(1)]).unwrap(), json!("get 1"));
/// assert_eq!(store.call("keys", vec![]).unwrap(), json!("keys 0"));
/// ```
pub struct WrapperBuilder<T> {
    wrapper: WrapperClass<T>,
}

impl<T> WrapperBuilder<T> {
    pub fn new() -> Self {
        Self {
            wrapper: WrapperClass::new(),
        }
    }

    /// The generated type. Always the same one for a given builder.
    pub fn get_wrapper(&self) -> WrapperClass<T> {
        self.wrapper.clone()
    }
}

impl<T> WrapperBuilder<T>
where
    T: Send + Sync + 'static,
{
    /// Generates a thunk method for each name, plus a synchronous variant
    /// when `options` ask for one.
    pub fn add(
        &mut self,
        methods: impl Into<MethodNames>,
        options: impl Into<Option<AddOptions<T>>>,
    ) -> &mut Self
    where
        T: ThunkSource + SyncSource,
    {
        let options = normalize_add_options(options.into());
        let methods: MethodNames = methods.into();
        add_methods(&self.wrapper, methods, &options);
        self
    }

    /// Generates only a synchronous method for each name.
    pub fn add_pass_through(
        &mut self,
        methods: impl Into<MethodNames>,
        options: impl Into<Option<PassThroughOptions<T>>>,
    ) -> &mut Self
    where
        T: SyncSource,
    {
        let options = normalize_pass_through_options(options.into());
        let methods: MethodNames = methods.into();
        for method in methods {
            add_sync_method(&self.wrapper, &method, &options);
        }
        self
    }

    /// Generates an event adapter for each name.
    pub fn add_event(
        &mut self,
        methods: impl Into<MethodNames>,
        options: impl Into<Option<EventOptions<T>>>,
    ) -> &mut Self
    where
        T: EventSource,
    {
        let options = normalize_add_event_options(options.into());
        let methods: MethodNames = methods.into();
        add_event_methods(&self.wrapper, methods, options);
        self
    }
}

impl<T> Default for WrapperBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
