use crate::{Args, Completion, Error, Result};
use serde_json::Value;
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

pub(crate) type ThunkFn<T> = Arc<dyn Fn(&Wrapper<T>, Args) -> Thunk + Send + Sync>;
pub(crate) type SyncFn<T> = Arc<dyn Fn(&Wrapper<T>, Args) -> Result<Value> + Send + Sync>;
pub(crate) type EventFn<T> = Arc<dyn Fn(&Wrapper<T>, EventCall) -> Result<Option<Thunk>> + Send + Sync>;

/// Calling convention of a generated method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Thunk,
    Sync,
    Event,
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MethodKind::Thunk => "thunk",
            MethodKind::Sync => "sync",
            MethodKind::Event => "event",
        })
    }
}

pub(crate) enum GeneratedMethod<T> {
    Thunk(ThunkFn<T>),
    Sync(SyncFn<T>),
    Event(EventFn<T>),
}

impl<T> GeneratedMethod<T> {
    fn kind(&self) -> MethodKind {
        match self {
            GeneratedMethod::Thunk(_) => MethodKind::Thunk,
            GeneratedMethod::Sync(_) => MethodKind::Sync,
            GeneratedMethod::Event(_) => MethodKind::Event,
        }
    }
}

impl<T> Clone for GeneratedMethod<T> {
    fn clone(&self) -> Self {
        match self {
            GeneratedMethod::Thunk(f) => GeneratedMethod::Thunk(f.clone()),
            GeneratedMethod::Sync(f) => GeneratedMethod::Sync(f.clone()),
            GeneratedMethod::Event(f) => GeneratedMethod::Event(f.clone()),
        }
    }
}

pub(crate) enum EventCall {
    Listen(String, crate::Listener),
    Await(String),
}

/// The generated wrapper type.
///
/// A cheap handle over a method table shared with the builder that produced
/// it: registrations made later through that builder show up here and in
/// every instance already constructed.
pub struct WrapperClass<T> {
    methods: Arc<RwLock<HashMap<String, GeneratedMethod<T>>>>,
}

impl<T> WrapperClass<T> {
    pub(crate) fn new() -> Self {
        Self {
            methods: Default::default(),
        }
    }

    pub(crate) fn attach(&self, name: String, method: GeneratedMethod<T>) {
        self.methods
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, method);
    }

    fn lookup(&self, name: &str) -> Result<GeneratedMethod<T>> {
        self.methods
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NoSuchMethod(name.to_owned()))
    }

    /// Creates an instance around `inner`.
    pub fn construct(&self, inner: impl Into<Arc<T>>) -> Wrapper<T> {
        Wrapper {
            instance: Arc::new(Instance {
                inner: inner.into(),
                class: self.clone(),
            }),
        }
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.kind_of(name).is_some()
    }

    pub fn kind_of(&self, name: &str) -> Option<MethodKind> {
        self.methods
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(GeneratedMethod::kind)
    }

    /// Names of all generated methods, sorted.
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .methods
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Whether both handles refer to the same generated type.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.methods, &other.methods)
    }
}

impl<T> Clone for WrapperClass<T> {
    fn clone(&self) -> Self {
        Self {
            methods: self.methods.clone(),
        }
    }
}

impl<T> fmt::Debug for WrapperClass<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapperClass")
            .field("methods", &self.method_names())
            .finish()
    }
}

struct Instance<T> {
    inner: Arc<T>,
    class: WrapperClass<T>,
}

/// An instance of a generated wrapper type.
///
/// Clones share identity: a transformation receives the same instance the
/// call went through, which [`Wrapper::ptr_eq`] can check.
pub struct Wrapper<T> {
    instance: Arc<Instance<T>>,
}

impl<T> Wrapper<T> {
    pub fn inner(&self) -> &Arc<T> {
        &self.instance.inner
    }

    pub fn class(&self) -> &WrapperClass<T> {
        &self.instance.class
    }

    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.instance, &other.instance)
    }

    /// Calls the thunk method `name`, capturing `args` for a later resume.
    pub fn thunk(&self, name: &str, args: Args) -> Result<Thunk> {
        match self.class().lookup(name)? {
            GeneratedMethod::Thunk(f) => Ok(f(self, args)),
            other => Err(wrong_kind(name, MethodKind::Thunk, &other)),
        }
    }

    /// Calls the synchronous or pass-through method `name`.
    pub fn call(&self, name: &str, args: Args) -> Result<Value> {
        match self.class().lookup(name)? {
            GeneratedMethod::Sync(f) => f(self, args),
            other => Err(wrong_kind(name, MethodKind::Sync, &other)),
        }
    }

    /// Calls the event method `name` with a listener, subscribing it to
    /// `event`.
    pub fn listen<F>(&self, name: &str, event: &str, listener: F) -> Result<()>
    where
        F: Fn(Args) + Send + Sync + 'static,
    {
        self.event(name, EventCall::Listen(event.to_owned(), Arc::new(listener)))
            .map(drop)
    }

    /// Calls the event method `name` without a listener. The returned thunk
    /// completes with `null` followed by the values of the next `event`.
    pub fn next_event(&self, name: &str, event: &str) -> Result<Thunk> {
        self.event(name, EventCall::Await(event.to_owned()))?
            .ok_or_else(|| Error::NoSuchMethod(name.to_owned()))
    }

    fn event(&self, name: &str, call: EventCall) -> Result<Option<Thunk>> {
        match self.class().lookup(name)? {
            GeneratedMethod::Event(f) => f(self, call),
            other => Err(wrong_kind(name, MethodKind::Event, &other)),
        }
    }
}

impl<T> Clone for Wrapper<T> {
    fn clone(&self) -> Self {
        Self {
            instance: self.instance.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Wrapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapper")
            .field("inner", &self.instance.inner)
            .finish()
    }
}

fn wrong_kind<T>(name: &str, expected: MethodKind, found: &GeneratedMethod<T>) -> Error {
    Error::WrongKind {
        method: name.to_owned(),
        expected,
        actual: found.kind(),
    }
}

/// A deferred call. Nothing happens until [`Thunk::resume`].
#[derive(Clone)]
pub struct Thunk {
    resume: Arc<dyn Fn(Completion) -> Result<()> + Send + Sync>,
}

impl Thunk {
    pub(crate) fn new<F>(resume: F) -> Self
    where
        F: Fn(Completion) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            resume: Arc::new(resume),
        }
    }

    /// Performs the call, handing `done` the values it completes with.
    ///
    /// Every resume performs a fresh call. An `Err` means the inner object
    /// refused the call outright, in which case `done` is never invoked.
    pub fn resume<F>(&self, done: F) -> Result<()>
    where
        F: FnOnce(Args) + Send + 'static,
    {
        (self.resume)(Box::new(done))
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thunk").finish_non_exhaustive()
    }
}
