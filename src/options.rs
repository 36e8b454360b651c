//! Options accepted by the registration calls of
//! [`WrapperBuilder`](crate::WrapperBuilder), and their normalized forms.

use crate::{transform::Transformation, TransformationTable, Wrapper};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};

const DEFAULT_SYNC_NAME_FORMAT: &str = "%sSync";

/// Options of [`WrapperBuilder::add`](crate::WrapperBuilder::add).
pub struct AddOptions<T> {
    transformations: Option<TransformationTable<T>>,
    sync: Option<SyncSpec<T>>,
}

impl<T> AddOptions<T> {
    pub fn new() -> Self {
        Self {
            transformations: None,
            sync: None,
        }
    }

    /// Transformations applied to the values the thunk completes with.
    pub fn transformations(self, table: TransformationTable<T>) -> Self {
        Self {
            transformations: Some(table),
            ..self
        }
    }

    /// Also generate a synchronous variant. Accepts `true`/`false` or a
    /// [`SyncOptions`].
    pub fn sync(self, sync: impl Into<SyncSpec<T>>) -> Self {
        Self {
            sync: Some(sync.into()),
            ..self
        }
    }
}

impl<T> Default for AddOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Either a plain switch or a full configuration of the synchronous variant.
pub enum SyncSpec<T> {
    Flag(bool),
    Options(SyncOptions<T>),
}

impl<T> From<bool> for SyncSpec<T> {
    fn from(flag: bool) -> Self {
        SyncSpec::Flag(flag)
    }
}

impl<T> From<SyncOptions<T>> for SyncSpec<T> {
    fn from(options: SyncOptions<T>) -> Self {
        SyncSpec::Options(options)
    }
}

/// Configuration of a synchronous method, used both for the variant of
/// [`add`](crate::WrapperBuilder::add) and for
/// [`add_pass_through`](crate::WrapperBuilder::add_pass_through).
pub struct SyncOptions<T> {
    transformation: Option<Transformation<T>>,
    prototype_name_format: Option<String>,
}

impl<T> SyncOptions<T> {
    pub fn new() -> Self {
        Self {
            transformation: None,
            prototype_name_format: None,
        }
    }

    /// Maps the value returned by the inner method.
    pub fn transformation<F>(self, f: F) -> Self
    where
        F: Fn(&Wrapper<T>, Value) -> Value + Send + Sync + 'static,
    {
        Self {
            transformation: Some(Arc::new(f)),
            ..self
        }
    }

    /// Name of the generated method, with `%s` standing for the inner
    /// method name. See [`format_method_name`](crate::format_method_name).
    pub fn prototype_name_format(self, format: impl Into<String>) -> Self {
        Self {
            prototype_name_format: Some(format.into()),
            ..self
        }
    }
}

impl<T> Default for SyncOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub type PassThroughOptions<T> = SyncOptions<T>;

/// Options of [`WrapperBuilder::add_event`](crate::WrapperBuilder::add_event).
pub struct EventOptions<T> {
    events: Option<HashMap<String, EventConfig<T>>>,
}

impl<T> EventOptions<T> {
    pub fn new() -> Self {
        Self { events: None }
    }

    pub fn event(mut self, name: impl Into<String>, config: EventConfig<T>) -> Self {
        self.events
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), config);
        self
    }
}

impl<T> Default for EventOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventConfig<T> {
    transformations: Option<TransformationTable<T>>,
}

impl<T> EventConfig<T> {
    pub fn new() -> Self {
        Self {
            transformations: None,
        }
    }

    /// Transformations applied to the values the event fires with.
    pub fn transformations(self, table: TransformationTable<T>) -> Self {
        Self {
            transformations: Some(table),
        }
    }
}

impl<T> Default for EventConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct NormalizedAdd<T> {
    pub transformations: Option<Arc<TransformationTable<T>>>,
    pub sync: Option<NormalizedSync<T>>,
}

pub(crate) struct NormalizedSync<T> {
    pub transformation: Option<Transformation<T>>,
    pub name_format: Option<String>,
}

pub(crate) struct NormalizedEvent<T> {
    pub events: HashMap<String, Arc<TransformationTable<T>>>,
}

pub(crate) fn normalize_add_options<T>(options: Option<AddOptions<T>>) -> NormalizedAdd<T> {
    let AddOptions {
        transformations,
        sync,
    } = options.unwrap_or_default();
    let sync = match sync {
        None | Some(SyncSpec::Flag(false)) => None,
        Some(SyncSpec::Flag(true)) => Some(SyncOptions::new()),
        Some(SyncSpec::Options(options)) => Some(options),
    };
    NormalizedAdd {
        transformations: transformations.map(Arc::new),
        sync: sync.map(|options| {
            let mut sync = normalize_pass_through_options(Some(options));
            sync.name_format
                .get_or_insert_with(|| DEFAULT_SYNC_NAME_FORMAT.to_owned());
            sync
        }),
    }
}

pub(crate) fn normalize_pass_through_options<T>(
    options: Option<PassThroughOptions<T>>,
) -> NormalizedSync<T> {
    let SyncOptions {
        transformation,
        prototype_name_format,
    } = options.unwrap_or_default();
    NormalizedSync {
        transformation,
        // An empty format counts as no format at all.
        name_format: prototype_name_format.filter(|format| !format.is_empty()),
    }
}

pub(crate) fn normalize_add_event_options<T>(options: Option<EventOptions<T>>) -> NormalizedEvent<T> {
    let events = options.unwrap_or_default().events.unwrap_or_default();
    NormalizedEvent {
        events: events
            .into_iter()
            .filter_map(|(name, config)| Some((name, Arc::new(config.transformations?))))
            .collect(),
    }
}
