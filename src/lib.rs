//! Generates wrapper types around an inner object, turning its
//! callback-style methods into [`Thunk`]s, exposing synchronous and event
//! methods through the same instance, and transforming arguments and results
//! on the way without touching the inner object.
//!
//! ```
//! use serde_json::json;
//! use std::sync::mpsc;
//! use thunkwrap::{Completion, WrapperBuilder};
//!
//! struct Greeter;
//!
//! #[thunkwrap::source]
//! impl Greeter {
//!     #[thunk]
//!     fn greet(&self, name: String, done: Completion) {
//!         done(vec![json!(null), json!(format!("hello {name}"))]);
//!     }
//! }
//!
//! let class = WrapperBuilder::<Greeter>::new().add("greet", None).get_wrapper();
//! let greeter = class.construct(Greeter);
//!
//! let (tx, rx) = mpsc::channel();
//! greeter
//!     .thunk("greet", vec![json!("you")])
//!     .unwrap()
//!     .resume(move |args| tx.send(args).unwrap())
//!     .unwrap();
//! assert_eq!(rx.recv().unwrap(), vec![json!(null), json!("hello you")]);
//! ```

extern crate self as thunkwrap;

#[doc(inline)]
pub use thunkwrap_impl::*;

mod builder;
mod error;
mod event;
mod method;
mod names;
mod options;
mod source;
mod transform;
mod wrapper;

pub use builder::WrapperBuilder;
pub use error::{Error, Result};
pub use names::{format_method_name, MethodNames};
pub use options::{AddOptions, EventConfig, EventOptions, PassThroughOptions, SyncOptions, SyncSpec};
pub use serde_json::Value;
pub use source::{Args, Completion, EventSource, Listener, SyncSource, ThunkSource};
pub use transform::{
    apply_transformations, wrap_completion, wrap_listener, PostTransformation, Transformation,
    TransformationTable,
};
pub use wrapper::{MethodKind, Thunk, Wrapper, WrapperClass};

#[doc(hidden)]
pub mod private {
    use crate::{Args, Error, Result};
    use serde::{de::DeserializeOwned, Serialize};
    use serde_json::Value;

    pub fn check_arity(method: &str, args: &Args, max: usize) -> Result<()> {
        if args.len() > max {
            return Err(Error::Arity {
                method: method.to_owned(),
                max,
                actual: args.len(),
            });
        }
        Ok(())
    }

    /// Decodes one argument. A missing argument decodes from `null`.
    pub fn from_arg<P: DeserializeOwned>(method: &str, index: usize, arg: Option<Value>) -> Result<P> {
        serde_json::from_value(arg.unwrap_or(Value::Null)).map_err(|source| Error::Argument {
            method: method.to_owned(),
            index,
            source,
        })
    }

    pub fn to_value<R: Serialize>(method: &str, ret: R) -> Result<Value> {
        serde_json::to_value(ret).map_err(|source| Error::Conversion {
            method: method.to_owned(),
            source,
        })
    }

    pub fn inner_error<E>(error: E) -> Error
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Inner(error.into())
    }

    pub fn no_such_method<R>(method: &str) -> Result<R> {
        Err(Error::NoSuchMethod(method.to_owned()))
    }
}
