use crate::{Args, Completion, Listener, Wrapper};
use serde_json::Value;
use std::{collections::BTreeMap, fmt, sync::Arc};

/// Maps a single value. Receives the wrapper instance the call went through.
pub type Transformation<T> = Arc<dyn Fn(&Wrapper<T>, Value) -> Value + Send + Sync>;

/// Maps a whole list after the positional transformations ran. May change
/// its length.
pub type PostTransformation<T> = Arc<dyn Fn(&Wrapper<T>, Args) -> Args + Send + Sync>;

/// Per-position transformations plus an optional `post` step.
///
/// ```
/// use serde_json::{json, Value};
/// use thunkwrap::TransformationTable;
///
/// let table = TransformationTable::<()>::new()
///     .at(1, |_, res| json!(format!("{} TRANS", res.as_str().unwrap_or_default())))
///     .post(|_, mut args| {
///         args.push(Value::Null);
///         args
///     });
/// assert!(table.get(1).is_some());
/// assert!(table.get(0).is_none());
/// ```
pub struct TransformationTable<T> {
    positions: BTreeMap<usize, Transformation<T>>,
    post: Option<PostTransformation<T>>,
}

impl<T> TransformationTable<T> {
    pub fn new() -> Self {
        Self {
            positions: BTreeMap::new(),
            post: None,
        }
    }

    /// Sets the transformation for the zero-based position `index`,
    /// replacing any previous one.
    pub fn at<F>(mut self, index: usize, f: F) -> Self
    where
        F: Fn(&Wrapper<T>, Value) -> Value + Send + Sync + 'static,
    {
        self.positions.insert(index, Arc::new(f));
        self
    }

    pub fn post<F>(mut self, f: F) -> Self
    where
        F: Fn(&Wrapper<T>, Args) -> Args + Send + Sync + 'static,
    {
        self.post = Some(Arc::new(f));
        self
    }

    pub fn get(&self, index: usize) -> Option<&Transformation<T>> {
        self.positions.get(&index)
    }
}

impl<T> Default for TransformationTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TransformationTable<T> {
    fn clone(&self) -> Self {
        Self {
            positions: self.positions.clone(),
            post: self.post.clone(),
        }
    }
}

impl<T> fmt::Debug for TransformationTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformationTable")
            .field("positions", &self.positions.keys().collect::<Vec<_>>())
            .field("post", &self.post.is_some())
            .finish()
    }
}

/// Runs `raw` through `table` with `wrapper` as the context of every
/// transformation. Without a table the list is returned untouched.
pub fn apply_transformations<T>(
    raw: Args,
    table: Option<&TransformationTable<T>>,
    wrapper: &Wrapper<T>,
) -> Args {
    let table = match table {
        Some(table) => table,
        None => return raw,
    };
    let args = raw
        .into_iter()
        .enumerate()
        .map(|(i, arg)| match table.positions.get(&i) {
            Some(f) => f(wrapper, arg),
            None => arg,
        })
        .collect();
    match &table.post {
        Some(post) => post(wrapper, args),
        None => args,
    }
}

/// Wraps a completion so the values it receives are transformed first.
pub fn wrap_completion<T>(
    done: Completion,
    table: Arc<TransformationTable<T>>,
    wrapper: Wrapper<T>,
) -> Completion
where
    T: Send + Sync + 'static,
{
    Box::new(move |raw| done(apply_transformations(raw, Some(&table), &wrapper)))
}

/// Same as [`wrap_completion`] for a listener that may fire repeatedly.
pub fn wrap_listener<T>(
    listener: Listener,
    table: Arc<TransformationTable<T>>,
    wrapper: Wrapper<T>,
) -> Listener
where
    T: Send + Sync + 'static,
{
    Arc::new(move |raw| listener(apply_transformations(raw, Some(&table), &wrapper)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WrapperBuilder;
    use proptest::prelude::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn instance() -> Wrapper<()> {
        WrapperBuilder::<()>::new().get_wrapper().construct(())
    }

    #[test]
    fn no_table_is_identity() {
        let wrapper = instance();
        let raw = vec![json!(null), json!("a"), json!(3)];
        assert_eq!(apply_transformations(raw.clone(), None, &wrapper), raw);
    }

    #[test]
    fn positional_then_post() {
        let wrapper = instance();
        let table = TransformationTable::new()
            .at(0, |_, v| json!(v.as_i64().unwrap_or_default() * 10))
            .at(2, |_, v| json!(format!("<{}>", v.as_str().unwrap_or_default())))
            .post(|_, mut args| {
                args.remove(1);
                args.push(json!("tail"));
                args
            });
        let out = apply_transformations(vec![json!(1), json!(2), json!("x")], Some(&table), &wrapper);
        assert_eq!(out, vec![json!(10), json!("<x>"), json!("tail")]);
    }

    #[test]
    fn positions_past_the_end_are_ignored() {
        let wrapper = instance();
        let table = TransformationTable::new().at(5, |_, _| json!("never"));
        let out = apply_transformations(vec![json!(1)], Some(&table), &wrapper);
        assert_eq!(out, vec![json!(1)]);
    }

    #[test]
    fn transformations_receive_the_wrapper() {
        let wrapper = instance();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (s1, s2) = (seen.clone(), seen.clone());
        let expected = wrapper.clone();
        let table = TransformationTable::new()
            .at(0, move |w: &Wrapper<()>, v| {
                s1.lock().unwrap().push(w.clone());
                v
            })
            .post(move |w: &Wrapper<()>, args| {
                s2.lock().unwrap().push(w.clone());
                args
            });
        apply_transformations(vec![json!(1)], Some(&table), &wrapper);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|w| Wrapper::ptr_eq(w, &expected)));
    }

    #[test]
    fn wrapped_completion_forwards_transformed_values() {
        let wrapper = instance();
        let table = Arc::new(TransformationTable::new().at(1, |_, _| json!("changed")));
        let out = Arc::new(Mutex::new(None));
        let sink = out.clone();
        let done = wrap_completion(
            Box::new(move |args| *sink.lock().unwrap() = Some(args)),
            table,
            wrapper,
        );
        done(vec![json!(null), json!("raw")]);
        assert_eq!(
            out.lock().unwrap().take(),
            Some(vec![json!(null), json!("changed")])
        );
    }

    proptest! {
        #[test]
        fn positional_table_preserves_length_and_untouched_values(
            values in prop::collection::vec(any::<i64>(), 0..32),
            positions in prop::collection::btree_set(0usize..32, 0..8),
        ) {
            let wrapper = instance();
            let table = positions.iter().fold(TransformationTable::new(), |table, &i| {
                table.at(i, |_, v| json!(v.as_i64().map(i64::wrapping_neg)))
            });
            let raw: Args = values.iter().map(|v| json!(v)).collect();
            let out = apply_transformations(raw.clone(), Some(&table), &wrapper);
            prop_assert_eq!(out.len(), raw.len());
            for (i, (before, after)) in raw.iter().zip(&out).enumerate() {
                if positions.contains(&i) {
                    prop_assert_eq!(after, &json!(before.as_i64().map(i64::wrapping_neg)));
                } else {
                    prop_assert_eq!(after, before);
                }
            }
        }
    }
}
