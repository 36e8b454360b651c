mod common;

use common::{completion, listener, wait, Emitter};
use serde_json::{json, Value};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use thunkwrap::{Error, EventConfig, EventOptions, TransformationTable, Wrapper, WrapperBuilder};

fn table() -> TransformationTable<Emitter> {
    TransformationTable::new()
        .at(0, |_, a| json!(format!("f0({})", a.as_str().unwrap())))
        .at(1, |_, b| json!(format!("f1({})", b.as_str().unwrap())))
}

fn abc() -> Vec<Value> {
    vec![json!("a"), json!("b"), json!("c")]
}

#[test]
fn thunk_mode_completes_with_transformed_values() {
    let class = WrapperBuilder::<Emitter>::new()
        .add_event(
            "once",
            EventOptions::new().event("data", EventConfig::new().transformations(table())),
        )
        .get_wrapper();
    let emitter = class.construct(Emitter::default());

    let (done, rx) = completion();
    emitter.next_event("once", "data").unwrap().resume(done).unwrap();
    assert_eq!(emitter.inner().listener_count("data"), 1);

    emitter.inner().emit("data", abc());
    assert_eq!(
        wait(&rx),
        vec![Value::Null, json!("f0(a)"), json!("f1(b)"), json!("c")]
    );
    assert_eq!(emitter.inner().listener_count("data"), 0);
}

#[test]
fn pass_through_mode_wraps_the_listener() {
    let class = WrapperBuilder::<Emitter>::new()
        .add_event(
            ["on", "once"],
            EventOptions::new().event("data", EventConfig::new().transformations(table())),
        )
        .get_wrapper();
    let emitter = class.construct(Emitter::default());

    let (on_data, rx) = listener();
    emitter.listen("on", "data", on_data).unwrap();

    emitter.inner().emit("data", abc());
    emitter.inner().emit("data", vec![json!("x")]);
    assert_eq!(wait(&rx), vec![json!("f0(a)"), json!("f1(b)"), json!("c")]);
    assert_eq!(wait(&rx), vec![json!("f0(x)")]);
}

#[test]
fn unconfigured_events_pass_through_raw() {
    let class = WrapperBuilder::<Emitter>::new()
        .add_event(
            "on",
            EventOptions::new().event("data", EventConfig::new().transformations(table())),
        )
        .get_wrapper();
    let emitter = class.construct(Emitter::default());

    let (on_end, listener_rx) = listener();
    emitter.listen("on", "end", on_end).unwrap();
    let (done, thunk_rx) = completion();
    emitter.next_event("on", "end").unwrap().resume(done).unwrap();

    emitter.inner().emit("end", abc());
    assert_eq!(wait(&listener_rx), abc());
    assert_eq!(
        wait(&thunk_rx),
        vec![Value::Null, json!("a"), json!("b"), json!("c")]
    );
}

#[test]
fn event_without_options_is_pure_pass_through() {
    let class = WrapperBuilder::<Emitter>::new()
        .add_event("on", None)
        .get_wrapper();
    let emitter = class.construct(Emitter::default());

    let (on_data, rx) = listener();
    emitter.listen("on", "data", on_data).unwrap();
    emitter.inner().emit("data", vec![]);
    assert_eq!(wait(&rx), Vec::<Value>::new());
}

#[test]
fn thunk_completes_once_on_a_repeating_emitter() {
    let class = WrapperBuilder::<Emitter>::new()
        .add_event("on", None)
        .get_wrapper();
    let emitter = class.construct(Emitter::default());

    let (done, rx) = completion();
    emitter.next_event("on", "tick").unwrap().resume(done).unwrap();

    emitter.inner().emit("tick", vec![json!(1)]);
    emitter.inner().emit("tick", vec![json!(2)]);
    assert_eq!(wait(&rx), vec![Value::Null, json!(1)]);
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    // Still subscribed: unsubscribing is up to the inner object.
    assert_eq!(emitter.inner().listener_count("tick"), 1);
}

#[test]
fn post_transformation_applies_to_events() {
    let class = WrapperBuilder::<Emitter>::new()
        .add_event(
            "on",
            EventOptions::new().event(
                "data",
                EventConfig::new().transformations(TransformationTable::new().post(
                    |_: &Wrapper<Emitter>, args: Vec<Value>| vec![json!(args.len())],
                )),
            ),
        )
        .get_wrapper();
    let emitter = class.construct(Emitter::default());

    let (done, rx) = completion();
    emitter.next_event("on", "data").unwrap().resume(done).unwrap();
    emitter.inner().emit("data", abc());
    assert_eq!(wait(&rx), vec![Value::Null, json!(3)]);
}

#[test]
fn transformations_receive_the_wrapper_in_both_modes() {
    let contexts = Arc::new(Mutex::new(Vec::new()));
    let (seen_at, seen_post) = (contexts.clone(), contexts.clone());
    let class = WrapperBuilder::<Emitter>::new()
        .add_event(
            "on",
            EventOptions::new().event(
                "data",
                EventConfig::new().transformations(
                    TransformationTable::new()
                        .at(0, move |wrapper: &Wrapper<Emitter>, v| {
                            seen_at.lock().unwrap().push(wrapper.clone());
                            v
                        })
                        .post(move |wrapper: &Wrapper<Emitter>, args| {
                            seen_post.lock().unwrap().push(wrapper.clone());
                            args
                        }),
                ),
            ),
        )
        .get_wrapper();
    let emitter = class.construct(Emitter::default());

    let (on_data, listener_rx) = listener();
    emitter.listen("on", "data", on_data).unwrap();
    let (done, thunk_rx) = completion();
    emitter.next_event("on", "data").unwrap().resume(done).unwrap();

    emitter.inner().emit("data", vec![json!("a")]);
    wait(&listener_rx);
    wait(&thunk_rx);

    let contexts = contexts.lock().unwrap();
    assert_eq!(contexts.len(), 4);
    assert!(contexts.iter().all(|w| Wrapper::ptr_eq(w, &emitter)));
}

#[test]
fn unknown_subscription_method_fails() {
    let class = WrapperBuilder::<Emitter>::new()
        .add_event("off", None)
        .get_wrapper();
    let emitter = class.construct(Emitter::default());

    let (on_data, _rx) = listener();
    assert!(matches!(
        emitter.listen("off", "data", on_data),
        Err(Error::NoSuchMethod(name)) if name == "off"
    ));
    let (done, _rx) = completion();
    let thunk = emitter.next_event("off", "data").unwrap();
    assert!(matches!(thunk.resume(done), Err(Error::NoSuchMethod(_))));
}
