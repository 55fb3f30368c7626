//! End-to-end dispatch: envelope shapes, error sanitization, and
//! compiled-route cache behavior under concurrency.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use http::{Method, StatusCode};
use serde_json::{json, Value};

use gantry_bind::{
    AssignError, Bindable, BoundValue, BufferedRequest, FieldDescriptor, ScalarKind,
};
use gantry_core::{CallContext, ServiceError};
use gantry_dispatch::{Dispatcher, HandlerDiscovery, HandlerRegistry, RouteHandler};

#[derive(Debug, Default)]
struct GreetArgs {
    name: Option<String>,
    reps: i32,
}

static GREET_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::query("Name", ScalarKind::Text).required(),
    FieldDescriptor::query("Reps", ScalarKind::Int32),
];

impl Bindable for GreetArgs {
    fn descriptors(&self) -> &'static [FieldDescriptor] {
        &GREET_FIELDS
    }

    fn assign(&mut self, field: usize, value: BoundValue<'_>) -> Result<(), AssignError> {
        match field {
            0 => self.name = Some(value.scalar_into()?),
            1 => self.reps = value.scalar_into()?,
            _ => return Err(AssignError::Shape),
        }
        Ok(())
    }
}

fn greeting_dispatcher(extra_count: usize) -> Dispatcher {
    let mut registry = HandlerRegistry::new();
    registry.register_fn(
        "GET /greet",
        extra_count,
        |args: GreetArgs, _ctx: &CallContext, extras: &[Value]| {
            let name = args.name.unwrap_or_default();
            let mut greetings: Vec<Value> =
                (0..args.reps.max(1)).map(|_| json!(format!("hi {name}"))).collect();
            greetings.extend(extras.iter().cloned());
            Ok::<_, ServiceError>(greetings)
        },
    );
    Dispatcher::new(Arc::new(registry))
}

#[test]
fn test_success_envelope() {
    let dispatcher = greeting_dispatcher(0);
    let request = BufferedRequest::builder()
        .method(Method::GET)
        .path("/greet")
        .query_pair("name", "ada")
        .query_pair("reps", "2")
        .build();

    let (status, response) = dispatcher.dispatch(&request, &CallContext::mock(), &[]);

    assert_eq!(status, StatusCode::OK);
    assert!(!response.is_error());
    assert_eq!(response.count, 2);
    assert_eq!(response.values, vec![json!("hi ada"), json!("hi ada")]);
    assert!(response.error_code.is_none());
    assert!(response.error_message.is_none());
}

#[test]
fn test_bad_parameter_envelope_carries_problem_lines() {
    let dispatcher = greeting_dispatcher(0);
    let request = BufferedRequest::builder()
        .method(Method::GET)
        .path("/greet")
        .query_pair("reps", "blah")
        .build();

    let context = CallContext::mock();
    let (status, response) = dispatcher.dispatch(&request, &context, &[]);

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.is_error());
    assert_eq!(response.count, 0);
    assert_eq!(response.error_code.as_deref(), Some("BadParameter"));

    let message = response.error_message.unwrap();
    assert!(message.contains(
        "Error on (Int32) property 'Reps': Input string was not in a correct format."
    ));
    assert!(message.contains("Missing required parameter 'Name'"));
    assert!(message.contains(context.log_key()));
}

#[test]
fn test_unregistered_route_is_sanitized_fatal() {
    let dispatcher = greeting_dispatcher(0);
    let request = BufferedRequest::builder()
        .method(Method::GET)
        .path("/nowhere")
        .build();

    let context = CallContext::mock();
    let (status, response) = dispatcher.dispatch(&request, &context, &[]);

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error_code.as_deref(), Some("FatalError"));

    // Fatal detail never reaches the client, only the log key does.
    let message = response.error_message.unwrap();
    assert!(!message.contains("nowhere"));
    assert!(message.contains("There was a fatal service error."));
    assert!(message.contains(context.log_key()));
}

#[test]
fn test_extras_arity_mismatch_is_fatal() {
    let dispatcher = greeting_dispatcher(1);
    let request = BufferedRequest::builder()
        .method(Method::GET)
        .path("/greet")
        .query_pair("name", "ada")
        .build();

    let (status, response) = dispatcher.dispatch(&request, &CallContext::mock(), &[]);
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error_code.as_deref(), Some("FatalError"));
}

#[test]
fn test_extras_pass_through_verbatim() {
    let dispatcher = greeting_dispatcher(1);
    let request = BufferedRequest::builder()
        .method(Method::GET)
        .path("/greet")
        .query_pair("name", "ada")
        .build();

    let extras = vec![json!({"tag": 7})];
    let (status, response) = dispatcher.dispatch(&request, &CallContext::mock(), &extras);

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.values, vec![json!("hi ada"), json!({"tag": 7})]);
}

struct CountingDiscovery {
    inner: HandlerRegistry,
    lookups: AtomicUsize,
}

impl HandlerDiscovery for CountingDiscovery {
    fn find(&self, route_key: &str) -> Option<Arc<dyn RouteHandler>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find(route_key)
    }
}

#[test]
fn test_concurrent_first_hits_compile_once() {
    let mut registry = HandlerRegistry::new();
    registry.register_fn(
        "GET /greet",
        0,
        |args: GreetArgs, _ctx: &CallContext, _extras: &[Value]| {
            Ok::<_, ServiceError>(args.name)
        },
    );
    let discovery = Arc::new(CountingDiscovery {
        inner: registry,
        lookups: AtomicUsize::new(0),
    });
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&discovery) as Arc<dyn HandlerDiscovery>
    ));

    let workers = 8;
    let barrier = Arc::new(Barrier::new(workers));
    let mut handles = Vec::new();
    for _ in 0..workers {
        let dispatcher = Arc::clone(&dispatcher);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            dispatcher.resolve("GET /greet").unwrap()
        }));
    }
    let routes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(discovery.lookups.load(Ordering::SeqCst), 1);
    assert_eq!(dispatcher.compiled_count(), 1);
    for route in &routes {
        assert!(Arc::ptr_eq(route, &routes[0]));
    }
}
